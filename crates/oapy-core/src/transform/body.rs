use log::warn;

use crate::ir::{BodyKind, IrBodyField, IrRequestBody};
use crate::parse::request_body::RequestBody;
use crate::parse::schema::{Schema, SchemaOrRef, SchemaType};

use super::sanitizer::IdentTable;

/// Inspect an operation's (already resolved) request body and flatten it into
/// a field list bound to one selected content type.
///
/// Exactly one content type is selected: the first in declaration order. A
/// body whose root schema is not an object yields no fields (arrays,
/// primitives, and unions at the body root are unsupported and skipped).
pub fn extract_body(body: &RequestBody, table: &mut IdentTable) -> Option<IrRequestBody> {
    let (content_type, media_type) = body.content.first()?;
    let kind = classify_content_type(content_type);

    if kind == BodyKind::Other {
        warn!(
            "request body content type '{content_type}' is not supported; \
             fields will be encoded as JSON"
        );
    }

    let Some(SchemaOrRef::Schema(schema)) = &media_type.schema else {
        return Some(IrRequestBody {
            content_type: content_type.clone(),
            kind,
            fields: Vec::new(),
        });
    };

    if schema.schema_type != Some(SchemaType::Object) {
        warn!(
            "request body schema for '{content_type}' is not an object; \
             no body fields will be generated"
        );
        return Some(IrRequestBody {
            content_type: content_type.clone(),
            kind,
            fields: Vec::new(),
        });
    }

    let mut fields = Vec::new();
    for (name, prop) in &schema.properties {
        let SchemaOrRef::Schema(prop) = prop else {
            // The resolver replaces every reference before extraction.
            continue;
        };

        let (is_file, is_file_array) = file_shape(prop);

        if is_file && kind != BodyKind::Multipart {
            warn!("dropping binary field '{name}': non-multipart bodies cannot carry files");
            continue;
        }

        fields.push(IrBodyField {
            ident: table.claim(name),
            original_name: name.clone(),
            description: prop.description.clone(),
            required: schema.required.iter().any(|r| r == name),
            is_file,
            is_file_array,
        });
    }

    Some(IrRequestBody {
        content_type: content_type.clone(),
        kind,
        fields,
    })
}

fn classify_content_type(content_type: &str) -> BodyKind {
    // Strip any parameters ("; boundary=...") before matching.
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim();
    if essence == "application/json" || essence.ends_with("+json") {
        BodyKind::Json
    } else if essence.starts_with("multipart/") {
        BodyKind::Multipart
    } else {
        BodyKind::Other
    }
}

/// Classify a property as (is_file, is_file_array). An array property whose
/// item schema is binary counts as an array of files even when the property's
/// own `format` is unset: the items' format governs.
fn file_shape(prop: &Schema) -> (bool, bool) {
    if prop.schema_type == Some(SchemaType::Array) {
        let items_binary = match prop.items.as_deref() {
            Some(SchemaOrRef::Schema(items)) => items.is_binary(),
            _ => false,
        };
        if items_binary {
            return (true, true);
        }
        return (false, false);
    }
    (prop.is_binary(), false)
}
