use std::collections::HashSet;

use indexmap::IndexMap;

use super::components::Components;
use super::media_type::MediaType;
use super::operation::{Operation, PathItem};
use super::parameter::{Parameter, ParameterOrRef};
use super::request_body::{RequestBody, RequestBodyOrRef};
use super::schema::{Schema, SchemaOrRef};
use super::spec::OpenApiSpec;
use crate::error::ResolveError;

/// Resolves all `$ref` pointers in an OpenAPI spec, producing a spec with no
/// remaining references. Only pointers local to the document
/// (`#/components/...`) are supported; a pointer whose target is absent is a
/// fatal error, and so is a reference cycle — a cyclic document is
/// unresolvable, not silently accepted.
pub struct RefResolver<'a> {
    components: Option<&'a Components>,
    visited: HashSet<String>,
}

impl<'a> RefResolver<'a> {
    pub fn new(spec: &'a OpenApiSpec) -> Self {
        Self {
            components: spec.components.as_ref(),
            visited: HashSet::new(),
        }
    }

    /// Resolve the entire spec, returning a copy with no `$ref` nodes left in
    /// any position the generator reads.
    pub fn resolve_spec(&mut self, spec: &OpenApiSpec) -> Result<OpenApiSpec, ResolveError> {
        let mut resolved = spec.clone();

        for (_path, item) in &mut resolved.paths {
            self.resolve_path_item(item)?;
        }

        Ok(resolved)
    }

    fn resolve_path_item(&mut self, item: &mut PathItem) -> Result<(), ResolveError> {
        let mut resolved_params = Vec::new();
        for p in &item.parameters {
            resolved_params.push(self.resolve_parameter_or_ref(p)?);
        }
        item.parameters = resolved_params;

        macro_rules! resolve_op {
            ($op:expr) => {
                if let Some(ref mut op) = $op {
                    self.resolve_operation(op)?;
                }
            };
        }
        resolve_op!(item.get);
        resolve_op!(item.post);
        resolve_op!(item.put);
        resolve_op!(item.patch);
        resolve_op!(item.delete);
        resolve_op!(item.head);
        resolve_op!(item.options);
        Ok(())
    }

    fn resolve_operation(&mut self, op: &mut Operation) -> Result<(), ResolveError> {
        let mut resolved_params = Vec::new();
        for p in &op.parameters {
            resolved_params.push(self.resolve_parameter_or_ref(p)?);
        }
        op.parameters = resolved_params;

        if let Some(ref body) = op.request_body {
            let resolved = self.resolve_request_body_or_ref(body)?;
            op.request_body = Some(RequestBodyOrRef::RequestBody(resolved));
        }

        Ok(())
    }

    /// Resolve a node that may be a `$ref` into a concrete schema. A node
    /// that is already concrete passes through with its nested references
    /// resolved.
    pub fn resolve_schema_or_ref(
        &mut self,
        schema_or_ref: &SchemaOrRef,
    ) -> Result<Schema, ResolveError> {
        match schema_or_ref {
            SchemaOrRef::Ref { ref_path } => {
                if !self.visited.insert(ref_path.clone()) {
                    return Err(ResolveError::CircularRef(ref_path.clone()));
                }
                let target = self.lookup_schema(ref_path)?;
                let resolved = self.resolve_schema_or_ref(&target)?;
                self.visited.remove(ref_path);
                Ok(resolved)
            }
            SchemaOrRef::Schema(schema) => self.resolve_schema(schema),
        }
    }

    fn resolve_schema(&mut self, schema: &Schema) -> Result<Schema, ResolveError> {
        let mut resolved = schema.clone();

        let mut resolved_props = IndexMap::new();
        for (name, prop) in &schema.properties {
            let concrete = self.resolve_schema_or_ref(prop)?;
            resolved_props.insert(name.clone(), SchemaOrRef::Schema(Box::new(concrete)));
        }
        resolved.properties = resolved_props;

        if let Some(ref items) = schema.items {
            let concrete = self.resolve_schema_or_ref(items)?;
            resolved.items = Some(Box::new(SchemaOrRef::Schema(Box::new(concrete))));
        }

        Ok(resolved)
    }

    fn resolve_parameter_or_ref(
        &mut self,
        param: &ParameterOrRef,
    ) -> Result<ParameterOrRef, ResolveError> {
        match param {
            ParameterOrRef::Ref { ref_path } => {
                if !self.visited.insert(ref_path.clone()) {
                    return Err(ResolveError::CircularRef(ref_path.clone()));
                }
                let target = self.lookup_parameter(ref_path)?;
                let resolved = self.resolve_parameter_or_ref(&target)?;
                self.visited.remove(ref_path);
                Ok(resolved)
            }
            ParameterOrRef::Parameter(p) => {
                let mut resolved = p.clone();
                if let Some(ref s) = p.schema {
                    let concrete = self.resolve_schema_or_ref(s)?;
                    resolved.schema = Some(SchemaOrRef::Schema(Box::new(concrete)));
                }
                Ok(ParameterOrRef::Parameter(resolved))
            }
        }
    }

    fn resolve_request_body_or_ref(
        &mut self,
        body: &RequestBodyOrRef,
    ) -> Result<RequestBody, ResolveError> {
        match body {
            RequestBodyOrRef::Ref { ref_path } => {
                if !self.visited.insert(ref_path.clone()) {
                    return Err(ResolveError::CircularRef(ref_path.clone()));
                }
                let target = self.lookup_request_body(ref_path)?;
                let resolved = self.resolve_request_body_or_ref(&target)?;
                self.visited.remove(ref_path);
                Ok(resolved)
            }
            RequestBodyOrRef::RequestBody(rb) => {
                let mut resolved = rb.clone();
                self.resolve_media_types(&mut resolved.content)?;
                Ok(resolved)
            }
        }
    }

    fn resolve_media_types(
        &mut self,
        content: &mut IndexMap<String, MediaType>,
    ) -> Result<(), ResolveError> {
        let keys: Vec<String> = content.keys().cloned().collect();
        for key in keys {
            let mut mt = content[&key].clone();
            if let Some(ref s) = mt.schema {
                let concrete = self.resolve_schema_or_ref(s)?;
                mt.schema = Some(SchemaOrRef::Schema(Box::new(concrete)));
            }
            content.insert(key, mt);
        }
        Ok(())
    }

    // Lookup helpers: a direct key-path walk into the components sections.

    fn lookup_schema(&self, ref_path: &str) -> Result<SchemaOrRef, ResolveError> {
        let name = parse_ref_name(ref_path, "schemas")?;
        self.components
            .and_then(|c| c.schemas.get(name))
            .cloned()
            .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.to_string()))
    }

    fn lookup_parameter(&self, ref_path: &str) -> Result<ParameterOrRef, ResolveError> {
        let name = parse_ref_name(ref_path, "parameters")?;
        self.components
            .and_then(|c| c.parameters.get(name))
            .cloned()
            .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.to_string()))
    }

    fn lookup_request_body(&self, ref_path: &str) -> Result<RequestBodyOrRef, ResolveError> {
        let name = parse_ref_name(ref_path, "requestBodies")?;
        self.components
            .and_then(|c| c.request_bodies.get(name))
            .cloned()
            .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.to_string()))
    }
}

/// Parse a `$ref` path like `#/components/schemas/Foo` and extract the name.
fn parse_ref_name<'a>(ref_path: &'a str, expected_section: &str) -> Result<&'a str, ResolveError> {
    let stripped = ref_path
        .strip_prefix("#/components/")
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))?;
    let (section, name) = stripped
        .split_once('/')
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))?;
    if section != expected_section {
        return Err(ResolveError::InvalidRefFormat(format!(
            "expected section '{}', got '{}' in {}",
            expected_section, section, ref_path
        )));
    }
    Ok(name)
}
