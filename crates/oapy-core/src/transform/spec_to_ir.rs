use crate::error::TransformError;
use crate::ir::*;
use crate::parse::operation::{Operation, PathItem};
use crate::parse::ref_resolve::RefResolver;
use crate::parse::request_body::RequestBodyOrRef;
use crate::parse::spec::OpenApiSpec;

use super::body::extract_body;
use super::classify::classify_parameters;
use super::sanitizer::{IdentTable, normalize_name, route_to_name};

/// Transform a parsed OpenAPI spec into the fully resolved IR.
///
/// Operations come out in document order: path iteration order, then the
/// fixed method order within a path. The ordering carries no meaning but
/// keeps generation reproducible.
pub fn transform(spec: &OpenApiSpec) -> Result<IrSpec, TransformError> {
    // Phase 1: resolve all $ref pointers. A malformed or cyclic reference
    // aborts the whole run.
    let mut resolver = RefResolver::new(spec);
    let resolved = resolver.resolve_spec(spec)?;

    // Phase 2: build one operation descriptor per (path, method).
    let mut fn_names = IdentTable::new();
    let mut operations = Vec::new();
    for (path, item) in &resolved.paths {
        collect_operations(path, item, &mut fn_names, &mut operations);
    }

    let info = IrInfo {
        title: resolved.info.title.clone(),
        description: resolved.info.description.clone(),
        version: resolved.info.version.clone(),
    };

    let servers = resolved
        .servers
        .iter()
        .map(|s| IrServer {
            url: s.url.clone(),
            description: s.description.clone(),
        })
        .collect();

    Ok(IrSpec {
        info,
        servers,
        operations,
    })
}

fn collect_operations(
    path: &str,
    item: &PathItem,
    fn_names: &mut IdentTable,
    out: &mut Vec<IrOperation>,
) {
    macro_rules! add_op {
        ($method:expr, $op:expr) => {
            if let Some(ref op) = $op {
                out.push(build_operation($method, path, item, op, fn_names));
            }
        };
    }

    add_op!(HttpMethod::Get, item.get);
    add_op!(HttpMethod::Post, item.post);
    add_op!(HttpMethod::Put, item.put);
    add_op!(HttpMethod::Patch, item.patch);
    add_op!(HttpMethod::Delete, item.delete);
    add_op!(HttpMethod::Head, item.head);
    add_op!(HttpMethod::Options, item.options);
}

fn build_operation(
    method: HttpMethod,
    path: &str,
    item: &PathItem,
    op: &Operation,
    fn_names: &mut IdentTable,
) -> IrOperation {
    let raw_name = match &op.operation_id {
        Some(id) => normalize_name(id).snake_case,
        None => route_to_name(method.as_str(), path),
    };
    // Function names share one document-scoped table; parameter identifiers
    // below get a fresh table per operation.
    let name = fn_names.claim(&raw_name);

    let mut idents = IdentTable::new();
    let (path_params, query_params) =
        classify_parameters(&item.parameters, &op.parameters, &mut idents);

    let body = match &op.request_body {
        Some(RequestBodyOrRef::RequestBody(rb)) => extract_body(rb, &mut idents),
        // The resolver replaces every reference before this point.
        _ => None,
    };

    IrOperation {
        name,
        method,
        path: path.to_string(),
        summary: op.summary.clone(),
        description: op.description.clone(),
        path_params,
        query_params,
        body,
    }
}
