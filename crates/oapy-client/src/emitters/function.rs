use oapy_core::ir::{BodyKind, IrOperation, IrRequestBody};

const INDENT: &str = "    ";

/// One rendered callable: a flat list of pre-indented Python source lines.
/// Keeping the whole body as structured lines (instead of ad-hoc fragment
/// concatenation) centralizes indentation and ordering in one place.
#[derive(Debug, Clone)]
pub struct PyFunction {
    pub lines: Vec<String>,
}

/// Render one operation descriptor into a method of the generated client
/// class. Statement order: docstring, required-argument validation, endpoint
/// path, query bundle, body bundles, dispatch.
pub fn synthesize_function(op: &IrOperation) -> PyFunction {
    let mut lines = Vec::new();
    let body_indent = format!("{INDENT}{INDENT}");

    lines.push(format!("{INDENT}def {}({}):", op.name, signature(op)));
    push_docstring(op, &body_indent, &mut lines);
    push_required_checks(op, &body_indent, &mut lines);
    push_path(op, &body_indent, &mut lines);

    let mut dispatch_args = vec![format!("\"{}\"", op.method.as_str()), "path".to_string()];

    if !op.query_params.is_empty() {
        push_query_bundle(op, &body_indent, &mut lines);
        dispatch_args.push("params=params".to_string());
    }

    if let Some(body) = &op.body {
        match body.kind {
            BodyKind::Json | BodyKind::Other => {
                if body.kind == BodyKind::Other {
                    lines.push(format!(
                        "{body_indent}# NOTE: content type \"{}\" is not supported; body is encoded as JSON",
                        body.content_type
                    ));
                }
                if !body.fields.is_empty() {
                    push_json_payload(body, &body_indent, &mut lines);
                    dispatch_args.push("json=payload".to_string());
                }
            }
            BodyKind::Multipart => {
                let has_files = body.fields.iter().any(|f| f.is_file);
                let has_form = body.fields.iter().any(|f| !f.is_file);
                if has_files {
                    push_files_bundle(body, &body_indent, &mut lines);
                    dispatch_args.push("files=files or None".to_string());
                }
                if has_form {
                    push_form_bundle(body, &body_indent, &mut lines);
                    dispatch_args.push("data=data".to_string());
                }
            }
        }
    }

    lines.push(format!(
        "{body_indent}return self._request({})",
        dispatch_args.join(", ")
    ));

    PyFunction { lines }
}

/// Signature order: required path parameters, required body fields, then
/// query parameters and optional body fields with a `None` default. Query
/// parameters always default to `None`; those the spec marks required are
/// enforced by the call-time checks instead.
fn signature(op: &IrOperation) -> String {
    let mut parts = vec!["self".to_string()];
    for p in &op.path_params {
        parts.push(p.ident.clone());
    }
    if let Some(body) = &op.body {
        for f in body.fields.iter().filter(|f| f.required) {
            parts.push(f.ident.clone());
        }
    }
    for p in &op.query_params {
        parts.push(format!("{}=None", p.ident));
    }
    if let Some(body) = &op.body {
        for f in body.fields.iter().filter(|f| !f.required) {
            parts.push(format!("{}=None", f.ident));
        }
    }
    parts.join(", ")
}

fn push_docstring(op: &IrOperation, ind: &str, lines: &mut Vec<String>) {
    lines.push(format!("{ind}\"\"\"{} {}", op.method.as_str(), op.path));

    if let Some(summary) = &op.summary {
        lines.push(String::new());
        lines.push(format!("{ind}{}", escape_docstring(summary)));
    }

    let mut doc_params: Vec<(String, &str, Option<&str>)> = Vec::new();
    for p in &op.path_params {
        doc_params.push((p.ident.clone(), "path", p.description.as_deref()));
    }
    for p in &op.query_params {
        doc_params.push((p.ident.clone(), "query", p.description.as_deref()));
    }
    if let Some(body) = &op.body {
        for f in &body.fields {
            doc_params.push((f.ident.clone(), "body", f.description.as_deref()));
        }
    }

    if !doc_params.is_empty() {
        lines.push(String::new());
        lines.push(format!("{ind}Parameters:"));
        for (ident, location, description) in doc_params {
            let entry = format!(
                "{ind}  :param {ident}: ({location}) {}",
                escape_docstring(description.unwrap_or(""))
            );
            lines.push(entry.trim_end().to_string());
        }
    }

    lines.push(format!("{ind}\"\"\""));
}

/// Every parameter the spec marks required raises before any network call.
/// Path parameters are positional, but an explicit `None` still fails here.
fn push_required_checks(op: &IrOperation, ind: &str, lines: &mut Vec<String>) {
    let mut required = Vec::new();
    for p in &op.path_params {
        required.push(p.ident.as_str());
    }
    for p in op.query_params.iter().filter(|p| p.required) {
        required.push(p.ident.as_str());
    }
    if let Some(body) = &op.body {
        for f in body.fields.iter().filter(|f| f.required) {
            required.push(f.ident.as_str());
        }
    }
    for ident in required {
        lines.push(format!("{ind}if {ident} is None:"));
        lines.push(format!(
            "{ind}{INDENT}raise ValueError(\"{ident} is required\")"
        ));
    }
}

/// The endpoint path as an f-string, with every original `{placeholder}`
/// replaced by its sanitized call-time identifier.
fn push_path(op: &IrOperation, ind: &str, lines: &mut Vec<String>) {
    if op.path_params.is_empty() {
        lines.push(format!("{ind}path = \"{}\"", op.path));
        return;
    }
    let mut fstring = op.path.clone();
    for p in &op.path_params {
        fstring = fstring.replace(
            &format!("{{{}}}", p.original_name),
            &format!("{{{}}}", p.ident),
        );
    }
    lines.push(format!("{ind}path = f\"{fstring}\""));
}

/// Query bundle keyed by original spec names; absent values dropped before
/// the request goes out.
fn push_query_bundle(op: &IrOperation, ind: &str, lines: &mut Vec<String>) {
    lines.push(format!("{ind}params = {{"));
    for p in &op.query_params {
        lines.push(format!("{ind}{INDENT}\"{}\": {},", p.original_name, p.ident));
    }
    lines.push(format!("{ind}}}"));
    lines.push(format!(
        "{ind}params = {{k: v for k, v in params.items() if v is not None}}"
    ));
}

fn push_json_payload(body: &IrRequestBody, ind: &str, lines: &mut Vec<String>) {
    lines.push(format!("{ind}payload = {{"));
    for f in &body.fields {
        lines.push(format!("{ind}{INDENT}\"{}\": {},", f.original_name, f.ident));
    }
    lines.push(format!("{ind}}}"));
    lines.push(format!(
        "{ind}payload = {{k: v for k, v in payload.items() if v is not None}}"
    ));
}

/// Binary payloads. An array-of-files field explodes into indexed keys
/// `name[0]`, `name[1]`, ...
fn push_files_bundle(body: &IrRequestBody, ind: &str, lines: &mut Vec<String>) {
    lines.push(format!("{ind}files = {{}}"));
    for f in body.fields.iter().filter(|f| f.is_file) {
        lines.push(format!("{ind}if {} is not None:", f.ident));
        if f.is_file_array {
            lines.push(format!(
                "{ind}{INDENT}for _i, _file in enumerate({}):",
                f.ident
            ));
            lines.push(format!(
                "{ind}{INDENT}{INDENT}files[f\"{}[{{_i}}]\"] = _file",
                f.original_name
            ));
        } else {
            lines.push(format!(
                "{ind}{INDENT}files[\"{}\"] = {}",
                f.original_name, f.ident
            ));
        }
    }
}

/// Scalar form fields, coerced to text. An empty bundle is sent as absent,
/// not as an empty dict.
fn push_form_bundle(body: &IrRequestBody, ind: &str, lines: &mut Vec<String>) {
    lines.push(format!("{ind}data = {{}}"));
    for f in body.fields.iter().filter(|f| !f.is_file) {
        lines.push(format!("{ind}if {} is not None:", f.ident));
        lines.push(format!(
            "{ind}{INDENT}data[\"{}\"] = str({})",
            f.original_name, f.ident
        ));
    }
    lines.push(format!("{ind}data = data or None"));
}

/// Escape `"""` sequences that would prematurely close the docstring.
fn escape_docstring(value: &str) -> String {
    value.replace("\"\"\"", "\\\"\\\"\\\"").replace('\n', " ")
}
