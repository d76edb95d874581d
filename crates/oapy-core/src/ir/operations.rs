/// HTTP method, in the fixed iteration order the document driver uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

/// The operation descriptor: everything the function synthesizer needs to
/// render one callable. Built fresh per operation and discarded after its
/// code is emitted.
#[derive(Debug, Clone)]
pub struct IrOperation {
    /// Generated function name (snake case, document-unique).
    pub name: String,
    pub method: HttpMethod,
    pub path: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    /// Path parameters, in merged first-appearance order. Always required.
    pub path_params: Vec<IrParameter>,
    /// Query parameters, in merged first-appearance order.
    pub query_params: Vec<IrParameter>,
    pub body: Option<IrRequestBody>,
}

/// A classified path or query parameter.
#[derive(Debug, Clone)]
pub struct IrParameter {
    /// Sanitized, collision-free identifier used in the generated signature.
    pub ident: String,
    /// The name as declared in the spec, used for URL placeholders and query
    /// keys.
    pub original_name: String,
    pub description: Option<String>,
    pub required: bool,
}

/// How the request body is encoded on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Multipart,
    /// Anything else. Emitted JSON-style with an explicit note rather than
    /// silently mis-encoded.
    Other,
}

/// The selected request body: one content type, flat field list.
#[derive(Debug, Clone)]
pub struct IrRequestBody {
    pub content_type: String,
    pub kind: BodyKind,
    pub fields: Vec<IrBodyField>,
}

/// One property of the selected body schema.
#[derive(Debug, Clone)]
pub struct IrBodyField {
    pub ident: String,
    pub original_name: String,
    pub description: Option<String>,
    pub required: bool,
    pub is_file: bool,
    pub is_file_array: bool,
}
