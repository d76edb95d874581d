use serde::{Deserialize, Serialize};

use super::schema::SchemaOrRef;

/// A media type object: one request-body encoding and its schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrRef>,
}
