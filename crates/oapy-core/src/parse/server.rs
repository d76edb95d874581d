use serde::{Deserialize, Serialize};

/// A server URL definition. `servers[0].url` supplies the base URL of the
/// generated client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
