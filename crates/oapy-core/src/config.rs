use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level project configuration loaded from `.oapy.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OapyConfig {
    /// Output file for the generated client.
    pub output: String,
    pub client: ClientConfig,
}

impl Default for OapyConfig {
    fn default() -> Self {
        Self {
            output: "generated_client.py".to_string(),
            client: ClientConfig::default(),
        }
    }
}

/// Client generation options. Everything here has a deterministic default
/// derived from the spec document itself.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Overrides `servers[0].url` from the spec.
    pub base_url: Option<String>,
    /// Environment variable the generated constructor reads the API key from.
    pub api_key_env: Option<String>,
    /// Name of the generated client class.
    pub class_name: Option<String>,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".oapy.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<OapyConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: OapyConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# oapy configuration
output: generated_client.py

client:
  # base_url: https://api.example.com   # overrides servers[0].url
  # api_key_env: MY_SERVICE_API_KEY     # defaults to <TITLE>_API_KEY
  # class_name: MyServiceClient         # defaults to <Title>Client
"#
}
