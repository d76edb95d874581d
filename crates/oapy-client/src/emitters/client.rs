use minijinja::{Environment, context};

use oapy_core::config::ClientConfig;
use oapy_core::ir::IrSpec;
use oapy_core::transform::sanitizer::normalize_name;

use crate::emitters::function::synthesize_function;
use crate::generator::{DEFAULT_BASE_URL, EmitError};

/// Emit the generated client file: module header, shared `ApiError` and
/// `_request` primitive, and one method per operation, in document order.
pub fn emit_client(ir: &IrSpec, config: &ClientConfig) -> Result<String, EmitError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.add_template("client.py.j2", include_str!("../../templates/client.py.j2"))?;
    let tmpl = env.get_template("client.py.j2")?;

    let functions: Vec<minijinja::Value> = ir
        .operations
        .iter()
        .map(|op| context! { lines => synthesize_function(op).lines })
        .collect();

    let rendered = tmpl.render(context! {
        title => ir.info.title.clone(),
        version => ir.info.version.clone(),
        class_name => class_name(ir, config),
        base_url => base_url(ir, config),
        api_key_env => api_key_env(ir, config),
        functions => functions,
    })?;

    Ok(rendered)
}

/// `servers[0].url` (trailing slash trimmed) unless the config overrides it;
/// hardcoded fallback when the spec declares no servers.
fn base_url(ir: &IrSpec, config: &ClientConfig) -> String {
    if let Some(url) = &config.base_url {
        return url.trim_end_matches('/').to_string();
    }
    ir.servers
        .first()
        .map(|s| s.url.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

fn class_name(ir: &IrSpec, config: &ClientConfig) -> String {
    if let Some(name) = &config.class_name {
        return name.clone();
    }
    format!("{}Client", normalize_name(&ir.info.title).pascal_case)
}

fn api_key_env(ir: &IrSpec, config: &ClientConfig) -> String {
    if let Some(name) = &config.api_key_env {
        return name.clone();
    }
    let mut env = normalize_name(&ir.info.title).screaming_snake;
    // "CORPUS_QUERY_API" + "_API_KEY" would read API twice.
    if env.ends_with("_API") {
        env.push_str("_KEY");
    } else {
        env.push_str("_API_KEY");
    }
    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use oapy_core::ir::{IrInfo, IrServer};

    fn ir_with_servers(servers: Vec<IrServer>) -> IrSpec {
        IrSpec {
            info: IrInfo {
                title: "Corpus Query API".to_string(),
                description: None,
                version: "1.0".to_string(),
            },
            servers,
            operations: Vec::new(),
        }
    }

    #[test]
    fn base_url_trims_trailing_slash() {
        let ir = ir_with_servers(vec![IrServer {
            url: "https://api.example.com/".to_string(),
            description: None,
        }]);
        assert_eq!(base_url(&ir, &ClientConfig::default()), "https://api.example.com");
    }

    #[test]
    fn base_url_falls_back_without_servers() {
        let ir = ir_with_servers(Vec::new());
        assert_eq!(base_url(&ir, &ClientConfig::default()), DEFAULT_BASE_URL);
    }

    #[test]
    fn config_overrides_win() {
        let ir = ir_with_servers(Vec::new());
        let config = ClientConfig {
            base_url: Some("https://override.example.com/".to_string()),
            api_key_env: Some("MY_KEY".to_string()),
            class_name: Some("MyClient".to_string()),
        };
        assert_eq!(base_url(&ir, &config), "https://override.example.com");
        assert_eq!(api_key_env(&ir, &config), "MY_KEY");
        assert_eq!(class_name(&ir, &config), "MyClient");
    }

    #[test]
    fn derived_names_come_from_the_title() {
        let ir = ir_with_servers(Vec::new());
        let config = ClientConfig::default();
        assert_eq!(class_name(&ir, &config), "CorpusQueryApiClient");
        assert_eq!(api_key_env(&ir, &config), "CORPUS_QUERY_API_KEY");
    }
}
