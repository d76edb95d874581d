use thiserror::Error;

use oapy_core::config::ClientConfig;
use oapy_core::ir::IrSpec;
use oapy_core::{CodeGenerator, GeneratedFile};

use crate::emitters;

/// Base URL used when the spec declares no servers and the config supplies
/// no override.
pub const DEFAULT_BASE_URL: &str = "https://api.example.com";

/// Default file name for the generated client.
pub const DEFAULT_OUTPUT_FILE: &str = "generated_client.py";

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("template rendering failed: {0}")]
    Template(#[from] minijinja::Error),
}

/// Python client generator: one file, one class, one method per operation.
pub struct PythonClientGenerator;

impl CodeGenerator for PythonClientGenerator {
    type Config = ClientConfig;
    type Error = EmitError;

    fn generate(
        &self,
        ir: &IrSpec,
        config: &ClientConfig,
    ) -> Result<Vec<GeneratedFile>, EmitError> {
        let content = emitters::client::emit_client(ir, config)?;
        Ok(vec![GeneratedFile {
            path: DEFAULT_OUTPUT_FILE.to_string(),
            content,
        }])
    }
}
