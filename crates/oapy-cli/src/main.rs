use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use oapy_client::PythonClientGenerator;
use oapy_core::config::{self, CONFIG_FILE_NAME, OapyConfig};
use oapy_core::ir::IrSpec;
use oapy_core::{CodeGenerator, parse, transform};

#[derive(Parser)]
#[command(name = "oapy", about = "OpenAPI client generator for Python", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a Python client from an OpenAPI spec
    Generate {
        /// Path to the OpenAPI spec file (YAML or JSON)
        spec: PathBuf,

        /// Output file for the generated client
        output: Option<PathBuf>,
    },

    /// Validate an OpenAPI spec
    Validate {
        /// Path to the OpenAPI spec file
        spec: PathBuf,
    },

    /// Initialize a new oapy configuration
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { spec, output } => cmd_generate(&spec, output),

        Commands::Validate { spec } => cmd_validate(&spec),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "oapy", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<OapyConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn load_spec(path: &Path) -> Result<IrSpec> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let parsed = match ext {
        "json" => parse::from_json(&content)?,
        _ => parse::from_yaml(&content)?,
    };

    let ir = transform::transform(&parsed)?;
    Ok(ir)
}

fn cmd_generate(spec_path: &Path, output: Option<PathBuf>) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let output = output.unwrap_or_else(|| PathBuf::from(&cfg.output));

    let ir = load_spec(spec_path)?;
    let files = PythonClientGenerator.generate(&ir, &cfg.client)?;

    // The Python generator emits a single file; write it at the requested path.
    for file in &files {
        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&output, &file.content)
            .with_context(|| format!("failed to write {}", output.display()))?;
        eprintln!("  wrote {}", output.display());
    }

    eprintln!(
        "Generated {} callables from {}",
        ir.operations.len(),
        spec_path.display()
    );
    eprintln!("The generated file should not be edited manually — changes will be overwritten.");
    Ok(())
}

fn cmd_validate(spec_path: &Path) -> Result<()> {
    let content = fs::read_to_string(spec_path)
        .with_context(|| format!("failed to read {}", spec_path.display()))?;

    let ext = spec_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("yaml");

    let parsed = match ext {
        "json" => parse::from_json(&content)?,
        _ => parse::from_yaml(&content)?,
    };

    eprintln!(
        "Valid OpenAPI {} spec: {}",
        parsed.openapi, parsed.info.title
    );
    eprintln!("  Version: {}", parsed.info.version);
    eprintln!("  Paths: {}", parsed.paths.len());

    // Also confirm that references resolve and operations transform.
    let ir = transform::transform(&parsed)?;
    eprintln!("  Operations: {}", ir.operations.len());

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
