use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{load_file_config, resolve_config_path, GeneratorConfig};
use crate::generator::{
    build_sdk, generate_sdk, GenerateOptions, GenerationReport, ModelKind, SdkDefinition,
};
use crate::spec::load_spec;

/// Command-line interface for the C# SDK generator
#[derive(Parser, Debug)]
#[command(name = "dotnet-sdkgen")]
#[command(about = "Generate a typed C# client SDK from an OpenAPI document", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log at debug level (overrides SDKGEN_LOG_LEVEL)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the SDK source tree
    Generate {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Output directory; falls back to `output` in the config file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Root C# namespace; falls back to the config file, then `Sdk`
        #[arg(short, long, env = "SDKGEN_NAMESPACE")]
        namespace: Option<String>,

        /// Generator config file (default: sdkgen.toml beside the OpenAPI document)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Perform a dry run: list the files that would be written
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Print the clients, operations and models a spec produces
    Inspect {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Root C# namespace used for naming the root client
        #[arg(short, long, env = "SDKGEN_NAMESPACE")]
        namespace: Option<String>,
    },
}

/// Execute a parsed command line.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            spec,
            output,
            namespace,
            config,
            dry_run,
        } => {
            let report = run_generate(
                &spec,
                output.as_deref(),
                namespace.as_deref(),
                config.as_deref(),
                dry_run,
            )?;
            print!("{}", describe_report(&report));
            Ok(())
        }
        Commands::Inspect { spec, namespace } => {
            let doc = load_spec(&spec)?;
            let config = GeneratorConfig::new(".", namespace.unwrap_or_default());
            let sdk = build_sdk(&doc, &config)
                .with_context(|| format!("Failed to build SDK model for {}", spec.display()))?;
            print!("{}", describe_sdk(&sdk));
            Ok(())
        }
    }
}

fn run_generate(
    spec: &Path,
    output: Option<&Path>,
    namespace: Option<&str>,
    config: Option<&Path>,
    dry_run: bool,
) -> anyhow::Result<GenerationReport> {
    let file_config = match resolve_config_path(config, spec)? {
        Some(path) => load_file_config(&path)?,
        None => None,
    };
    let config = GeneratorConfig::resolve(output, namespace, file_config.as_ref())?;
    let doc = load_spec(spec)?;
    let report = generate_sdk(&doc, &config, GenerateOptions { dry_run })
        .with_context(|| format!("Failed to generate SDK from {}", spec.display()))?;
    Ok(report)
}

fn describe_report(report: &GenerationReport) -> String {
    let mut out = String::new();
    let verb = if report.dry_run { "Would write" } else { "Wrote" };
    for path in &report.files {
        out.push_str(&format!("{verb} {}\n", path.display()));
    }
    if report.dry_run {
        for path in &report.removed {
            out.push_str(&format!("Would remove {}\n", path.display()));
        }
    }
    out.push_str(&format!(
        "{} models, {} clients, {} operations in {}\n",
        report.models,
        report.clients,
        report.operations,
        report.output_dir.display()
    ));
    out
}

/// Human-readable summary of an SDK definition.
pub fn describe_sdk(sdk: &SdkDefinition) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}.{} (API version {})\n",
        sdk.root.namespace, sdk.root.class_name, sdk.api_version.version
    ));
    for client in sdk.clients() {
        out.push_str(&format!("\n{}\n", client.class_name()));
        for op in &client.operations {
            out.push_str(&format!(
                "  {:<7} {:<40} {}Async -> {} [{}]\n",
                op.http_method, op.path, op.method_name, op.return_type, op.response_mode
            ));
            for error in &op.error_mappings {
                out.push_str(&format!(
                    "          {} => {}\n",
                    error.switch_pattern(),
                    error.error_type
                ));
            }
        }
    }
    out.push_str(&format!("\nModels ({})\n", sdk.models.len()));
    for model in &sdk.models {
        let kind = match &model.kind {
            ModelKind::Object(object) => format!("class, {} properties", object.properties.len()),
            ModelKind::Enum(enumeration) => format!("enum, {} members", enumeration.members.len()),
        };
        out.push_str(&format!("  {} ({kind})\n", model.name));
    }
    out
}
