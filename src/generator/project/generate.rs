use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::GeneratorConfig;
use crate::error::{GenerateError, Result};
use crate::generator::clients::build_clients;
use crate::generator::context::GenerationContext;
use crate::generator::models::{build_models, drain_inline_models, finalize_models};
use crate::generator::records::{ApiVersionRecord, RootRecord, SdkDefinition};
use crate::generator::templates::{
    render_api_version, render_client, render_model, render_root_client,
};
use crate::naming::csharp_string_literal;
use crate::spec::{load_spec, ApiDocument};

use super::clean::{clean_generated_files, find_generated_files, GENERATED_SUFFIX};

/// Knobs of a single run that are not part of the generated output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Report planned files without touching the output directory
    pub dry_run: bool,
}

/// One rendered file, addressed relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub relative_path: PathBuf,
    pub contents: String,
}

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub output_dir: PathBuf,
    /// Files written (or planned, on a dry run), in emission order
    pub files: Vec<PathBuf>,
    /// Stale generated files removed (or that would be removed)
    pub removed: Vec<PathBuf>,
    pub models: usize,
    pub clients: usize,
    pub operations: usize,
    pub dry_run: bool,
}

/// Build the complete SDK definition for `doc`.
///
/// Named models are classified first so that operation-level references
/// resolve; inline models queued by either pass are synthesized afterwards.
pub fn build_sdk(doc: &ApiDocument, config: &GeneratorConfig) -> Result<SdkDefinition> {
    let mut ctx = GenerationContext::new(&doc.schemas);
    let mut models = build_models(&mut ctx);
    let root_class = config.root_client_name();
    let mut clients = build_clients(doc, &mut ctx)?;
    let mut client_names: BTreeSet<String> = clients.iter().map(|c| c.client_name.clone()).collect();
    for client in &mut clients {
        if client.class_name() == root_class {
            let renamed = unique_client_name(&mut client_names, &format!("{}Api", client.client_name));
            tracing::warn!(client = %client.client_name, %renamed, "client class clashes with the root client");
            client.client_name = renamed;
        }
    }
    clients.sort_by(|a, b| a.client_name.cmp(&b.client_name));
    models.extend(drain_inline_models(&mut ctx));
    let models = finalize_models(&ctx, models);

    let version = doc.api_version();
    Ok(SdkDefinition {
        models,
        root: RootRecord {
            namespace: config.namespace.clone(),
            class_name: root_class,
            clients,
        },
        api_version: ApiVersionRecord {
            namespace: config.namespace.clone(),
            version_literal: csharp_string_literal(&version),
            version,
        },
    })
}

// `base`, then `base2`, `base3`, ... skipping names already used by other clients.
fn unique_client_name(used: &mut BTreeSet<String>, base: &str) -> String {
    if used.insert(base.to_string()) {
        return base.to_string();
    }
    let mut index = 2usize;
    loop {
        let candidate = format!("{base}{index}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        index += 1;
    }
}

fn generated_name(stem: &str) -> String {
    format!("{stem}{GENERATED_SUFFIX}")
}

/// Render every file of the SDK: models, clients, the root client, then the API version.
pub fn render_sdk(sdk: &SdkDefinition) -> Result<Vec<GeneratedFile>> {
    let namespace = sdk.root.namespace.as_str();
    let mut files = Vec::with_capacity(sdk.models.len() + sdk.clients().len() + 2);

    for model in &sdk.models {
        files.push(GeneratedFile {
            relative_path: Path::new("Models").join(generated_name(&model.name)),
            contents: render_model(namespace, model)?,
        });
    }
    for client in sdk.clients() {
        files.push(GeneratedFile {
            relative_path: PathBuf::from(generated_name(&client.class_name())),
            contents: render_client(namespace, client)?,
        });
    }
    files.push(GeneratedFile {
        relative_path: PathBuf::from(generated_name(&sdk.root.class_name)),
        contents: render_root_client(&sdk.root)?,
    });
    files.push(GeneratedFile {
        relative_path: Path::new("Http").join(generated_name("ApiVersion")),
        contents: render_api_version(&sdk.api_version)?,
    });
    Ok(files)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| GenerateError::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| GenerateError::io(path, e))?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}

/// Emit an already loaded document into `config.output_dir`.
///
/// Stale `*.g.cs` files are removed before writing, except under `bin/` and
/// `obj/`. On a dry run nothing is created, removed or written.
pub fn generate_sdk(
    doc: &ApiDocument,
    config: &GeneratorConfig,
    options: GenerateOptions,
) -> Result<GenerationReport> {
    config.validate()?;
    let sdk = build_sdk(doc, config)?;
    let files = render_sdk(&sdk)?;
    let output_dir = config.output_dir.clone();

    let removed = if options.dry_run {
        find_generated_files(&output_dir)?
    } else {
        fs::create_dir_all(&output_dir).map_err(|e| GenerateError::io(&output_dir, e))?;
        clean_generated_files(&output_dir)?
    };

    let mut written = Vec::with_capacity(files.len());
    for file in &files {
        let path = output_dir.join(&file.relative_path);
        if !options.dry_run {
            write_file(&path, &file.contents)?;
        }
        written.push(path);
    }

    let report = GenerationReport {
        output_dir,
        files: written,
        removed,
        models: sdk.models.len(),
        clients: sdk.clients().len(),
        operations: sdk.clients().iter().map(|c| c.operations.len()).sum(),
        dry_run: options.dry_run,
    };
    tracing::info!(
        output = %report.output_dir.display(),
        files = report.files.len(),
        removed = report.removed.len(),
        models = report.models,
        clients = report.clients,
        operations = report.operations,
        dry_run = report.dry_run,
        "sdk generation finished"
    );
    Ok(report)
}

/// Load `spec_path` and emit the SDK it describes.
pub fn generate_sdk_from_spec(
    spec_path: &Path,
    config: &GeneratorConfig,
    options: GenerateOptions,
) -> Result<GenerationReport> {
    let doc = load_spec(spec_path)?;
    tracing::info!(
        spec = %spec_path.display(),
        title = %doc.spec.info.title,
        version = %doc.api_version(),
        operations = doc.operation_count(),
        "loaded spec"
    );
    generate_sdk(&doc, config, options)
}
