//! Generator configuration.
//!
//! Settings come from two places: an optional `sdkgen.toml` that sits next to
//! the OpenAPI spec (or is passed explicitly), and CLI flags. Flags always win
//! over the file; the file wins over built-in defaults.
//!
//! ```toml
//! # sdkgen.toml
//! namespace = "Acme.Payments"
//! output = "src/Acme.Payments"
//! ```

use crate::error::{GenerateError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "Sdk";

/// File name looked up beside the OpenAPI document when no config path is given.
pub const CONFIG_FILE_NAME: &str = "sdkgen.toml";

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Directory receiving generated files; created if absent
    pub output_dir: PathBuf,
    /// Root C# namespace of the generated code
    pub namespace: String,
}

impl GeneratorConfig {
    /// Build a config, falling back to [`DEFAULT_NAMESPACE`] for an empty namespace.
    pub fn new(output_dir: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        GeneratorConfig {
            output_dir: output_dir.into(),
            namespace: if namespace.trim().is_empty() {
                DEFAULT_NAMESPACE.to_string()
            } else {
                namespace
            },
        }
    }

    /// Reject configurations that cannot produce output.
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(GenerateError::MissingOutputDir);
        }
        Ok(())
    }

    /// Merge CLI values over an optional file config.
    ///
    /// Returns [`GenerateError::MissingOutputDir`] when neither source names
    /// an output directory.
    pub fn resolve(
        output: Option<&Path>,
        namespace: Option<&str>,
        file: Option<&FileConfig>,
    ) -> Result<Self> {
        let output_dir = output
            .map(Path::to_path_buf)
            .or_else(|| file.and_then(|f| f.output.clone()))
            .ok_or(GenerateError::MissingOutputDir)?;
        let namespace = namespace
            .map(str::to_string)
            .or_else(|| file.and_then(|f| f.namespace.clone()))
            .unwrap_or_default();
        let config = GeneratorConfig::new(output_dir, namespace);
        config.validate()?;
        Ok(config)
    }

    /// Class name of the root client aggregator, derived from the last namespace segment.
    pub fn root_client_name(&self) -> String {
        let last = self.namespace.rsplit('.').next().unwrap_or(&self.namespace);
        format!("{}Client", crate::naming::pascal_identifier(last))
    }
}

/// Contents of `sdkgen.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileConfig {
    /// Root namespace override
    #[serde(default)]
    pub namespace: Option<String>,
    /// Output directory override
    #[serde(default)]
    pub output: Option<PathBuf>,
}

/// Load a generator config file.
///
/// Returns `Ok(None)` when the file does not exist and an error when it exists
/// but cannot be read or parsed.
pub fn load_file_config(config_path: &Path) -> Result<Option<FileConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }
    let contents =
        std::fs::read_to_string(config_path).map_err(|e| GenerateError::Config {
            path: config_path.to_path_buf(),
            message: e.to_string(),
        })?;
    let mut config: FileConfig = toml::from_str(&contents).map_err(|e| GenerateError::Config {
        path: config_path.to_path_buf(),
        message: e.to_string(),
    })?;
    // A relative output directory is taken relative to the config file.
    if let (Some(output), Some(base)) = (config.output.as_mut(), config_path.parent()) {
        if output.is_relative() {
            *output = base.join(&*output);
        }
    }
    tracing::debug!(path = %config_path.display(), ?config, "loaded generator config");
    Ok(Some(config))
}

/// Resolve the config file path.
///
/// Priority:
/// 1. Explicitly provided path (must exist)
/// 2. `sdkgen.toml` beside the OpenAPI document
/// 3. None
pub fn resolve_config_path(explicit_path: Option<&Path>, spec_path: &Path) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit_path {
        if !path.exists() {
            return Err(GenerateError::Config {
                path: path.to_path_buf(),
                message: "file does not exist".to_string(),
            });
        }
        return Ok(Some(path.to_path_buf()));
    }
    Ok(spec_path
        .parent()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|p| p.exists()))
}
