//! Error types for a generation run.
//!
//! Only conditions that make the output unusable are errors. Underspecified
//! schemas, unresolved schema references and unrecognised status codes
//! degrade to fallback types and are reported through `tracing` instead.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a generation run.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// No output directory was configured
    #[error("output directory is required")]
    MissingOutputDir,

    /// Generator configuration file could not be read or parsed
    #[error("invalid generator config '{path}': {message}")]
    Config { path: PathBuf, message: String },

    /// The OpenAPI document could not be loaded
    #[error("failed to load spec '{path}': {message}")]
    Spec { path: PathBuf, message: String },

    /// The document declares no operations, so no client can be produced
    #[error("spec contains no operations")]
    NoOperations,

    /// A parameter `$ref` does not name a component parameter
    #[error("operation '{operation}': unresolved parameter reference '{reference}'")]
    UnresolvedParameter { operation: String, reference: String },

    /// A request body `$ref` does not name a component request body
    #[error("operation '{operation}': unresolved request body reference '{reference}'")]
    UnresolvedRequestBody { operation: String, reference: String },

    /// A template failed to render
    #[error("failed to render template '{template}': {source}")]
    Render {
        template: String,
        #[source]
        source: askama::Error,
    },

    /// Writing or cleaning the output tree failed
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used across the generator.
pub type Result<T> = std::result::Result<T, GenerateError>;
