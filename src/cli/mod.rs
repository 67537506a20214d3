//! # CLI Module
//!
//! Command-line interface of the `dotnet-sdkgen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Generate a C# SDK source tree from an OpenAPI specification:
//!
//! ```bash
//! dotnet-sdkgen generate --spec openapi.yaml --output src/Acme.Payments --namespace Acme.Payments
//! ```
//!
//! Options:
//! - `--spec <FILE>` - Path to OpenAPI specification (required)
//! - `--output <DIR>` - Output directory (or `output` in `sdkgen.toml`)
//! - `--namespace <NS>` - Root C# namespace (default: `Sdk`)
//! - `--config <FILE>` - Generator config file (default: `sdkgen.toml` beside the OpenAPI document)
//! - `--dry-run` - List the files that would be written without touching disk
//!
//! ### `inspect`
//!
//! Print the clients, operations and models a spec would produce:
//!
//! ```bash
//! dotnet-sdkgen inspect --spec openapi.yaml
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use dotnet_sdkgen::cli::{run_cli, Cli};
//! use clap::Parser;
//!
//! run_cli(Cli::parse())?;
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{describe_sdk, run_cli, Cli, Commands};
