//! # dotnet-sdkgen
//!
//! **dotnet-sdkgen** derives a typed C# client library from an
//! [OpenAPI 3.x](https://spec.openapis.org/oas/v3.1.0) document.
//!
//! ## Overview
//!
//! The heart of the crate is a schema/type resolution and model-assembly
//! engine. It turns an arbitrary, possibly cyclic, possibly underspecified
//! schema graph into a deterministic set of named C# types, groups operations
//! into clients by tag, and computes every call signature, response type and
//! error mapping. Identical input produces byte-identical output.
//!
//! ## Architecture
//!
//! - **[`spec`]** - Document loading (YAML/JSON) and by-name `$ref` resolution
//! - **[`naming`]** - Identifier normalization into valid, keyword-safe C# names
//! - **[`generator`]** - Type resolver, model and client assemblers, templates and emission
//! - **[`config`]** - Output directory and namespace, from `sdkgen.toml` and flags
//! - **[`error`]** - [`GenerateError`], the failures that abort a run
//! - **[`logging`]** - `tracing` subscriber setup for the binary
//! - **[`cli`]** - The `dotnet-sdkgen` command line
//!
//! ### Generation Flow
//!
//! ```text
//! load_spec ─▶ build_models ─▶ build_clients ─▶ drain_inline_models ─▶ render_sdk ─▶ *.g.cs
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! dotnet-sdkgen generate --spec openapi.yaml --output src/Acme.Payments --namespace Acme.Payments
//! ```
//!
//! The generated code targets a small hand-written runtime (`ApiClient`,
//! `RequestBuilder`, `ApiResponse<T>`) that lives in the consuming project;
//! the root client is emitted as a `partial` class that this runtime completes.

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod naming;
pub mod spec;

pub use config::GeneratorConfig;
pub use error::{GenerateError, Result};
pub use generator::{generate_sdk, generate_sdk_from_spec, GenerateOptions, GenerationReport};
pub use spec::{load_spec, ApiDocument};
