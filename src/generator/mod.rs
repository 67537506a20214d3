//! # Generator Module
//!
//! Turns a parsed OpenAPI document into the source tree of a typed C# client
//! library.
//!
//! ## Overview
//!
//! One run produces:
//! - **Models** - a class or string enum per named component schema, plus one
//!   class per anonymous composite schema found inline
//! - **Clients** - one `{Tag}Client` class per first operation tag (untagged
//!   operations go to `CoreClient`) with an async and a sync method per operation
//! - **Root client** - a partial class exposing every client as a property
//! - **API version** - the document's `info.version` as a constant
//!
//! ## Architecture
//!
//! ```text
//! ApiDocument → classify schemas → build clients → drain inline models → records → templates → files
//! ```
//!
//! 1. **Model assembly** ([`models`]) - reserves a C# name for every component
//!    schema and decides whether it is an alias, an object or an enum
//! 2. **Type resolution** ([`resolve`]) - maps schema nodes to C# types; anonymous
//!    composite schemas are queued on the [`GenerationContext`] work-list
//! 3. **Client assembly** ([`clients`]) - groups operations and resolves their
//!    parameters, bodies, responses and error mappings
//! 4. **Rendering** ([`templates`]) - Askama templates under `templates/`
//! 5. **Emission** ([`project`]) - cleans stale `*.g.cs` files and writes the tree
//!
//! All mutable state of a run lives in one [`GenerationContext`], so identical
//! input always yields byte-identical output.
//!
//! ## Generated Structure
//!
//! ```text
//! out/
//! ├── Models/
//! │   └── *.g.cs              # One file per model
//! ├── Http/
//! │   └── ApiVersion.g.cs     # API version constant
//! ├── *Client.g.cs            # One file per client
//! └── {Root}Client.g.cs       # Root aggregator
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dotnet_sdkgen::config::GeneratorConfig;
//! use dotnet_sdkgen::generator::{generate_sdk_from_spec, GenerateOptions};
//!
//! let config = GeneratorConfig::new("out", "Acme.Payments");
//! let report = generate_sdk_from_spec("openapi.yaml".as_ref(), &config, GenerateOptions::default())?;
//! println!("wrote {} files", report.files.len());
//! ```
//!
//! ## Templates
//!
//! - `model_class.cs.txt` - object models
//! - `model_enum.cs.txt` - string enums
//! - `client.cs.txt` - per-tag clients
//! - `root_client.cs.txt` - root aggregator
//! - `api_version.cs.txt` - API version constant

pub mod clients;
mod context;
pub mod models;
mod project;
pub mod records;
pub mod resolve;
mod templates;

pub use context::{GenerationContext, PendingModel, SchemaKind, SchemaTypeInfo};
pub use project::*;
pub use records::*;
pub use resolve::TypeDescriptor;
pub use templates::{render_api_version, render_client, render_model, render_root_client};
