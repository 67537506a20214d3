//! OpenAPI document loading and reference lookup.
//!
//! The typed [`oas3`] model drives path and operation traversal. Schemas are
//! handled as plain [`serde_json::Value`] nodes so the generator can inspect
//! any keyword without depending on how the typed model represents it.

mod load;
mod refs;

pub use load::*;
pub use refs::*;
