//! Template-driven JSON to JSON transformation.
//!
//! A template document lists `$template` entries. Rendering starts at the
//! source root, picks the first template whose `$match` pattern fits the
//! node's address, and expands its `$value` spec. Inside a spec,
//! `$apply-template`, `$value-of` and `$copy-of` pull content from the source
//! through path selections; everything else is copied as written.

pub mod config;
pub mod error;
mod executor;
pub mod template;
mod transformer;

// --- Public API ---
pub use config::{DEFAULT_MAX_DEPTH, TransformConfig};
pub use error::TransformError;
pub use executor::structural_address;
pub use template::{MatchPattern, Template, TemplateSet, VariableDecl};
pub use transformer::{Transformer, TransformerBuilder};
