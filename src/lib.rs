//! JSON path selection and template-driven JSON to JSON transformation.
//!
//! The work is split across three crates that are re-exported here:
//!
//! - [`tree`]: the arena-backed JSON document and its parser
//! - [`jpath`]: path compilation and evaluation over any [`JsonNode`]
//! - [`transform`]: `$template` documents rendered against a source
//!
//! ```no_run
//! use jxt::{Transformer, parse_str};
//!
//! let transformer = Transformer::from_json(
//!     r#"[{"$template": {"$match": "/", "$value": {"$copy-of": {"$select": "/a"}}}}]"#,
//! )?;
//! let output = transformer.render(&parse_str(r#"{"a": [1, 2]}"#)?)?;
//! assert_eq!(output.map(|doc| doc.to_json()).as_deref(), Some("[1,2]"));
//! # Ok::<(), jxt::JxtError>(())
//! ```

pub mod error;

pub use jxt_jpath as jpath;
pub use jxt_transform as transform;
pub use jxt_tree as tree;

// --- Public API ---
pub use error::JxtError;
pub use jxt_jpath::{JsonNode, Path, compile, compile_strict, evaluate, select};
pub use jxt_transform::{TransformConfig, TransformError, Transformer, TransformerBuilder};
pub use jxt_tree::{Document, Node, Scalar, parse_file, parse_str};

/// Evaluates `path` against the document in `source` and returns a document
/// holding an array of deep copies of the selected nodes, in selection order.
pub fn select_document(path: &Path, source: &Document) -> Result<Document, JxtError> {
    let mut output = Document::array();
    for node in evaluate(path, source.root(), None) {
        let copy = output.import(node);
        output.push_element(output.root_id(), copy)?;
    }
    Ok(output)
}

/// Parses both documents and renders `source` with the templates in
/// `template`.
pub fn transform_str(template: &str, source: &str) -> Result<Option<Document>, JxtError> {
    let transformer = Transformer::from_json(template)?;
    Ok(transformer.process_str(source)?)
}
