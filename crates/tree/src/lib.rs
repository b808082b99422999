//! An arena-backed JSON document tree.
//!
//! Documents are stored as a flat arena of node records. Children are owned by
//! index and every node keeps a non-owning index back to its parent, so upward
//! navigation (`parent`, `path`, `root`) never creates reference cycles and a
//! deep clone is a plain walk that allocates fresh records.
//!
//! ## Key Types
//!
//! - [`Document`]: owns the arena and exposes the mutation API
//! - [`Node`]: a copyable, borrowed handle used by all read APIs
//! - [`Scalar`]: the tagged value stored in leaf nodes
//! - [`parser`]: text → [`Document`] with located syntax errors

pub mod error;
mod interop;
pub mod node;
pub mod parser;
pub mod scalar;
mod serialize;

pub use error::{Location, ParseError, TreeError};
pub use node::{Children, Document, Node, NodeId, NodeType};
pub use parser::{parse_bytes, parse_file, parse_reader, parse_str};
pub use scalar::{Scalar, ValueKind};
