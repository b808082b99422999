use jxt_jpath::JPathError;
use jxt_transform::TransformError;
use jxt_tree::{ParseError, TreeError};
use thiserror::Error;

/// Errors surfaced by the top-level helpers and the command line tool.
#[derive(Error, Debug)]
pub enum JxtError {
    #[error("Transformation failed: {0}")]
    Transform(#[from] TransformError),

    #[error("Parsing failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Invalid path: {0}")]
    JPath(#[from] JPathError),

    #[error("Output tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
