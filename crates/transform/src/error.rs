use jxt_jpath::JPathError;
use jxt_tree::{ParseError, TreeError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Document parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Path error: {0}")]
    JPath(#[from] JPathError),

    #[error("Output tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("No template matches address '{address}'")]
    NoMatchingTemplate { address: String },

    #[error("Selection '{select}' matched no nodes")]
    EmptySelection { select: String },

    #[error("Template recursion exceeded the limit of {0} nested applications")]
    RecursionLimit(usize),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
