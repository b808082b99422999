use crate::node::NodeId;
use crate::scalar::ValueKind;
use thiserror::Error;

/// A position inside a parsed document, both components 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub col: usize,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.col)
    }
}

impl From<(usize, usize)> for Location {
    fn from((line, col): (usize, usize)) -> Self {
        Location { line, col }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Value of kind '{from}' is not representable as '{to}'")]
    NotRepresentable { from: ValueKind, to: ValueKind },

    #[error("Node {0:?} is not an object")]
    NotAnObject(NodeId),

    #[error("Node {0:?} is not an array")]
    NotAnArray(NodeId),

    #[error("Node {0:?} is not a value")]
    NotAValue(NodeId),

    #[error("Index {index} is out of bounds for an array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Node {0:?} is already attached to a parent")]
    AlreadyAttached(NodeId),

    #[error("Attaching node {0:?} would create a cycle")]
    WouldCycle(NodeId),
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Json syntax: {message} at {location}")]
    Syntax { message: String, location: Location },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}
