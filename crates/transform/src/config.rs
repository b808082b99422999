use crate::error::TransformError;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options for a transformation run.
///
/// ```json
/// { "strict": true, "maxDepth": 64 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformConfig {
    /// Report malformed paths, unmatched addresses and empty `$copy-of` /
    /// `$variable` selections as errors instead of producing no content.
    pub strict: bool,
    /// Maximum number of nested template applications.
    pub max_depth: usize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        TransformConfig {
            strict: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl TransformConfig {
    pub fn from_json(text: &str) -> Result<Self, TransformError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TransformError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
