use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum JPathError {
    #[error("Malformed step '{step}' in path '{path}'")]
    MalformedStep { path: String, step: String },
}
