//! Multiformat errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MultiformatError {
    /// Bad arguments to a registration (empty names, duplicates, missing alias targets)
    #[error("Validation error: {0}")]
    Validation(String),

    /// An algorithm, codec, multibase or alias name could not be resolved
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed input: bad varint, truncated buffer, unknown prefix, bad CID grammar
    #[error("Format error: {0}")]
    Format(String),

    /// Attempt to change a write-once value
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for MultiformatError {
    fn from(error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::UnexpectedEof {
            MultiformatError::Format(format!("truncated input: {error}"))
        } else {
            MultiformatError::Io(error.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, MultiformatError>;
