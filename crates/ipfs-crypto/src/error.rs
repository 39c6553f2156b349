//! Error types for key operations

use ipfs_multiformats::MultiformatError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Key material is invalid or a key could not be generated
    #[error("Key error: {0}")]
    KeyError(String),

    /// Malformed key envelope or DER structure
    #[error("Format error: {0}")]
    Format(String),

    /// Key family outside the supported set
    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Encoding error: {0}")]
    Encoding(#[from] MultiformatError),
}

pub type Result<T> = std::result::Result<T, CryptoError>;
