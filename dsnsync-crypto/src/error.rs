//! Error types for the encryption layer.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key derivation failed.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// The operating system entropy source failed.
    #[error("entropy source failure: {0}")]
    Entropy(String),

    /// Encryption failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed.
    ///
    /// Malformed input, a failed tag and a wrong key all land here, and the
    /// message is the same for each.
    #[error("decryption failed")]
    Decryption,

    /// No secret key is present in the key store.
    #[error("no secret key available")]
    KeyUnavailable,

    /// Invalid key length.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Key material could not be decoded.
    #[error("invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<dsnsync_types::Error> for CryptoError {
    fn from(err: dsnsync_types::Error) -> Self {
        match err {
            dsnsync_types::Error::Serialization(e) => Self::Serialization(e),
            other => Self::Encryption(other.to_string()),
        }
    }
}
