//! Error types for the token module.

use dsnsync_crypto::CryptoError;
use thiserror::Error;

/// Token-specific errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token (or the claims inside it) is malformed.
    #[error("invalid token: {0}")]
    Validation(String),

    /// HMAC verification failed: tampered token or wrong key.
    #[error("token signature invalid")]
    SignatureMismatch,

    /// The token is past its expiry time.
    #[error("token expired at {expired_at} ms")]
    Expired { expired_at: i64 },

    /// No secret key is present in the key store.
    #[error("no secret key available")]
    KeyUnavailable,

    /// Underlying crypto failure.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AuthError {
    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::SignatureMismatch => "SIGNATURE_MISMATCH",
            Self::Expired { .. } => "TOKEN_EXPIRED",
            Self::KeyUnavailable => "KEY_UNAVAILABLE",
            Self::Crypto(_) => "CRYPTO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Returns true for failures caused by the presented token rather than by
    /// the server.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::SignatureMismatch | Self::Expired { .. }
        )
    }
}

impl From<dsnsync_types::Error> for AuthError {
    fn from(err: dsnsync_types::Error) -> Self {
        match err {
            dsnsync_types::Error::Serialization(e) => Self::Serialization(e),
            other => Self::Validation(other.to_string()),
        }
    }
}

/// Result type for token operations.
pub type AuthResult<T> = Result<T, AuthError>;
