//! Error types for the sync layer.

use dsnsync_auth::AuthError;
use dsnsync_crypto::CryptoError;
use dsnsync_types::EndpointId;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// [`crate::SyncCoordinator::init`] has not run yet.
    #[error("sync coordinator not initialized")]
    NotInitialized,

    /// The endpoint id cannot advance and the overflow policy forbids
    /// wrapping.
    #[error("endpoint id {current} cannot advance past {last}", last = EndpointId::LAST)]
    RotationOverflow { current: EndpointId },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Token error.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Key or cipher error.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
