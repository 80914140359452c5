//! Core type definitions for dsn-sync.
//!
//! This crate defines the small, dependency-free types shared by the
//! security layer:
//! - Endpoint identifiers (the rotating 3-digit routing segment)
//! - The canonical JSON form used as input to every signature

mod canonical;
mod ids;

pub use canonical::{to_canonical_json, to_canonical_string};
pub use ids::EndpointId;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid endpoint id: {0}")]
    InvalidEndpoint(String),
}
