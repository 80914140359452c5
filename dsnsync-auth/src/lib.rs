//! Endpoint tokens for dsn-sync.
//!
//! This module handles:
//! - Issuing short-lived tokens that bind a client to an endpoint id
//! - Validating them against the active secret key and the clock
//! - Refreshing a verified token onto a new endpoint id
//!
//! # Design Principles
//!
//! - **Stateless**: validation depends only on the token, the active key and
//!   the current time; nothing is stored server-side
//! - **Verify before trust**: no claim, the endpoint id included, is read from
//!   a token whose signature has not been checked
//! - **Rotation-tolerant**: a token stays valid when the endpoint rotates
//!   after it was issued; only key rotation or expiry revokes it
//!
//! # Token Format
//!
//! Tokens are `base64url(json)` where the JSON is
//! `{"payload": {...}, "signature": "<hex HMAC-SHA256>"}` and the signature
//! covers the canonical (sorted-key) serialization of the payload.

mod claims;
mod error;
mod token;

pub use claims::{Claims, ExtraClaims, RESERVED_CLAIMS};
pub use error::{AuthError, AuthResult};
pub use token::{Token, TokenAuthority, DEFAULT_TOKEN_EXPIRY_SECS};
