//! Token issuance and verification.
//!
//! The payload is signed exactly as it is emitted: the issuer writes the
//! canonical serialization of the claims into the envelope verbatim, and the
//! validator checks the HMAC over those same bytes before parsing a single
//! claim out of them.

use crate::claims::{Claims, ExtraClaims, RESERVED_CLAIMS};
use crate::error::{AuthError, AuthResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use dsnsync_crypto::{mac, KeyStore, SecretKey};
use dsnsync_types::{to_canonical_string, EndpointId};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Default token lifetime in seconds (24 hours).
pub const DEFAULT_TOKEN_EXPIRY_SECS: i64 = 24 * 60 * 60;

/// An encoded token, as handed to the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Wraps a token string received from a client.
    ///
    /// Nothing is checked here; use [`TokenAuthority::validate`].
    pub fn from_wire(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the encoded token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token, returning the encoded string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The JSON object inside a token.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    payload: Box<RawValue>,
    signature: String,
}

/// Issues and validates tokens under the active key of a [`KeyStore`].
///
/// The key is read on every call: after [`KeyStore::rotate`] no token issued
/// under the previous key validates.
#[derive(Debug, Clone)]
pub struct TokenAuthority {
    keys: Arc<KeyStore>,
    expiry: Duration,
}

impl TokenAuthority {
    /// Creates an authority with the default 24 hour expiry.
    pub fn new(keys: Arc<KeyStore>) -> Self {
        Self::with_expiry(keys, Duration::seconds(DEFAULT_TOKEN_EXPIRY_SECS))
    }

    /// Creates an authority issuing tokens that live for `expiry`.
    pub fn with_expiry(keys: Arc<KeyStore>, expiry: Duration) -> Self {
        Self { keys, expiry }
    }

    /// Returns the token lifetime.
    #[must_use]
    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    fn active_key(&self) -> AuthResult<SecretKey> {
        self.keys.get().ok_or(AuthError::KeyUnavailable)
    }

    /// Issues a token for `endpoint_id`, valid from now.
    pub fn issue(&self, endpoint_id: EndpointId, extra: ExtraClaims) -> AuthResult<Token> {
        self.issue_at(endpoint_id, extra, Utc::now())
    }

    /// Issues a token for `endpoint_id` as of `now`.
    pub fn issue_at(
        &self,
        endpoint_id: EndpointId,
        extra: ExtraClaims,
        now: DateTime<Utc>,
    ) -> AuthResult<Token> {
        if let Some(name) = extra.keys().find(|k| RESERVED_CLAIMS.contains(&k.as_str())) {
            return Err(AuthError::Validation(format!(
                "extra claim uses reserved name: {name}"
            )));
        }

        let key = self.active_key()?;
        let issued_at = now.timestamp_millis();
        let claims = Claims {
            endpoint_id,
            issued_at,
            expires_at: issued_at.saturating_add(self.expiry.num_milliseconds()),
            extra,
        };

        let payload = to_canonical_string(&claims)?;
        let signature = mac::sign_hex(&key, payload.as_bytes())?;
        let envelope = Envelope {
            payload: RawValue::from_string(payload)?,
            signature,
        };
        let encoded = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&envelope)?);

        debug!(
            endpoint = %claims.endpoint_id,
            expires_at = claims.expires_at,
            "Issued token"
        );
        Ok(Token(encoded))
    }

    /// Validates `token` against the active key and the current time.
    pub fn validate(&self, token: &str) -> AuthResult<Claims> {
        self.validate_at(token, Utc::now())
    }

    /// Validates `token` as of `now`.
    ///
    /// Checks run in a fixed order: encoding, then signature, then claim
    /// structure, then expiry. A token with a bad signature is reported as
    /// [`AuthError::SignatureMismatch`] whether or not it is also expired.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<Claims> {
        let envelope = decode_envelope(token)?;
        let key = self.active_key()?;

        if !mac::verify_hex(&key, envelope.payload.get().as_bytes(), &envelope.signature) {
            return Err(AuthError::SignatureMismatch);
        }

        let claims: Claims = serde_json::from_str(envelope.payload.get())
            .map_err(|e| AuthError::Validation(format!("malformed claims: {e}")))?;

        if claims.is_expired_at(now) {
            return Err(AuthError::Expired {
                expired_at: claims.expires_at,
            });
        }

        Ok(claims)
    }

    /// Re-issues a valid token for `new_endpoint`, keeping its extra claims.
    ///
    /// The input must pass [`TokenAuthority::validate`]; otherwise its error
    /// is returned and nothing is issued.
    pub fn refresh(&self, token: &str, new_endpoint: EndpointId) -> AuthResult<Token> {
        self.refresh_at(token, new_endpoint, Utc::now())
    }

    /// Re-issues a valid token for `new_endpoint` as of `now`.
    pub fn refresh_at(
        &self,
        token: &str,
        new_endpoint: EndpointId,
        now: DateTime<Utc>,
    ) -> AuthResult<Token> {
        let claims = self.validate_at(token, now)?;
        self.issue_at(new_endpoint, claims.extra, now)
    }
}

fn decode_envelope(token: &str) -> AuthResult<Envelope> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token.trim())
        .map_err(|e| AuthError::Validation(format!("invalid base64: {e}")))?;
    let json = String::from_utf8(bytes)
        .map_err(|_| AuthError::Validation("token is not UTF-8".to_string()))?;
    serde_json::from_str(&json)
        .map_err(|e| AuthError::Validation(format!("invalid token envelope: {e}")))
}
