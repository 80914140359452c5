//! Shared test helpers for token tests.

#![allow(dead_code)]

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, TimeZone, Utc};
use dsnsync_auth::{ExtraClaims, TokenAuthority};
use dsnsync_crypto::{KeyStore, SecretKey};
use std::sync::Arc;

/// A fixed key so failures are reproducible.
pub fn test_key() -> SecretKey {
    SecretKey::from_bytes([
        1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24,
        25, 26, 27, 28, 29, 30, 31, 32,
    ])
}

/// A key store holding [`test_key`] and an authority over it.
pub fn authority() -> (Arc<KeyStore>, TokenAuthority) {
    let keys = Arc::new(KeyStore::with_key(test_key()));
    let authority = TokenAuthority::new(Arc::clone(&keys));
    (keys, authority)
}

/// A fixed issue time.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap()
}

/// Decodes a token into its JSON text.
pub fn decode(token: &str) -> String {
    String::from_utf8(URL_SAFE_NO_PAD.decode(token).unwrap()).unwrap()
}

/// Encodes JSON text as a token.
pub fn encode(json: &str) -> String {
    URL_SAFE_NO_PAD.encode(json.as_bytes())
}

/// Builds extra claims from a JSON object literal.
pub fn extra(value: serde_json::Value) -> ExtraClaims {
    serde_json::from_value(value).unwrap()
}
