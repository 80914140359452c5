//! Record-level encryption and request signing.
//!
//! [`CipherChannel`] is what the request handler talks to: it turns
//! serializable records into opaque strings and back, and signs
//! `(record, timestamp)` pairs so a request can prove its integrity without
//! a token.

use crate::cipher;
use crate::error::{CryptoError, CryptoResult};
use crate::kdf::KdfParams;
use crate::key::SecretKey;
use crate::keystore::KeyStore;
use crate::mac;
use chrono::{DateTime, Duration, Utc};
use dsnsync_types::to_canonical_json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A record together with the time it was signed and its signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedRequest<T> {
    /// The signed record.
    pub data: T,
    /// Milliseconds since the Unix epoch at signing time.
    pub timestamp: i64,
    /// Lowercase hex HMAC-SHA256 over `canonical(data) || timestamp`.
    pub signature: String,
}

/// Symmetric encryption and signing bound to the active key of a [`KeyStore`].
///
/// The key is looked up on every call, so rotating the store takes effect
/// here immediately.
#[derive(Debug, Clone)]
pub struct CipherChannel {
    keys: Arc<KeyStore>,
    params: KdfParams,
}

impl CipherChannel {
    /// Creates a channel over `keys` using the given derivation parameters.
    pub fn new(keys: Arc<KeyStore>, params: KdfParams) -> Self {
        Self { keys, params }
    }

    /// Returns the key derivation parameters in use.
    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    fn active_key(&self) -> CryptoResult<SecretKey> {
        self.keys.get().ok_or(CryptoError::KeyUnavailable)
    }

    /// Serializes `record` canonically and seals it.
    pub fn encrypt<T: Serialize + ?Sized>(&self, record: &T) -> CryptoResult<String> {
        let key = self.active_key()?;
        let plaintext = to_canonical_json(record)?;
        let sealed = cipher::seal(&key, &self.params, &plaintext)?;
        Ok(sealed.to_base64())
    }

    /// Opens a payload produced by [`CipherChannel::encrypt`].
    ///
    /// Every failure, including a missing key or a plaintext that does not
    /// deserialize as `T`, is reported as [`CryptoError::Decryption`].
    pub fn decrypt<T: DeserializeOwned>(&self, encoded: &str) -> CryptoResult<T> {
        let key = self.keys.get();
        let plaintext = cipher::open_encoded(key.as_ref(), &self.params, encoded)?;
        serde_json::from_slice(&plaintext).map_err(|_| CryptoError::Decryption)
    }

    /// Signs `record` at `timestamp` (milliseconds since the Unix epoch).
    pub fn sign<T: Serialize + ?Sized>(
        &self,
        record: &T,
        timestamp: i64,
    ) -> CryptoResult<String> {
        let key = self.active_key()?;
        let message = signing_input(record, timestamp)?;
        mac::sign_hex(&key, &message)
    }

    /// Checks a signature produced by [`CipherChannel::sign`].
    ///
    /// Returns false when no key is available or the record cannot be
    /// serialized.
    pub fn verify<T: Serialize + ?Sized>(
        &self,
        record: &T,
        timestamp: i64,
        signature: &str,
    ) -> bool {
        let Some(key) = self.keys.get() else {
            return false;
        };
        match signing_input(record, timestamp) {
            Ok(message) => mac::verify_hex(&key, &message, signature),
            Err(_) => false,
        }
    }

    /// Signs `data` with the current time.
    pub fn sign_request<T: Serialize>(&self, data: T) -> CryptoResult<SignedRequest<T>> {
        self.sign_request_at(data, Utc::now())
    }

    /// Signs `data` as of `now`.
    pub fn sign_request_at<T: Serialize>(
        &self,
        data: T,
        now: DateTime<Utc>,
    ) -> CryptoResult<SignedRequest<T>> {
        let timestamp = now.timestamp_millis();
        let signature = self.sign(&data, timestamp)?;
        Ok(SignedRequest {
            data,
            timestamp,
            signature,
        })
    }

    /// Checks the signature of a request, ignoring its age.
    pub fn verify_request<T: Serialize>(&self, request: &SignedRequest<T>) -> bool {
        self.verify(&request.data, request.timestamp, &request.signature)
    }

    /// Checks the signature of a request and that its timestamp lies within
    /// `max_age` of `now` in either direction.
    pub fn verify_request_within<T: Serialize>(
        &self,
        request: &SignedRequest<T>,
        now: DateTime<Utc>,
        max_age: Duration,
    ) -> bool {
        let skew = now
            .timestamp_millis()
            .saturating_sub(request.timestamp)
            .saturating_abs();
        let fresh = skew <= max_age.num_milliseconds();
        // Computed even for stale requests.
        let authentic = self.verify_request(request);
        authentic && fresh
    }
}

fn signing_input<T: Serialize + ?Sized>(record: &T, timestamp: i64) -> CryptoResult<Vec<u8>> {
    let mut message = to_canonical_json(record)?;
    message.extend_from_slice(timestamp.to_string().as_bytes());
    Ok(message)
}
