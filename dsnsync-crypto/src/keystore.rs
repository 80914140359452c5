//! The process-wide holder of the active secret key.
//!
//! Exactly one key is active at a time. Every replacement goes through a
//! single write-lock acquisition, so all holders of the store observe the new
//! key at the same moment.

use crate::error::CryptoResult;
use crate::key::{KeyFingerprint, SecretKey};
use parking_lot::RwLock;
use tracing::info;

/// Owns the single active [`SecretKey`].
///
/// Shared as `Arc<KeyStore>` by the token authority and the cipher channel,
/// which read the key on every call rather than caching it.
#[derive(Debug, Default)]
pub struct KeyStore {
    active: RwLock<Option<SecretKey>>,
}

impl KeyStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `key`.
    pub fn with_key(key: SecretKey) -> Self {
        Self {
            active: RwLock::new(Some(key)),
        }
    }

    /// Generates a fresh key and makes it the active one.
    pub fn generate(&self) -> CryptoResult<SecretKey> {
        let key = SecretKey::generate()?;
        let fingerprint = key.fingerprint();
        *self.active.write() = Some(key.clone());
        info!(fingerprint = fingerprint.short(), "Generated secret key");
        Ok(key)
    }

    /// Returns a copy of the active key, if any.
    pub fn get(&self) -> Option<SecretKey> {
        self.active.read().clone()
    }

    /// Installs an externally supplied key (e.g. restored from a persisted
    /// store) and returns its fingerprint.
    pub fn store(&self, key: SecretKey) -> KeyFingerprint {
        let fingerprint = key.fingerprint();
        *self.active.write() = Some(key);
        info!(fingerprint = fingerprint.short(), "Stored secret key");
        fingerprint
    }

    /// Replaces the active key with a fresh one.
    ///
    /// Every token signed and every payload sealed under the previous key
    /// stops verifying immediately.
    pub fn rotate(&self) -> CryptoResult<SecretKey> {
        let key = SecretKey::generate()?;
        let new_fingerprint = key.fingerprint();
        let previous = self
            .active
            .write()
            .replace(key.clone())
            .map(|k| k.fingerprint());
        info!(
            previous = ?previous.as_ref().map(KeyFingerprint::short),
            current = new_fingerprint.short(),
            "Rotated secret key"
        );
        Ok(key)
    }

    /// Returns the active key, generating one first if the store is empty.
    ///
    /// The check and the generation happen under one write lock, so racing
    /// callers agree on a single key.
    pub fn get_or_generate(&self) -> CryptoResult<SecretKey> {
        if let Some(key) = self.get() {
            return Ok(key);
        }

        let mut active = self.active.write();
        if let Some(key) = active.as_ref() {
            return Ok(key.clone());
        }
        let key = SecretKey::generate()?;
        info!(fingerprint = key.fingerprint().short(), "Generated secret key");
        *active = Some(key.clone());
        Ok(key)
    }

    /// Returns true if a key is present.
    pub fn exists(&self) -> bool {
        self.active.read().is_some()
    }

    /// Returns the fingerprint of the active key, if any.
    pub fn fingerprint(&self) -> Option<KeyFingerprint> {
        self.active.read().as_ref().map(SecretKey::fingerprint)
    }
}
