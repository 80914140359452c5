//! Argon2id stretching of the secret key into per-payload cipher keys.

use crate::error::{CryptoError, CryptoResult};
use crate::key::{fill_random, SecretKey, KEY_SIZE};
use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[cfg(test)]
thread_local! {
    /// Calls to [`derive_key`] made on this thread.
    pub(crate) static DERIVATIONS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Salts are 128 bits.
pub const SALT_SIZE: usize = 16;

/// Random salt carried in front of every sealed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_SIZE]);

impl Salt {
    /// Draws a salt from the OS entropy source.
    pub fn random() -> CryptoResult<Self> {
        let mut bytes = [0u8; SALT_SIZE];
        fill_random(&mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

/// Argon2id cost parameters.
///
/// Both ends of the channel must agree on these, so they live in the shared
/// configuration. Missing fields fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KdfParams {
    /// Memory in KiB.
    pub memory_cost: u32,
    /// Number of passes.
    pub time_cost: u32,
    /// Number of lanes.
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_cost: 19 * 1024,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// Minimal costs for tests. Never use these for real payloads.
    pub fn fast_insecure() -> Self {
        Self {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }

    /// Checks the costs against the limits Argon2 accepts.
    pub fn validate(&self) -> CryptoResult<()> {
        self.argon2().map(|_| ())
    }

    fn argon2(&self) -> CryptoResult<Argon2<'static>> {
        let params = Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            Some(KEY_SIZE),
        )
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// A cipher key derived for one payload.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_SIZE]);

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Stretches `secret` with `salt` into a cipher key.
///
/// The same inputs always give the same key, which is how the receiving end
/// recovers it from the salt in the payload.
pub fn derive_key(
    secret: &SecretKey,
    salt: &Salt,
    params: &KdfParams,
) -> CryptoResult<DerivedKey> {
    #[cfg(test)]
    DERIVATIONS.with(|n| n.set(n.get() + 1));

    let mut key = DerivedKey([0u8; KEY_SIZE]);
    params
        .argon2()?
        .hash_password_into(secret.as_bytes(), salt.as_bytes(), &mut key.0)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    Ok(key)
}
