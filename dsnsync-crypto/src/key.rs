//! The root secret.
//!
//! A [`SecretKey`] signs tokens and requests directly and is stretched into a
//! per-payload cipher key by [`crate::derive_key`]. Outside the process it is
//! only ever named by its [`KeyFingerprint`].

use crate::error::{CryptoError, CryptoResult};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Secret and cipher keys are 256 bits.
pub const KEY_SIZE: usize = 32;

/// Fills `buf` from the OS entropy source.
pub(crate) fn fill_random(buf: &mut [u8]) -> CryptoResult<()> {
    rand::rngs::OsRng
        .try_fill_bytes(buf)
        .map_err(|e| CryptoError::Entropy(e.to_string()))
}

/// The root symmetric secret, zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; KEY_SIZE]);

impl SecretKey {
    /// Generates a fresh key from the OS CSPRNG.
    pub fn generate() -> CryptoResult<Self> {
        let mut bytes = [0u8; KEY_SIZE];
        fill_random(&mut bytes)?;
        Ok(Self(bytes))
    }

    /// Creates a key from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Creates a key from a slice, checking its length.
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let bytes: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: KEY_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self(bytes))
    }

    /// Decodes a key from 64 hex characters, as handed over by an external
    /// key store.
    pub fn from_hex(encoded: &str) -> CryptoResult<Self> {
        let mut bytes = hex::decode(encoded.trim())
            .map_err(|e| CryptoError::InvalidKeyEncoding(e.to_string()))?;
        let key = Self::from_slice(&bytes);
        bytes.zeroize();
        key
    }

    /// Encodes the key as lowercase hex for hand-off to an external key store.
    ///
    /// Never log the result; log [`SecretKey::fingerprint`] instead.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    /// Returns the one-way identifier of this key.
    pub fn fingerprint(&self) -> KeyFingerprint {
        KeyFingerprint(hex::encode(Sha256::digest(self.0)))
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey({})", self.fingerprint().short())
    }
}

/// Hex length of a SHA-256 digest.
const FINGERPRINT_LEN: usize = 64;

/// SHA-256 digest of a secret key, hex encoded.
///
/// This is the only form in which a key is ever identified externally.
/// Deserialization accepts only 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyFingerprint(String);

impl KeyFingerprint {
    /// Returns the full hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the first 12 hex characters, enough to tell keys apart in logs.
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl TryFrom<String> for KeyFingerprint {
    type Error = CryptoError;

    fn try_from(digest: String) -> CryptoResult<Self> {
        let well_formed = digest.len() == FINGERPRINT_LEN
            && digest
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if !well_formed {
            return Err(CryptoError::InvalidKeyEncoding(format!(
                "fingerprint must be {} lowercase hex characters",
                FINGERPRINT_LEN
            )));
        }
        Ok(Self(digest))
    }
}

impl From<KeyFingerprint> for String {
    fn from(fingerprint: KeyFingerprint) -> Self {
        fingerprint.0
    }
}

impl fmt::Display for KeyFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
