//! Encryption layer for dsn-sync.
//!
//! Everything the frontend channel needs from a single symmetric secret:
//!
//! - [`KeyStore`]: owns the one active [`SecretKey`] (generate, store, rotate)
//! - [`derive_key`]: Argon2id stretching of the secret with a per-payload salt
//! - [`cipher`]: ChaCha20-Poly1305 sealing of bytes
//! - [`mac`]: HMAC-SHA256 signatures with constant-time verification
//! - [`CipherChannel`]: record-level encrypt/decrypt and request signing
//!
//! Replacing the key in the store invalidates every payload and signature
//! made under the old key; there is no grace period.

pub mod cipher;
mod channel;
mod error;
mod kdf;
mod key;
mod keystore;
pub mod mac;

pub use channel::{CipherChannel, SignedRequest};
pub use cipher::{open, seal, SealedPayload, NONCE_SIZE, TAG_SIZE};
pub use error::{CryptoError, CryptoResult};
pub use kdf::{derive_key, DerivedKey, KdfParams, Salt, SALT_SIZE};
pub use key::{KeyFingerprint, SecretKey, KEY_SIZE};
pub use keystore::KeyStore;
