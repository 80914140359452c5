//! Payload sealing using ChaCha20-Poly1305.
//!
//! Each call draws a fresh salt and nonce. The cipher key is derived from the
//! secret key and the salt, and the salt travels with the ciphertext so a
//! sealed payload is self-describing:
//!
//! ```text
//! base64url( salt[16] || nonce[12] || ciphertext || tag[16] )
//! ```

use crate::error::{CryptoError, CryptoResult};
use crate::kdf::{derive_key, KdfParams, Salt, SALT_SIZE};
use crate::key::{fill_random, SecretKey, KEY_SIZE};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};

/// ChaCha20-Poly1305 takes a 96-bit nonce.
pub const NONCE_SIZE: usize = 12;

/// Poly1305 tag appended to every ciphertext.
pub const TAG_SIZE: usize = 16;

const HEADER_SIZE: usize = SALT_SIZE + NONCE_SIZE;

/// A sealed record: everything [`open`] needs apart from the secret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealedPayload {
    pub salt: Salt,
    pub nonce: [u8; NONCE_SIZE],
    /// Ciphertext followed by the tag.
    pub ciphertext: Vec<u8>,
}

impl SealedPayload {
    /// Length of the framed bytes behind [`SealedPayload::to_base64`].
    pub fn len(&self) -> usize {
        HEADER_SIZE + self.ciphertext.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ciphertext.is_empty()
    }

    /// Frames salt, nonce and ciphertext and encodes them as unpadded
    /// base64url.
    pub fn to_base64(&self) -> String {
        let framed = [
            self.salt.as_bytes().as_slice(),
            self.nonce.as_slice(),
            self.ciphertext.as_slice(),
        ]
        .concat();
        URL_SAFE_NO_PAD.encode(framed)
    }

    /// Parses the output of [`SealedPayload::to_base64`].
    ///
    /// Anything that cannot be a sealed payload, including input too short
    /// to hold a tag, is reported as [`CryptoError::Decryption`].
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let framed = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| CryptoError::Decryption)?;
        if framed.len() < HEADER_SIZE + TAG_SIZE {
            return Err(CryptoError::Decryption);
        }

        let (salt, rest) = framed
            .split_first_chunk::<SALT_SIZE>()
            .ok_or(CryptoError::Decryption)?;
        let (nonce, body) = rest
            .split_first_chunk::<NONCE_SIZE>()
            .ok_or(CryptoError::Decryption)?;

        Ok(Self {
            salt: Salt::from_bytes(*salt),
            nonce: *nonce,
            ciphertext: body.to_vec(),
        })
    }
}

/// Encrypts `plaintext` under a key derived from `secret` with a fresh salt.
pub fn seal(
    secret: &SecretKey,
    params: &KdfParams,
    plaintext: &[u8],
) -> CryptoResult<SealedPayload> {
    let salt = Salt::random()?;
    let mut nonce = [0u8; NONCE_SIZE];
    fill_random(&mut nonce)?;

    let key = derive_key(secret, &salt, params)?;
    let ciphertext = ChaCha20Poly1305::new(key.as_bytes().into())
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    Ok(SealedPayload {
        salt,
        nonce,
        ciphertext,
    })
}

/// Decrypts a sealed payload.
///
/// `secret` and `params` must match the ones used by [`seal`]. A wrong key
/// and tampered data are indistinguishable: both yield
/// [`CryptoError::Decryption`].
pub fn open(
    secret: &SecretKey,
    params: &KdfParams,
    sealed: &SealedPayload,
) -> CryptoResult<Vec<u8>> {
    let key = derive_key(secret, &sealed.salt, params).map_err(|_| CryptoError::Decryption)?;
    ChaCha20Poly1305::new(key.as_bytes().into())
        .decrypt(Nonce::from_slice(&sealed.nonce), sealed.ciphertext.as_slice())
        .map_err(|_| CryptoError::Decryption)
}

/// Parses and opens a [`SealedPayload::to_base64`] string.
///
/// A missing key or a malformed payload still pays for one key derivation
/// before failing, so every failure takes about as long as a wrong key.
pub(crate) fn open_encoded(
    secret: Option<&SecretKey>,
    params: &KdfParams,
    encoded: &str,
) -> CryptoResult<Vec<u8>> {
    match (secret, SealedPayload::from_base64(encoded)) {
        (Some(secret), Ok(sealed)) => open(secret, params, &sealed),
        _ => {
            let decoy = SecretKey::from_bytes([0u8; KEY_SIZE]);
            let _ = derive_key(&decoy, &Salt::from_bytes([0u8; SALT_SIZE]), params);
            Err(CryptoError::Decryption)
        }
    }
}
