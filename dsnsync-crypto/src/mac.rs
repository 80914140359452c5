//! HMAC-SHA256 signatures.
//!
//! Signatures travel as lowercase hex. Verification compares the hex strings
//! in constant time, length included, so `"AB.."` never matches `"ab.."`.

use crate::error::{CryptoError, CryptoResult};
use crate::key::SecretKey;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex-encoded HMAC-SHA256 signature.
pub const SIGNATURE_HEX_LEN: usize = 64;

/// Signs `message` and returns the lowercase hex signature.
pub fn sign_hex(key: &SecretKey, message: &[u8]) -> CryptoResult<String> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    mac.update(message);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Returns true if `signature` is the hex signature of `message` under `key`.
pub fn verify_hex(key: &SecretKey, message: &[u8], signature: &str) -> bool {
    match sign_hex(key, message) {
        Ok(expected) => constant_time_eq(expected.as_bytes(), signature.as_bytes()),
        Err(_) => false,
    }
}

/// Constant-time equality, including the length comparison.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let len = a.len().max(b.len());
    let mut a_padded = vec![0u8; len];
    let mut b_padded = vec![0u8; len];
    a_padded[..a.len()].copy_from_slice(a);
    b_padded[..b.len()].copy_from_slice(b);

    let lengths_equal = a.len().ct_eq(&b.len());
    let contents_equal = a_padded.ct_eq(&b_padded);
    (lengths_equal & contents_equal).into()
}
