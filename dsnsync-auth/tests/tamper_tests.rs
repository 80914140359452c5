//! Any change to a token must make it fail validation.

mod common;

use common::{authority, decode, encode, extra, t0};
use dsnsync_auth::{AuthError, TokenAuthority};
use dsnsync_types::EndpointId;
use proptest::prelude::*;
use serde_json::json;

fn issue(authority: &TokenAuthority) -> String {
    authority
        .issue_at(
            EndpointId::new(17).unwrap(),
            extra(json!({ "user": "u-1", "scope": ["read"] })),
            t0(),
        )
        .unwrap()
        .into_string()
}

fn flip(json: &str, bit: usize) -> Vec<u8> {
    let mut bytes = json.as_bytes().to_vec();
    bytes[bit / 8] ^= 1 << (bit % 8);
    bytes
}

fn encode_bytes(bytes: &[u8]) -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    URL_SAFE_NO_PAD.encode(bytes)
}

// ── exhaustive ───────────────────────────────────────────────────

#[test]
fn every_single_bit_flip_is_rejected() {
    let (_, authority) = authority();
    let token = issue(&authority);
    let json = decode(&token);
    assert!(authority.validate_at(&token, t0()).is_ok());

    for bit in 0..json.len() * 8 {
        let tampered = encode_bytes(&flip(&json, bit));
        assert!(
            authority.validate_at(&tampered, t0()).is_err(),
            "bit {bit} flip accepted"
        );
    }
}

#[test]
fn signature_case_change_is_rejected() {
    let (_, authority) = authority();
    let token = issue(&authority);
    let json = decode(&token);
    let envelope: serde_json::Value = serde_json::from_str(&json).unwrap();
    let signature = envelope["signature"].as_str().unwrap();
    let upper = json.replace(signature, &signature.to_ascii_uppercase());
    assert!(matches!(
        authority.validate_at(&encode(&upper), t0()),
        Err(AuthError::SignatureMismatch)
    ));
}

#[test]
fn reformatted_payload_is_rejected() {
    let (_, authority) = authority();
    let token = issue(&authority);
    let json = decode(&token);
    // Same claims, different bytes.
    let spaced = json.replacen("\"user\":", "\"user\": ", 1);
    assert_ne!(spaced, json);
    assert!(matches!(
        authority.validate_at(&encode(&spaced), t0()),
        Err(AuthError::SignatureMismatch)
    ));
}

#[test]
fn endpoint_substitution_is_rejected() {
    let (_, authority) = authority();
    let token = issue(&authority);
    let json = decode(&token).replace("\"017\"", "\"018\"");
    assert!(matches!(
        authority.validate_at(&encode(&json), t0()),
        Err(AuthError::SignatureMismatch)
    ));
}

#[test]
fn expiry_extension_is_rejected() {
    let (_, authority) = authority();
    let token = issue(&authority);
    let json = decode(&token);
    let envelope: serde_json::Value = serde_json::from_str(&json).unwrap();
    let expiry = envelope["payload"]["expiry"].as_i64().unwrap();
    let extended = json.replace(&expiry.to_string(), &(expiry + 1).to_string());
    assert!(matches!(
        authority.validate_at(&encode(&extended), t0()),
        Err(AuthError::SignatureMismatch)
    ));
}

// ── properties ───────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn arbitrary_byte_substitution_is_rejected(
        index in any::<prop::sample::Index>(),
        byte in any::<u8>(),
    ) {
        let (_, authority) = authority();
        let token = issue(&authority);
        let json = decode(&token);
        let mut bytes = json.as_bytes().to_vec();
        let i = index.index(bytes.len());
        prop_assume!(bytes[i] != byte);
        bytes[i] = byte;
        prop_assert!(authority.validate_at(&encode_bytes(&bytes), t0()).is_err());
    }

    #[test]
    fn truncation_is_rejected(keep in 0usize..200) {
        let (_, authority) = authority();
        let token = issue(&authority);
        prop_assume!(keep < token.len());
        prop_assert!(authority.validate_at(&token[..keep], t0()).is_err());
    }
}
