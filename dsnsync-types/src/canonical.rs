//! Canonical JSON form.
//!
//! Signatures are computed over bytes, so two semantically equal values must
//! always serialize to the same bytes. Routing through `serde_json::Value`
//! gives that: its map type is ordered, so every object at every depth is
//! emitted with sorted keys, and the compact writer emits no whitespace.
//!
//! Do not enable serde_json's `preserve_order` feature anywhere in the
//! workspace; it would silently turn this into insertion order.

use crate::Result;
use serde::Serialize;

/// Serializes `value` to canonical JSON bytes.
pub fn to_canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let value = serde_json::to_value(value)?;
    Ok(serde_json::to_vec(&value)?)
}

/// Serializes `value` to a canonical JSON string.
pub fn to_canonical_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value)?;
    Ok(serde_json::to_string(&value)?)
}
