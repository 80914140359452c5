//! The claim set carried by a token.

use chrono::{DateTime, Utc};
use dsnsync_types::EndpointId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Application-defined claims carried alongside the standard ones.
pub type ExtraClaims = BTreeMap<String, Value>;

/// Wire names of the standard claims. Extra claims may not reuse them.
pub const RESERVED_CLAIMS: [&str; 3] = ["endpoint_number", "timestamp", "expiry"];

/// A verified claim set.
///
/// Only [`crate::TokenAuthority`] hands these out, and only after the
/// signature has been checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Endpoint id the token was issued for.
    #[serde(rename = "endpoint_number")]
    pub endpoint_id: EndpointId,
    /// Issue time, milliseconds since the Unix epoch.
    #[serde(rename = "timestamp")]
    pub issued_at: i64,
    /// Expiry time, milliseconds since the Unix epoch.
    #[serde(rename = "expiry")]
    pub expires_at: i64,
    /// Extra claims, flattened into the payload object.
    #[serde(flatten)]
    pub extra: ExtraClaims,
}

impl Claims {
    /// Returns true if the token is expired at `now`.
    ///
    /// Expiry is strict: a token is still valid at exactly `expires_at`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() > self.expires_at
    }

    /// Returns the issue time.
    #[must_use]
    pub fn issued_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.issued_at)
    }

    /// Returns the expiry time.
    #[must_use]
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.expires_at)
    }

    /// Looks up an extra claim.
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}
