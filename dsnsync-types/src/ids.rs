//! Endpoint identifiers.
//!
//! The endpoint id is the hidden routing segment of the connection URL
//! (`/sync/<id>`). It is a number in `1..=999`, always rendered as three
//! zero-padded digits.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical endpoint identifier in `001..=999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EndpointId(u16);

impl EndpointId {
    /// The identifier every rotator starts from.
    pub const FIRST: Self = Self(1);

    /// The largest representable identifier.
    pub const LAST: Self = Self(999);

    /// Creates an endpoint id from its numeric value.
    ///
    /// Returns `None` when `value` is outside `1..=999`.
    #[must_use]
    pub const fn new(value: u16) -> Option<Self> {
        if value >= Self::FIRST.0 && value <= Self::LAST.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }

    /// Returns the following identifier, or `None` past `999`.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    /// Parses an endpoint id from a decimal string.
    ///
    /// Leading zeros are accepted (`"7"`, `"07"` and `"007"` are the same id);
    /// signs, whitespace and anything non-numeric are not.
    pub fn parse(s: &str) -> Result<Self, Error> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidEndpoint(s.to_string()));
        }
        let value: u32 = s
            .parse()
            .map_err(|_| Error::InvalidEndpoint(s.to_string()))?;
        u16::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| Error::InvalidEndpoint(s.to_string()))
    }

    /// Returns true if `s` parses as an endpoint id.
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }
}

impl Default for EndpointId {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

impl FromStr for EndpointId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EndpointId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<EndpointId> for String {
    fn from(id: EndpointId) -> Self {
        id.to_string()
    }
}
