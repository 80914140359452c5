//! Sync configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "port": 8443, "rotation_threshold": 50, "overflow_policy": "reject" }
//! ```

use crate::error::{SyncError, SyncResult};
use crate::rotator::{OverflowPolicy, DEFAULT_ROTATION_THRESHOLD};
use chrono::TimeDelta;
use dsnsync_auth::DEFAULT_TOKEN_EXPIRY_SECS;
use dsnsync_crypto::KdfParams;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default listening host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default name of the per-record marker column.
pub const DEFAULT_SYNC_KEY_FIELD: &str = "dsn_sync_key";

/// Configuration for a [`crate::SyncCoordinator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Host placed in connection URLs.
    pub host: String,
    /// Port placed in connection URLs.
    pub port: u16,
    /// Accounted requests per endpoint rotation.
    pub rotation_threshold: u32,
    /// Token lifetime in seconds.
    pub token_expiry_secs: i64,
    /// Behavior when the endpoint id would pass `999`.
    pub overflow_policy: OverflowPolicy,
    /// Key derivation parameters for payload encryption.
    pub kdf: KdfParams,
    /// Column the schema layer adds to each synced table.
    pub sync_key_field: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            rotation_threshold: DEFAULT_ROTATION_THRESHOLD.get(),
            token_expiry_secs: DEFAULT_TOKEN_EXPIRY_SECS,
            overflow_policy: OverflowPolicy::default(),
            kdf: KdfParams::default(),
            sync_key_field: DEFAULT_SYNC_KEY_FIELD.to_string(),
        }
    }
}

impl SyncConfig {
    /// Parses and validates a JSON config.
    pub fn from_json_str(json: &str) -> SyncResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> SyncResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Token lifetime as a duration.
    ///
    /// Fails with [`SyncError::Config`] when `token_expiry_secs` does not fit
    /// a [`TimeDelta`], which [`SyncConfig::validate`] already rules out.
    pub fn token_expiry(&self) -> SyncResult<TimeDelta> {
        TimeDelta::try_seconds(self.token_expiry_secs)
            .ok_or_else(|| invalid("token_expiry_secs out of range"))
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> SyncResult<()> {
        if self.host.trim().is_empty() {
            return Err(invalid("host must not be empty"));
        }
        if self.port == 0 {
            return Err(invalid("port must not be 0"));
        }
        if self.rotation_threshold == 0 {
            return Err(invalid("rotation_threshold must be at least 1"));
        }
        // Upper bound keeps the millisecond expiry well inside i64.
        if !(1..=i64::from(u32::MAX)).contains(&self.token_expiry_secs) {
            return Err(invalid("token_expiry_secs out of range"));
        }
        self.kdf
            .validate()
            .map_err(|e| SyncError::Config(format!("kdf: {e}")))?;
        if self.sync_key_field.trim().is_empty() {
            return Err(invalid("sync_key_field must not be empty"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> SyncError {
    SyncError::Config(msg.to_string())
}
