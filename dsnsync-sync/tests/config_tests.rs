use dsnsync_crypto::KdfParams;
use dsnsync_sync::{OverflowPolicy, SyncConfig, SyncError};
use pretty_assertions::assert_eq;
use std::io::Write;

// ── defaults ─────────────────────────────────────────────────────

#[test]
fn defaults() {
    let config = SyncConfig::default();
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 3000);
    assert_eq!(config.rotation_threshold, 100);
    assert_eq!(config.token_expiry_secs, 86_400);
    assert_eq!(config.token_expiry().unwrap(), chrono::Duration::hours(24));
    assert_eq!(config.overflow_policy, OverflowPolicy::Wrap);
    assert_eq!(config.kdf, KdfParams::default());
    assert_eq!(config.sync_key_field, "dsn_sync_key");
    config.validate().unwrap();
}

#[test]
fn empty_object_is_default() {
    assert_eq!(SyncConfig::from_json_str("{}").unwrap(), SyncConfig::default());
}

// ── parsing ──────────────────────────────────────────────────────

#[test]
fn partial_config_overrides_only_given_fields() {
    let config = SyncConfig::from_json_str(
        r#"{ "port": 8443, "rotation_threshold": 50, "overflow_policy": "reject" }"#,
    )
    .unwrap();
    assert_eq!(config.port, 8443);
    assert_eq!(config.rotation_threshold, 50);
    assert_eq!(config.overflow_policy, OverflowPolicy::Reject);
    assert_eq!(config.host, "0.0.0.0");
}

#[test]
fn kdf_section() {
    let config =
        SyncConfig::from_json_str(r#"{ "kdf": { "memory_cost": 1024, "time_cost": 1 } }"#)
            .unwrap();
    assert_eq!(config.kdf.memory_cost, 1024);
    assert_eq!(config.kdf.time_cost, 1);
    assert_eq!(config.kdf.parallelism, 1);
}

#[test]
fn serialize_roundtrip() {
    let config = SyncConfig {
        host: "sync.local".to_string(),
        overflow_policy: OverflowPolicy::Reject,
        ..SyncConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains(r#""overflow_policy":"reject""#));
    assert_eq!(SyncConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(matches!(
        SyncConfig::from_json_str(r#"{ "prot": 8443 }"#),
        Err(SyncError::Serialization(_))
    ));
}

#[test]
fn misspelled_kdf_field_is_rejected() {
    assert!(matches!(
        SyncConfig::from_json_str(r#"{ "kdf": { "memroy_cost": 65536 } }"#),
        Err(SyncError::Serialization(_))
    ));
}

#[test]
fn unknown_policy_is_rejected() {
    assert!(SyncConfig::from_json_str(r#"{ "overflow_policy": "explode" }"#).is_err());
}

#[test]
fn malformed_json_is_rejected() {
    assert!(matches!(
        SyncConfig::from_json_str("{"),
        Err(SyncError::Serialization(_))
    ));
}

// ── validation ───────────────────────────────────────────────────

#[test]
fn invalid_values_are_rejected() {
    let cases = [
        r#"{ "host": "" }"#,
        r#"{ "host": "   " }"#,
        r#"{ "port": 0 }"#,
        r#"{ "rotation_threshold": 0 }"#,
        r#"{ "token_expiry_secs": 0 }"#,
        r#"{ "token_expiry_secs": -5 }"#,
        r#"{ "token_expiry_secs": 9223372036854775807 }"#,
        r#"{ "kdf": { "time_cost": 0 } }"#,
        r#"{ "kdf": { "parallelism": 0 } }"#,
        r#"{ "kdf": { "memory_cost": 8, "parallelism": 2 } }"#,
        r#"{ "sync_key_field": "" }"#,
    ];
    for json in cases {
        assert!(
            matches!(SyncConfig::from_json_str(json), Err(SyncError::Config(_))),
            "accepted {json}"
        );
    }
}

#[test]
fn token_expiry_out_of_range_is_an_error() {
    for secs in [i64::MAX, i64::MIN] {
        let config = SyncConfig {
            token_expiry_secs: secs,
            ..SyncConfig::default()
        };
        assert!(matches!(config.token_expiry(), Err(SyncError::Config(_))));
    }
    let config = SyncConfig {
        token_expiry_secs: 600,
        ..SyncConfig::default()
    };
    assert_eq!(config.token_expiry().unwrap(), chrono::Duration::minutes(10));
}

// ── files ────────────────────────────────────────────────────────

#[test]
fn from_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "host": "127.0.0.1", "token_expiry_secs": 600 }}"#).unwrap();
    let config = SyncConfig::from_path(file.path()).unwrap();
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.token_expiry_secs, 600);
}

#[test]
fn from_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        SyncConfig::from_path(dir.path().join("missing.json")),
        Err(SyncError::Io(_))
    ));
}
