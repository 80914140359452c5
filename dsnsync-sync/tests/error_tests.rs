use dsnsync_auth::AuthError;
use dsnsync_crypto::CryptoError;
use dsnsync_sync::SyncError;
use dsnsync_types::EndpointId;

#[test]
fn error_display_not_initialized() {
    assert!(format!("{}", SyncError::NotInitialized).contains("not initialized"));
}

#[test]
fn error_display_rotation_overflow() {
    let err = SyncError::RotationOverflow {
        current: EndpointId::LAST,
    };
    assert_eq!(err.to_string(), "endpoint id 999 cannot advance past 999");
}

#[test]
fn error_display_config() {
    let err = SyncError::Config("port must not be 0".into());
    assert_eq!(err.to_string(), "configuration error: port must not be 0");
}

#[test]
fn error_from_auth() {
    let err: SyncError = AuthError::SignatureMismatch.into();
    assert!(matches!(err, SyncError::Auth(AuthError::SignatureMismatch)));
    assert!(err.to_string().contains("signature"));
}

#[test]
fn error_from_crypto() {
    let err: SyncError = CryptoError::Decryption.into();
    assert!(matches!(err, SyncError::Crypto(CryptoError::Decryption)));
}

#[test]
fn error_from_io() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: SyncError = io.into();
    assert!(matches!(err, SyncError::Io(_)));
    assert!(err.to_string().contains("gone"));
}

#[test]
fn error_from_serde() {
    let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: SyncError = serde_err.into();
    assert!(matches!(err, SyncError::Serialization(_)));
}
