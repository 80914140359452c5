//! Composition of the key store, the rotator and the token authority.
//!
//! The request handler holds one [`SyncCoordinator`] and, per inbound request,
//! calls [`SyncCoordinator::authorize_request`]. That validates the token and
//! accounts the request in one call, so the rotator counts exactly the
//! requests that were let through.
//!
//! Tokens are not bound to the *current* endpoint: a token issued for `007`
//! still validates after the rotator moves to `008`. Only key rotation and
//! expiry end a token's life.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::receiver::Receiver;
use crate::rotator::EndpointRotator;
use dsnsync_auth::{Claims, ExtraClaims, Token, TokenAuthority};
use dsnsync_crypto::{CipherChannel, KeyFingerprint, KeyStore};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

/// Entry point for the backend side of dsn-sync.
#[derive(Debug)]
pub struct SyncCoordinator {
    config: SyncConfig,
    keys: Arc<KeyStore>,
    rotator: Arc<EndpointRotator>,
    channel: CipherChannel,
    receiver: Receiver,
    authority: RwLock<Option<TokenAuthority>>,
}

impl SyncCoordinator {
    /// Creates a coordinator with an empty key store and a fresh rotator.
    pub fn new(config: SyncConfig) -> SyncResult<Self> {
        let rotator = EndpointRotator::from_config(&config)?;
        Self::with_components(Arc::new(KeyStore::new()), Arc::new(rotator), config)
    }

    /// Creates a coordinator over existing components, e.g. a key store
    /// restored from persistent storage.
    pub fn with_components(
        keys: Arc<KeyStore>,
        rotator: Arc<EndpointRotator>,
        config: SyncConfig,
    ) -> SyncResult<Self> {
        config.validate()?;
        let channel = CipherChannel::new(Arc::clone(&keys), config.kdf);
        Ok(Self {
            config,
            keys,
            rotator,
            channel,
            receiver: Receiver::new(),
            authority: RwLock::new(None),
        })
    }

    /// Makes sure a secret key exists and sets up token issuance.
    ///
    /// Calling it again is a no-op.
    pub fn init(&self) -> SyncResult<()> {
        let mut authority = self.authority.write();
        if authority.is_some() {
            return Ok(());
        }

        let expiry = self.config.token_expiry()?;
        let key = self.keys.get_or_generate()?;
        *authority = Some(TokenAuthority::with_expiry(Arc::clone(&self.keys), expiry));
        info!(
            fingerprint = key.fingerprint().short(),
            endpoint = %self.rotator.current(),
            "Sync coordinator ready"
        );
        Ok(())
    }

    /// Returns true once [`SyncCoordinator::init`] has succeeded.
    pub fn ready(&self) -> bool {
        self.authority.read().is_some()
    }

    fn authority(&self) -> SyncResult<TokenAuthority> {
        self.authority
            .read()
            .clone()
            .ok_or(SyncError::NotInitialized)
    }

    /// Builds the URL a client uses to reach the current endpoint.
    pub fn connection_url(&self, host: &str, port: u16) -> String {
        format!("https://{host}:{port}/sync/{}", self.rotator.current())
    }

    /// Builds the connection URL from the configured host and port.
    pub fn default_connection_url(&self) -> String {
        self.connection_url(&self.config.host, self.config.port)
    }

    /// Issues a token for the current endpoint.
    pub fn issue_token(&self) -> SyncResult<Token> {
        self.issue_token_with(ExtraClaims::new())
    }

    /// Issues a token for the current endpoint carrying `extra` claims.
    pub fn issue_token_with(&self, extra: ExtraClaims) -> SyncResult<Token> {
        let authority = self.authority()?;
        Ok(authority.issue(self.rotator.current(), extra)?)
    }

    /// Validates `token` and, if it is accepted, accounts the request.
    ///
    /// A rejected token is not counted towards rotation.
    pub fn authorize_request(&self, token: &str) -> SyncResult<Claims> {
        let authority = self.authority()?;
        let claims = authority.validate(token).inspect_err(|e| {
            warn!(code = e.code(), "Rejected request");
        })?;
        self.rotator.account_request()?;
        Ok(claims)
    }

    /// Re-issues a valid token for the current endpoint.
    pub fn refresh_token(&self, token: &str) -> SyncResult<Token> {
        let authority = self.authority()?;
        Ok(authority.refresh(token, self.rotator.current())?)
    }

    /// Replaces the secret key. Every outstanding token and encrypted
    /// payload stops verifying.
    pub fn rotate_key(&self) -> SyncResult<KeyFingerprint> {
        Ok(self.keys.rotate()?.fingerprint())
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn keys(&self) -> &Arc<KeyStore> {
        &self.keys
    }

    pub fn rotator(&self) -> &Arc<EndpointRotator> {
        &self.rotator
    }

    /// Encryption and signing under the active key.
    pub fn channel(&self) -> &CipherChannel {
        &self.channel
    }

    /// Handlers for writes coming from the frontend.
    pub fn receiver(&self) -> &Receiver {
        &self.receiver
    }
}
