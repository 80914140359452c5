//! Command implementations for the `dsnsync` binary.
//!
//! Each process is one-shot, so every command that signs, verifies or
//! encrypts needs the secret key handed in with `--key`, typically read
//! from the external key store by the calling script.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dsnsync_auth::TokenAuthority;
use dsnsync_crypto::{KeyStore, SecretKey};
use dsnsync_sync::{EndpointRotator, SyncConfig, SyncCoordinator};
use dsnsync_types::EndpointId;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "dsnsync")]
#[command(about = "Keys, endpoint URLs, tokens and payloads for dsn-sync")]
pub struct Cli {
    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Secret key as 64 hex characters
    #[arg(short, long, global = true)]
    pub key: Option<String>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a secret key and print it with its fingerprint
    Keygen,

    /// Print the connection URL
    Url {
        /// Host to put in the URL
        #[arg(long)]
        host: Option<String>,

        /// Port to put in the URL
        #[arg(short, long)]
        port: Option<u16>,

        /// Endpoint id (defaults to 001)
        #[arg(short, long)]
        endpoint: Option<EndpointId>,
    },

    /// Issue a token
    Token {
        /// Endpoint id to bind the token to (defaults to 001)
        #[arg(short, long)]
        endpoint: Option<EndpointId>,
    },

    /// Verify a token and print its claims
    Verify {
        #[arg(allow_hyphen_values = true)]
        token: String,
    },

    /// Encrypt a JSON record
    Encrypt { json: String },

    /// Decrypt a payload and print the JSON record
    Decrypt {
        #[arg(allow_hyphen_values = true)]
        payload: String,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Keygen => "keygen",
            Command::Url { .. } => "url",
            Command::Token { .. } => "token",
            Command::Verify { .. } => "verify",
            Command::Encrypt { .. } => "encrypt",
            Command::Decrypt { .. } => "decrypt",
        }
    }
}

/// Runs `cli.command` and returns what should be printed.
pub fn run(cli: &Cli) -> Result<String> {
    let mut config = match &cli.config {
        Some(path) => SyncConfig::from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SyncConfig::default(),
    };
    debug!(command = cli.command.name(), "Running command");

    match &cli.command {
        Command::Keygen => {
            let key = SecretKey::generate().context("Failed to generate key")?;
            Ok(format!("{}\nfingerprint: {}", key.to_hex(), key.fingerprint()))
        }
        Command::Url {
            host,
            port,
            endpoint,
        } => {
            if let Some(host) = host {
                config.host = host.clone();
            }
            if let Some(port) = port {
                config.port = *port;
            }
            let coordinator = coordinator(Arc::new(KeyStore::new()), config, *endpoint)?;
            Ok(coordinator.default_connection_url())
        }
        Command::Token { endpoint } => {
            let coordinator = coordinator(load_keys(cli)?, config, *endpoint)?;
            coordinator.init()?;
            Ok(coordinator.issue_token()?.into_string())
        }
        Command::Verify { token } => {
            let authority = TokenAuthority::with_expiry(load_keys(cli)?, config.token_expiry()?);
            let claims = authority.validate(token).context("Token rejected")?;
            Ok(serde_json::to_string_pretty(&claims)?)
        }
        Command::Encrypt { json } => {
            let record: Value = serde_json::from_str(json).context("Record is not valid JSON")?;
            let coordinator = coordinator(load_keys(cli)?, config, None)?;
            Ok(coordinator.channel().encrypt(&record)?)
        }
        Command::Decrypt { payload } => {
            let coordinator = coordinator(load_keys(cli)?, config, None)?;
            let record: Value = coordinator.channel().decrypt(payload)?;
            Ok(serde_json::to_string_pretty(&record)?)
        }
    }
}

fn load_keys(cli: &Cli) -> Result<Arc<KeyStore>> {
    let hex = cli
        .key
        .as_deref()
        .context("This command needs the secret key (--key)")?;
    let key = SecretKey::from_hex(hex.trim()).context("Invalid --key")?;
    Ok(Arc::new(KeyStore::with_key(key)))
}

fn coordinator(
    keys: Arc<KeyStore>,
    config: SyncConfig,
    endpoint: Option<EndpointId>,
) -> Result<SyncCoordinator> {
    let rotator = EndpointRotator::from_config(&config)?
        .starting_at(endpoint.unwrap_or(EndpointId::FIRST));
    Ok(SyncCoordinator::with_components(keys, Arc::new(rotator), config)?)
}
