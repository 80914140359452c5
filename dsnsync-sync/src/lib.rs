//! Endpoint rotation and sync coordination for dsn-sync.
//!
//! dsn-sync exposes application data to an untrusted frontend without a
//! stable REST path. Clients reach the backend at
//! `https://<host>:<port>/sync/<id>`, where `<id>` rotates after a set number of
//! requests, and present a short-lived signed token with each request.
//!
//! ## Components
//!
//! - **Rotator**: owns the current endpoint id and the request counter
//! - **Coordinator**: ties the key store, rotator and token authority
//!   together and is what the request handler talks to
//! - **Receiver**: routes incoming create/update/delete packets to
//!   application handlers
//! - **Config**: host, port, rotation and token settings
//!
//! # Example
//!
//! ```
//! use dsnsync_sync::{SyncConfig, SyncCoordinator};
//!
//! let coordinator = SyncCoordinator::new(SyncConfig::default()).unwrap();
//! coordinator.init().unwrap();
//!
//! let url = coordinator.connection_url("localhost", 3000);
//! assert_eq!(url, "https://localhost:3000/sync/001");
//!
//! let token = coordinator.issue_token().unwrap();
//! let claims = coordinator.authorize_request(token.as_str()).unwrap();
//! assert_eq!(claims.endpoint_id.to_string(), "001");
//! ```

mod config;
mod coordinator;
mod error;
pub mod receiver;
mod rotator;

pub use config::{SyncConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SYNC_KEY_FIELD};
pub use coordinator::SyncCoordinator;
pub use error::{SyncError, SyncResult};
pub use receiver::{
    HandlerError, HandlerRegistration, Operation, Receiver, RecordHandler, UnknownOperation,
};
pub use rotator::{EndpointRotator, OverflowPolicy, DEFAULT_ROTATION_THRESHOLD};
