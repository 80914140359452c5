//! Dispatch of incoming writes to application handlers.
//!
//! The frontend sends `(operation, table, key, record)` packets. Applications
//! register one [`RecordHandler`] per operation and table; registration hands
//! back a [`HandlerRegistration`] that is the only way to remove it again.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::{debug, warn};

/// The kind of write carried by an incoming packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Create, Operation::Update, Operation::Delete];

    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operation name that is not `create`, `update` or `delete`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown operation: {0}")]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

/// Why a handler refused or failed to apply a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HandlerError(String);

impl HandlerError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Application logic for one operation on one table.
pub trait RecordHandler: Send + Sync {
    /// Applies `record` stored under `key`.
    fn handle(&self, key: &str, record: &Value) -> Result<(), HandlerError>;
}

impl<F> RecordHandler for F
where
    F: Fn(&str, &Value) -> Result<(), HandlerError> + Send + Sync,
{
    fn handle(&self, key: &str, record: &Value) -> Result<(), HandlerError> {
        self(key, record)
    }
}

/// Proof of a registration, required to remove it.
///
/// Registering another handler for the same slot makes older registrations
/// stale: unregistering with them does nothing.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping the registration makes the handler impossible to unregister"]
pub struct HandlerRegistration {
    id: u64,
    operation: Operation,
    table: String,
}

impl HandlerRegistration {
    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

struct Slot {
    id: u64,
    handler: Arc<dyn RecordHandler>,
}

type SlotKey = (Operation, String);

/// Registry of record handlers keyed by operation and table.
#[derive(Default)]
pub struct Receiver {
    handlers: RwLock<HashMap<SlotKey, Slot>>,
    next_id: AtomicU64,
}

impl fmt::Debug for Receiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers = self.handlers.read();
        let mut slots: Vec<String> = handlers
            .keys()
            .map(|(op, table)| format!("{op}:{table}"))
            .collect();
        slots.sort();
        f.debug_struct("Receiver").field("handlers", &slots).finish()
    }
}

impl Receiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `handler` for `operation` on `table`, replacing any previous
    /// one.
    pub fn register(
        &self,
        operation: Operation,
        table: impl Into<String>,
        handler: Arc<dyn RecordHandler>,
    ) -> HandlerRegistration {
        let table = table.into();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let replaced = self
            .handlers
            .write()
            .insert((operation, table.clone()), Slot { id, handler })
            .is_some();
        debug!(%operation, table = %table, replaced, "Registered record handler");
        HandlerRegistration {
            id,
            operation,
            table,
        }
    }

    /// Removes the handler installed by `registration`.
    ///
    /// Returns false if the slot has since been taken by a newer registration
    /// or is already empty.
    pub fn unregister(&self, registration: HandlerRegistration) -> bool {
        let mut handlers = self.handlers.write();
        let key = (registration.operation, registration.table);
        match handlers.get(&key) {
            Some(slot) if slot.id == registration.id => {
                handlers.remove(&key);
                true
            }
            _ => false,
        }
    }

    pub fn has_handler(&self, operation: Operation, table: &str) -> bool {
        self.handlers
            .read()
            .contains_key(&(operation, table.to_string()))
    }

    /// Runs the handler for `operation` on `table`.
    ///
    /// Returns false when no handler is registered or the handler fails. The
    /// handler runs without the registry lock held, so it may register or
    /// unregister handlers itself.
    pub fn dispatch(
        &self,
        operation: Operation,
        table: &str,
        key: &str,
        record: &Value,
    ) -> bool {
        let handler = self
            .handlers
            .read()
            .get(&(operation, table.to_string()))
            .map(|slot| Arc::clone(&slot.handler));

        let Some(handler) = handler else {
            debug!(%operation, table, "No handler registered");
            return false;
        };

        match handler.handle(key, record) {
            Ok(()) => true,
            Err(e) => {
                warn!(%operation, table, error = %e, "Record handler failed");
                false
            }
        }
    }

    /// Like [`Receiver::dispatch`], taking the operation by name.
    pub fn process_incoming(
        &self,
        operation: &str,
        table: &str,
        key: &str,
        record: &Value,
    ) -> bool {
        match operation.parse::<Operation>() {
            Ok(op) => self.dispatch(op, table, key, record),
            Err(e) => {
                warn!(table, error = %e, "Rejected incoming record");
                false
            }
        }
    }
}
