//! Session registry for live connections
//!
//! Process-wide mapping from session identifier to the connection's
//! outbound message queue. The registry exists to keep concurrent calls
//! isolated: it never stores per-call state (buffers, turn phase) and
//! never exposes iteration over other sessions' handles.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::handlers::call::CallMessageRoute;

/// Handle to a live connection's outbound message queue
pub type ConnectionHandle = mpsc::Sender<CallMessageRoute>;

/// Error returned when registering an identifier that is already live
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Session {0} is already registered")]
pub struct AlreadyRegistered(pub String);

/// Concurrent map of live sessions
///
/// Supports register/lookup/unregister from arbitrary tasks. Lookups for
/// one identifier can never observe another session's handle.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, ConnectionHandle>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Store a fresh mapping
    ///
    /// Refuses to overwrite: identifiers are UUIDs and must never collide,
    /// so an existing entry indicates a bug rather than a restart.
    pub fn register(&self, id: &str, handle: ConnectionHandle) -> Result<(), AlreadyRegistered> {
        match self.sessions.entry(id.to_string()) {
            Entry::Occupied(_) => Err(AlreadyRegistered(id.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(handle);
                Ok(())
            }
        }
    }

    /// Look up the outbound handle for a live session
    pub fn lookup(&self, id: &str) -> Option<ConnectionHandle> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// Remove a session
    ///
    /// Idempotent: removing an unknown identifier is a no-op.
    pub fn unregister(&self, id: &str) {
        self.sessions.remove(id);
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
