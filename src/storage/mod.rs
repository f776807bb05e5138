//! Persistence layer for call sessions and turns.
//!
//! The [`CallStore`] trait abstracts over storage backends. The default
//! [`MemoryStore`] keeps everything in process memory, which matches
//! the lifetime of a gateway instance; a database-backed store can be
//! swapped in behind the same trait.

mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::session::{CallSession, SessionStatus, Turn};

pub use memory::MemoryStore;

/// Errors that can occur during persistence operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    /// No session exists with the given id.
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// No turn exists with the given id.
    #[error("Turn not found: {0}")]
    TurnNotFound(String),

    /// A session with the given id already exists.
    #[error("Session already exists: {0}")]
    DuplicateSession(String),

    /// A turn with the given id already exists.
    #[error("Turn already exists: {0}")]
    DuplicateTurn(String),
}

/// Result type for persistence operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage interface for call sessions and their turns.
///
/// Latency fields on a turn are write-once: the first recorded value
/// wins and later writes are ignored.
#[async_trait]
pub trait CallStore: Send + Sync {
    /// Persist a new session. Fails if the id is already taken.
    async fn create_session(&self, session: CallSession) -> StorageResult<()>;

    /// Update the lifecycle status of a session.
    async fn update_session_status(
        &self,
        session_id: &str,
        status: SessionStatus,
    ) -> StorageResult<()>;

    /// Mark a session ended at the given wall-clock timestamp.
    async fn end_session(&self, session_id: &str, ended_at: f64) -> StorageResult<()>;

    /// Fetch a session by id.
    async fn get_session(&self, session_id: &str) -> StorageResult<Option<CallSession>>;

    /// Persist a new turn. Fails if the id is already taken or the
    /// owning session does not exist.
    async fn create_turn(&self, turn: Turn) -> StorageResult<()>;

    /// Record the time to the first transcript partial, in seconds.
    async fn record_first_partial(&self, turn_id: &str, elapsed: f64) -> StorageResult<()>;

    /// Record the final transcript and the time it took, in seconds.
    async fn record_final_transcript(
        &self,
        turn_id: &str,
        transcript: &str,
        elapsed: f64,
    ) -> StorageResult<()>;

    /// Record the time to the first audio chunk, in seconds.
    async fn record_first_audio(&self, turn_id: &str, elapsed: f64) -> StorageResult<()>;

    /// Record the assistant reply and close out the turn.
    async fn complete_turn(
        &self,
        turn_id: &str,
        assistant_text: &str,
        ended_at: f64,
    ) -> StorageResult<()>;

    /// All turns of a session in the order they started.
    async fn list_turns(&self, session_id: &str) -> StorageResult<Vec<Turn>>;
}
