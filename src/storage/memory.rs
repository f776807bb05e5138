//! In-memory implementation of the call store.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use super::{CallStore, StorageError, StorageResult};
use crate::session::{CallSession, SessionStatus, Turn};

#[derive(Debug, Default)]
struct StoreInner {
    sessions: HashMap<String, CallSession>,
    // Insertion order doubles as started_at order within a session.
    turns: Vec<Turn>,
}

/// Process-local store backed by a single read-write lock.
///
/// Mutations take the write lock briefly and never hold it across an
/// await point, so the store is safe to share between connection tasks.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_turn<F>(&self, turn_id: &str, apply: F) -> StorageResult<()>
    where
        F: FnOnce(&mut Turn),
    {
        let mut inner = self.inner.write();
        let turn = inner
            .turns
            .iter_mut()
            .find(|t| t.id == turn_id)
            .ok_or_else(|| StorageError::TurnNotFound(turn_id.to_string()))?;
        apply(turn);
        Ok(())
    }
}

#[async_trait]
impl CallStore for MemoryStore {
    async fn create_session(&self, session: CallSession) -> StorageResult<()> {
        let mut inner = self.inner.write();
        if inner.sessions.contains_key(&session.id) {
            return Err(StorageError::DuplicateSession(session.id));
        }
        inner.sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn update_session_status(
        &self,
        session_id: &str,
        status: SessionStatus,
    ) -> StorageResult<()> {
        let mut inner = self.inner.write();
        let session = inner
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| StorageError::SessionNotFound(session_id.to_string()))?;
        session.status = status;
        Ok(())
    }

    async fn end_session(&self, session_id: &str, ended_at: f64) -> StorageResult<()> {
        let mut inner = self.inner.write();
        let session = inner
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| StorageError::SessionNotFound(session_id.to_string()))?;
        session.status = SessionStatus::Ended;
        session.ended_at = Some(ended_at);
        Ok(())
    }

    async fn get_session(&self, session_id: &str) -> StorageResult<Option<CallSession>> {
        Ok(self.inner.read().sessions.get(session_id).cloned())
    }

    async fn create_turn(&self, turn: Turn) -> StorageResult<()> {
        let mut inner = self.inner.write();
        if !inner.sessions.contains_key(&turn.session_id) {
            return Err(StorageError::SessionNotFound(turn.session_id));
        }
        if inner.turns.iter().any(|t| t.id == turn.id) {
            return Err(StorageError::DuplicateTurn(turn.id));
        }
        inner.turns.push(turn);
        Ok(())
    }

    async fn record_first_partial(&self, turn_id: &str, elapsed: f64) -> StorageResult<()> {
        self.with_turn(turn_id, |turn| {
            if turn.time_to_first_partial.is_none() {
                turn.time_to_first_partial = Some(elapsed);
            }
        })
    }

    async fn record_final_transcript(
        &self,
        turn_id: &str,
        transcript: &str,
        elapsed: f64,
    ) -> StorageResult<()> {
        self.with_turn(turn_id, |turn| {
            turn.user_transcript_final = Some(transcript.to_string());
            if turn.time_to_final_transcript.is_none() {
                turn.time_to_final_transcript = Some(elapsed);
            }
        })
    }

    async fn record_first_audio(&self, turn_id: &str, elapsed: f64) -> StorageResult<()> {
        self.with_turn(turn_id, |turn| {
            if turn.time_to_first_audio.is_none() {
                turn.time_to_first_audio = Some(elapsed);
            }
        })
    }

    async fn complete_turn(
        &self,
        turn_id: &str,
        assistant_text: &str,
        ended_at: f64,
    ) -> StorageResult<()> {
        self.with_turn(turn_id, |turn| {
            turn.assistant_text = Some(assistant_text.to_string());
            turn.ended_at = Some(ended_at);
        })
    }

    async fn list_turns(&self, session_id: &str) -> StorageResult<Vec<Turn>> {
        let inner = self.inner.read();
        if !inner.sessions.contains_key(session_id) {
            return Err(StorageError::SessionNotFound(session_id.to_string()));
        }
        Ok(inner
            .turns
            .iter()
            .filter(|t| t.session_id == session_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::now_ts;

    fn session(id: &str) -> CallSession {
        CallSession::new(id.to_string())
    }

    fn turn(id: &str, session_id: &str) -> Turn {
        Turn::new(id.to_string(), session_id.to_string(), now_ts())
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let store = MemoryStore::new();
        store.create_session(session("s1")).await.unwrap();

        let fetched = store.get_session("s1").await.unwrap().unwrap();
        assert_eq!(fetched.id, "s1");
        assert_eq!(fetched.status, SessionStatus::Connected);
        assert!(fetched.ended_at.is_none());
    }

    #[tokio::test]
    async fn test_create_session_rejects_duplicate() {
        let store = MemoryStore::new();
        store.create_session(session("s1")).await.unwrap();

        let err = store.create_session(session("s1")).await.unwrap_err();
        assert_eq!(err, StorageError::DuplicateSession("s1".to_string()));
    }

    #[tokio::test]
    async fn test_get_missing_session_returns_none() {
        let store = MemoryStore::new();
        assert!(store.get_session("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let store = MemoryStore::new();
        store.create_session(session("s1")).await.unwrap();

        store
            .update_session_status("s1", SessionStatus::Active)
            .await
            .unwrap();
        let fetched = store.get_session("s1").await.unwrap().unwrap();
        assert_eq!(fetched.status, SessionStatus::Active);

        store.end_session("s1", 1000.5).await.unwrap();
        let fetched = store.get_session("s1").await.unwrap().unwrap();
        assert_eq!(fetched.status, SessionStatus::Ended);
        assert_eq!(fetched.ended_at, Some(1000.5));
    }

    #[tokio::test]
    async fn test_create_turn_requires_session() {
        let store = MemoryStore::new();
        let err = store.create_turn(turn("t1", "missing")).await.unwrap_err();
        assert_eq!(err, StorageError::SessionNotFound("missing".to_string()));
    }

    #[tokio::test]
    async fn test_create_turn_rejects_duplicate() {
        let store = MemoryStore::new();
        store.create_session(session("s1")).await.unwrap();
        store.create_turn(turn("t1", "s1")).await.unwrap();

        let err = store.create_turn(turn("t1", "s1")).await.unwrap_err();
        assert_eq!(err, StorageError::DuplicateTurn("t1".to_string()));
    }

    #[tokio::test]
    async fn test_latency_fields_write_once() {
        let store = MemoryStore::new();
        store.create_session(session("s1")).await.unwrap();
        store.create_turn(turn("t1", "s1")).await.unwrap();

        store.record_first_partial("t1", 0.1).await.unwrap();
        store.record_first_partial("t1", 9.9).await.unwrap();

        store.record_first_audio("t1", 0.8).await.unwrap();
        store.record_first_audio("t1", 9.9).await.unwrap();

        store
            .record_final_transcript("t1", "hello", 0.5)
            .await
            .unwrap();
        store
            .record_final_transcript("t1", "hello again", 9.9)
            .await
            .unwrap();

        let turns = store.list_turns("s1").await.unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].time_to_first_partial, Some(0.1));
        assert_eq!(turns[0].time_to_first_audio, Some(0.8));
        assert_eq!(turns[0].time_to_final_transcript, Some(0.5));
        // The transcript itself tracks the latest value.
        assert_eq!(turns[0].user_transcript_final.as_deref(), Some("hello again"));
    }

    #[tokio::test]
    async fn test_complete_turn() {
        let store = MemoryStore::new();
        store.create_session(session("s1")).await.unwrap();
        store.create_turn(turn("t1", "s1")).await.unwrap();

        store.complete_turn("t1", "Hi there.", 2000.0).await.unwrap();

        let turns = store.list_turns("s1").await.unwrap();
        assert_eq!(turns[0].assistant_text.as_deref(), Some("Hi there."));
        assert_eq!(turns[0].ended_at, Some(2000.0));
    }

    #[tokio::test]
    async fn test_record_on_missing_turn_fails() {
        let store = MemoryStore::new();
        let err = store.record_first_audio("nope", 0.1).await.unwrap_err();
        assert_eq!(err, StorageError::TurnNotFound("nope".to_string()));
    }

    #[tokio::test]
    async fn test_list_turns_scoped_to_session() {
        let store = MemoryStore::new();
        store.create_session(session("a")).await.unwrap();
        store.create_session(session("b")).await.unwrap();
        store.create_turn(turn("t1", "a")).await.unwrap();
        store.create_turn(turn("t2", "b")).await.unwrap();
        store.create_turn(turn("t3", "a")).await.unwrap();

        let turns_a = store.list_turns("a").await.unwrap();
        let ids: Vec<&str> = turns_a.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t3"]);

        let turns_b = store.list_turns("b").await.unwrap();
        assert_eq!(turns_b.len(), 1);
        assert_eq!(turns_b[0].id, "t2");
    }

    #[tokio::test]
    async fn test_list_turns_missing_session_fails() {
        let store = MemoryStore::new();
        let err = store.list_turns("nope").await.unwrap_err();
        assert_eq!(err, StorageError::SessionNotFound("nope".to_string()));
    }
}
