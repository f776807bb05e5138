//! Call session domain model
//!
//! A call is one accepted connection's lifetime and owns a sequence of
//! turns, each being one user-utterance/assistant-reply cycle. Records
//! are persisted through the storage layer; live connections are tracked
//! separately by the [`SessionRegistry`].

use serde::{Deserialize, Serialize};
use std::fmt;

mod registry;

pub use registry::{AlreadyRegistered, ConnectionHandle, SessionRegistry};

/// Lifecycle status of a call
///
/// Transitions: `Connected` on accept, `Active` on the first "start"
/// control message, `Ended` on disconnect or "end_call".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Connected,
    Active,
    Ended,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Connected => "connected",
            SessionStatus::Active => "active",
            SessionStatus::Ended => "ended",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One accepted connection's lifetime
///
/// The identifier is generated at accept time and never reused. The end
/// timestamp is set once, on teardown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSession {
    pub id: String,
    pub status: SessionStatus,
    /// Seconds since the Unix epoch
    pub created_at: f64,
    pub ended_at: Option<f64>,
}

impl CallSession {
    /// Create a freshly connected call
    pub fn new(id: String) -> Self {
        Self {
            id,
            status: SessionStatus::Connected,
            created_at: now_ts(),
            ended_at: None,
        }
    }
}

/// One user-utterance/assistant-reply cycle within a call
///
/// Transcript, reply text, end timestamp and the derived latencies stay
/// unset until the corresponding pipeline stage completes. A turn
/// abandoned mid-pipeline keeps whatever was last committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub id: String,
    pub session_id: String,
    pub user_transcript_final: Option<String>,
    pub assistant_text: Option<String>,
    /// Seconds since the Unix epoch
    pub started_at: f64,
    pub ended_at: Option<f64>,
    /// Elapsed seconds from turn start, set at most once each
    pub time_to_first_partial: Option<f64>,
    pub time_to_final_transcript: Option<f64>,
    pub time_to_first_audio: Option<f64>,
}

impl Turn {
    /// Create a turn record at the moment recording stops
    pub fn new(id: String, session_id: String, started_at: f64) -> Self {
        Self {
            id,
            session_id,
            user_transcript_final: None,
            assistant_text: None,
            started_at,
            ended_at: None,
            time_to_first_partial: None,
            time_to_final_transcript: None,
            time_to_first_audio: None,
        }
    }
}

/// Current wall-clock time as fractional seconds since the Unix epoch
pub fn now_ts() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
