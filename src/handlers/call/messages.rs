//! Call WebSocket message types
//!
//! Defines the wire contract for the call endpoint. Clients drive a turn
//! with three JSON control messages plus raw binary audio frames; the
//! server answers with a fixed sequence of JSON events per turn. Field
//! names, tag values and the per-turn event order are part of the public
//! contract and must not change.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};

/// Trace event name emitted when a turn is armed
pub const TRACE_TURN_STARTED: &str = "turn_started";

/// Placeholder text for the immediate `stt_partial` acknowledgement
pub const STT_PARTIAL_PLACEHOLDER: &str = "...";

// =============================================================================
// Incoming Messages (Client -> Server)
// =============================================================================

/// Incoming control messages from the call client
///
/// Audio is not part of this enum: clients send raw binary WebSocket
/// frames, which the handler appends to the turn buffer directly.
#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum CallIncomingMessage {
    /// Begin a new turn: clear the audio buffer and arm a fresh turn id
    #[serde(rename = "start")]
    Start,

    /// End the utterance: freeze the buffer and run the talk pipeline
    #[serde(rename = "stop")]
    Stop,

    /// Hang up: the server finalizes the call and closes the socket
    #[serde(rename = "end_call")]
    EndCall,
}

// =============================================================================
// Outgoing Messages (Server -> Client)
// =============================================================================

/// Outgoing JSON events to the call client
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum CallOutgoingMessage {
    /// First event on every connection
    #[serde(rename = "session_id")]
    SessionId {
        /// Server-generated call identifier
        session_id: String,
    },

    /// Turn lifecycle marker
    #[serde(rename = "trace_event")]
    TraceEvent {
        /// Event name (currently only `turn_started`)
        event: String,
        /// Turn the event belongs to
        turn_id: String,
        /// Wall-clock timestamp in epoch seconds
        ts: f64,
    },

    /// Immediate transcription acknowledgement
    #[serde(rename = "stt_partial")]
    SttPartial {
        /// Placeholder text
        text: String,
    },

    /// Final transcription result
    #[serde(rename = "stt_final")]
    SttFinal {
        /// Transcript text, empty when nothing was recognized
        text: String,
        /// Heuristic confidence in [0.0, 1.0]
        confidence: f32,
        /// Milliseconds from turn start to the final transcript
        latency_ms: u64,
    },

    /// Assistant reply text, streamed word by word
    #[serde(rename = "assistant_text")]
    AssistantText {
        /// Word chunk, or empty string on the closing event
        text: String,
        /// True only on the closing event of the stream
        is_final: bool,
        /// Complete reply, present only when `is_final` is true
        #[serde(skip_serializing_if = "Option::is_none")]
        full_text: Option<String>,
    },

    /// Synthesized audio chunk
    #[serde(rename = "tts_audio_chunk")]
    TtsAudioChunk {
        /// Base64 (standard alphabet) encoding of the audio bytes
        audio: String,
    },

    /// Audio stream complete; the turn is over
    #[serde(rename = "tts_done")]
    TtsDone,

    /// Recoverable error; the connection stays open
    #[serde(rename = "error")]
    Error {
        /// Human-readable description
        message: String,
    },
}

impl CallOutgoingMessage {
    /// Build a `tts_audio_chunk` event from raw audio bytes
    pub fn audio_chunk(chunk: &[u8]) -> Self {
        CallOutgoingMessage::TtsAudioChunk {
            audio: BASE64.encode(chunk),
        }
    }

    /// Build an `error` event
    pub fn error(message: impl Into<String>) -> Self {
        CallOutgoingMessage::Error {
            message: message.into(),
        }
    }
}

// =============================================================================
// Message Routing
// =============================================================================

/// Message routing for the connection's sender task
pub enum CallMessageRoute {
    /// JSON event to serialize and send as a text frame
    Outgoing(CallOutgoingMessage),
    /// Close the socket and stop the sender task
    Close,
}
