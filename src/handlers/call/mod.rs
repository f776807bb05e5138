//! Call WebSocket handlers
//!
//! This module implements the turn-based speech-to-speech call protocol:
//! the client records an utterance between "start" and "stop", and the
//! server answers with a transcript, a streamed assistant reply and
//! synthesized audio, one strictly ordered turn at a time.
//!
//! # Protocol
//!
//! ## Client -> Server
//!
//! - **start**: Begin a turn (clears the buffer, arms a turn id)
//! - **stop**: End the utterance and run the pipeline
//! - **end_call**: Hang up
//! - **Binary frames**: Raw audio appended to the turn buffer
//!
//! ## Server -> Client
//!
//! - **session_id**: First event after connect
//! - **trace_event**: Turn lifecycle marker (`turn_started`)
//! - **stt_partial**: Immediate placeholder while transcription runs
//! - **stt_final**: Final transcript with confidence and latency
//! - **assistant_text**: Reply streamed word by word, then a final event
//!   carrying the full text
//! - **tts_audio_chunk**: Base64 audio in fixed-size windows
//! - **tts_done**: Turn complete
//! - **error**: Recoverable error; the connection stays open

mod handler;
mod latency;
pub mod messages;
mod pipeline;
mod turn;

pub use handler::call_handler;
pub use latency::{TurnClock, to_latency_ms};
pub use messages::{
    CallIncomingMessage, CallMessageRoute, CallOutgoingMessage, STT_PARTIAL_PLACEHOLDER,
    TRACE_TURN_STARTED,
};
pub use pipeline::{
    CHUNK_DELAY, CONFIDENCE_THRESHOLD, FALLBACK_REPLY, TTS_CHUNK_SIZE, TurnPipeline, WORD_DELAY,
    needs_repeat_prompt,
};
pub use turn::{ActiveTurn, StopOutcome, TurnBuffer, TurnPhase, TurnStarted, TurnStateMachine};
