//! Call WebSocket route configuration
//!
//! This module configures the WebSocket endpoint for speech-to-speech
//! calls: buffered audio in, transcript and synthesized audio out.

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::call::call_handler;
use crate::state::AppState;
use std::sync::Arc;

/// Create the call WebSocket router
///
/// # Endpoint
///
/// `GET /call` - WebSocket upgrade for a speech-to-speech call
///
/// # Protocol
///
/// After WebSocket upgrade, clients send:
/// 1. `{"type": "start"}` to begin a turn
/// 2. Binary audio frames, buffered verbatim
/// 3. `{"type": "stop"}` to run the turn through STT -> LLM -> TTS
/// 4. `{"type": "end_call"}` to hang up
///
/// Server responds with:
/// - `session_id` as the first message after accept
/// - `trace_event` when a turn starts
/// - `stt_partial` and `stt_final` for transcription
/// - `assistant_text` for the streamed reply
/// - `tts_audio_chunk` frames followed by `tts_done`
/// - `error` on failures
///
/// # Example
///
/// ```json
/// // Client arms a turn
/// {"type": "start"}
///
/// // Server responds
/// {"type": "trace_event", "event": "turn_started", "turn_id": "...", "ts": 1736539200.5}
///
/// // Client streams audio as binary frames, then stops
/// {"type": "stop"}
///
/// // Server streams back transcript, reply text, and audio chunks
/// ```
pub fn create_call_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/call", get(call_handler))
        .layer(TraceLayer::new_for_http())
}
