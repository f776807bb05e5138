//! Turn pipeline orchestrator
//!
//! Runs the collaborator stages for one frozen turn, strictly in order:
//! transcription, reply generation, speech synthesis. Between stages it
//! emits the per-turn event sequence the wire contract promises:
//! `stt_partial`, `stt_final`, word-by-word `assistant_text`, paced
//! `tts_audio_chunk`s and the closing `tts_done`.
//!
//! There are no retries. A stage failure emits an `error` event, the turn
//! keeps whatever fields were persisted before the failure, and the
//! connection goes back to Idle so later turns still work.

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};
use tracing::{debug, info, warn};

use crate::core::llm::BaseLLM;
use crate::core::stt::BaseSTT;
use crate::core::tts::BaseTTS;
use crate::session::{Turn, now_ts};
use crate::storage::{CallStore, StorageResult};

use super::latency::to_latency_ms;
use super::messages::{CallMessageRoute, CallOutgoingMessage, STT_PARTIAL_PLACEHOLDER};
use super::turn::ActiveTurn;

/// Pause between streamed reply words
pub const WORD_DELAY: Duration = Duration::from_millis(20);

/// Pause between synthesized audio chunks
pub const CHUNK_DELAY: Duration = Duration::from_millis(10);

/// Raw bytes per `tts_audio_chunk` event
pub const TTS_CHUNK_SIZE: usize = 8192;

/// Transcripts below this confidence are treated as silence
pub const CONFIDENCE_THRESHOLD: f32 = 0.3;

/// Reply used when the turn contained nothing intelligible
pub const FALLBACK_REPLY: &str = "I'm sorry, I didn't catch that. Could you repeat?";

/// True when the transcript should get the fixed repeat prompt instead
/// of a generated reply
pub fn needs_repeat_prompt(transcript: &str, confidence: f32) -> bool {
    transcript.trim().is_empty() || confidence < CONFIDENCE_THRESHOLD
}

/// One frozen turn moving through the collaborator stages
///
/// Borrowed collaborators keep the orchestrator free of provider
/// construction; the connection handler wires in whatever the app state
/// holds.
pub struct TurnPipeline<'a> {
    pub store: &'a dyn CallStore,
    pub stt: &'a dyn BaseSTT,
    pub llm: &'a dyn BaseLLM,
    pub tts: &'a dyn BaseTTS,
    pub events: &'a mpsc::Sender<CallMessageRoute>,
    pub session_id: &'a str,
}

impl TurnPipeline<'_> {
    /// Run all stages for one frozen turn
    ///
    /// The turn row is persisted before the first event so milestone
    /// updates always have a row to land on. Collaborator failures are
    /// reported on the event channel and end the turn early; only
    /// storage failures propagate.
    pub async fn run(&self, turn: &mut ActiveTurn, audio: Bytes) -> StorageResult<()> {
        debug!(
            "Running turn {} pipeline with {} bytes of audio",
            turn.id,
            audio.len()
        );

        let record = Turn::new(
            turn.id.clone(),
            self.session_id.to_string(),
            turn.clock.started_wall(),
        );
        self.store.create_turn(record).await?;

        // The placeholder partial goes out before the transcription call
        // so the client sees progress immediately.
        let partial_elapsed = turn.clock.mark_first_partial();
        self.store
            .record_first_partial(&turn.id, partial_elapsed)
            .await?;
        self.send(CallOutgoingMessage::SttPartial {
            text: STT_PARTIAL_PLACEHOLDER.to_string(),
        })
        .await;

        let transcription = match self.stt.transcribe(audio).await {
            Ok(t) => t,
            Err(e) => {
                warn!("Transcription failed for turn {}: {}", turn.id, e);
                self.send(CallOutgoingMessage::error(format!("STT failed: {e}")))
                    .await;
                return Ok(());
            }
        };
        debug!(
            "Turn {} transcript {:?} (confidence {:.2})",
            turn.id, transcription.text, transcription.confidence
        );

        let transcript_elapsed = turn.clock.mark_final_transcript();
        self.store
            .record_final_transcript(&turn.id, &transcription.text, transcript_elapsed)
            .await?;
        self.send(CallOutgoingMessage::SttFinal {
            text: transcription.text.clone(),
            confidence: transcription.confidence,
            latency_ms: to_latency_ms(transcript_elapsed),
        })
        .await;

        let reply = if needs_repeat_prompt(&transcription.text, transcription.confidence) {
            debug!("Turn {} had no usable speech, using the repeat prompt", turn.id);
            FALLBACK_REPLY.to_string()
        } else {
            match self.llm.generate_reply(&transcription.text).await {
                Ok(full_text) => self.stream_reply_words(&full_text).await,
                Err(e) => {
                    warn!("Reply generation failed for turn {}: {}", turn.id, e);
                    self.send(CallOutgoingMessage::error(format!("LLM failed: {e}")))
                        .await;
                    return Ok(());
                }
            }
        };

        let reply_audio = match self.tts.synthesize(&reply).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Speech synthesis failed for turn {}: {}", turn.id, e);
                self.send(CallOutgoingMessage::error(format!("TTS failed: {e}")))
                    .await;
                return Ok(());
            }
        };

        let mut first_chunk = true;
        for chunk in reply_audio.chunks(TTS_CHUNK_SIZE) {
            if first_chunk {
                first_chunk = false;
                // Persisted before the chunk is sent, so a reader polling
                // the turn never sees audio without its latency.
                let audio_elapsed = turn.clock.mark_first_audio();
                self.store
                    .record_first_audio(&turn.id, audio_elapsed)
                    .await?;
            }
            self.send(CallOutgoingMessage::audio_chunk(chunk)).await;
            sleep(CHUNK_DELAY).await;
        }
        self.send(CallOutgoingMessage::TtsDone).await;

        self.store.complete_turn(&turn.id, &reply, now_ts()).await?;
        info!(
            "Turn {} completed in {:.3}s",
            turn.id,
            turn.clock.elapsed()
        );

        Ok(())
    }

    /// Stream the reply word by word, then emit the closing event
    ///
    /// Every word but the last carries a trailing space, so the streamed
    /// chunks concatenate to the returned reply exactly.
    async fn stream_reply_words(&self, full_text: &str) -> String {
        let words: Vec<&str> = full_text.split_whitespace().collect();
        let mut reply = String::new();

        for (i, word) in words.iter().enumerate() {
            let chunk = if i + 1 < words.len() {
                format!("{word} ")
            } else {
                (*word).to_string()
            };
            reply.push_str(&chunk);
            self.send(CallOutgoingMessage::AssistantText {
                text: chunk,
                is_final: false,
                full_text: None,
            })
            .await;
            sleep(WORD_DELAY).await;
        }

        self.send(CallOutgoingMessage::AssistantText {
            text: String::new(),
            is_final: true,
            full_text: Some(reply.clone()),
        })
        .await;

        reply
    }

    /// Queue one event for the sender task; a closed channel means the
    /// connection is gone and the event can be dropped
    async fn send(&self, message: CallOutgoingMessage) {
        let _ = self
            .events
            .send(CallMessageRoute::Outgoing(message))
            .await;
    }
}
