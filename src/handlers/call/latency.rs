//! Per-turn latency clock
//!
//! Wall-clock anchor plus monotonic elapsed measurement for a single
//! turn. Three milestones are captured: first partial transcript, final
//! transcript and first synthesized audio chunk. A milestone records on
//! first use; later calls return the original measurement, so persisted
//! latencies can never regress.

use std::time::Instant;

use crate::session::now_ts;

/// Latency clock anchored at the client's "start" message
///
/// Elapsed values come from a monotonic clock, so wall-time adjustments
/// cannot produce negative or shrinking latencies.
#[derive(Debug, Clone)]
pub struct TurnClock {
    started_wall: f64,
    started: Instant,
    first_partial: Option<f64>,
    final_transcript: Option<f64>,
    first_audio: Option<f64>,
}

impl TurnClock {
    /// Anchor a new clock at the current instant
    pub fn start() -> Self {
        Self {
            started_wall: now_ts(),
            started: Instant::now(),
            first_partial: None,
            final_transcript: None,
            first_audio: None,
        }
    }

    /// Wall-clock timestamp of the turn start, in epoch seconds
    pub fn started_wall(&self) -> f64 {
        self.started_wall
    }

    /// Seconds elapsed since the turn started
    pub fn elapsed(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Record the first-partial milestone; returns the recorded value
    pub fn mark_first_partial(&mut self) -> f64 {
        let elapsed = self.elapsed();
        *self.first_partial.get_or_insert(elapsed)
    }

    /// Record the final-transcript milestone; returns the recorded value
    pub fn mark_final_transcript(&mut self) -> f64 {
        let elapsed = self.elapsed();
        *self.final_transcript.get_or_insert(elapsed)
    }

    /// Record the first-audio milestone; returns the recorded value
    pub fn mark_first_audio(&mut self) -> f64 {
        let elapsed = self.elapsed();
        *self.first_audio.get_or_insert(elapsed)
    }
}

/// Convert an elapsed-seconds measurement to whole milliseconds
pub fn to_latency_ms(elapsed_secs: f64) -> u64 {
    (elapsed_secs * 1000.0).round() as u64
}
