//! Turn state machine and audio buffer
//!
//! One machine instance lives on each connection task. It owns the audio
//! accumulator and the identity of the armed turn, and routes every
//! control message through an exhaustive match on the current phase so no
//! (phase, input) combination is handled by accident.

use bytes::Bytes;
use uuid::Uuid;

use super::latency::TurnClock;

/// Observable connection phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// No turn in progress
    Idle,
    /// A turn is armed and audio frames are being collected
    Recording,
    /// The pipeline is running for a frozen turn
    Processing,
    /// The connection is shutting down
    Closed,
}

/// Byte accumulator for the turn currently being recorded
///
/// Frames are appended in arrival order, without inspection or decoding.
#[derive(Debug, Default)]
pub struct TurnBuffer {
    data: Vec<u8>,
}

impl TurnBuffer {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Append one binary frame
    pub fn append(&mut self, frame: &[u8]) {
        self.data.extend_from_slice(frame);
    }

    /// Bytes buffered so far
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Discard all buffered audio
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Freeze the accumulated audio, leaving the buffer empty
    pub fn take(&mut self) -> Bytes {
        Bytes::from(std::mem::take(&mut self.data))
    }

    /// View of the buffered bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

/// Identity and clock of the turn armed by the most recent "start"
#[derive(Debug)]
pub struct ActiveTurn {
    /// Server-generated turn identifier
    pub id: String,
    /// Latency clock anchored at the "start" message
    pub clock: TurnClock,
}

impl ActiveTurn {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            clock: TurnClock::start(),
        }
    }
}

/// Internal phase storage
///
/// `Recording` carries the armed turn, so "recording without a turn"
/// cannot be represented.
#[derive(Debug)]
enum PhaseState {
    Idle,
    Recording(ActiveTurn),
    Processing,
    Closed,
}

/// Outcome of a "start" control message
#[derive(Debug)]
pub struct TurnStarted {
    /// Identifier of the armed turn
    pub turn_id: String,
    /// Wall-clock timestamp of the start, in epoch seconds
    pub started_ts: f64,
}

/// Outcome of a "stop" control message
#[derive(Debug)]
pub enum StopOutcome {
    /// The buffer was frozen; run the pipeline with this turn and audio
    Process {
        /// The turn armed by the matching "start"
        turn: ActiveTurn,
        /// Frozen audio, in arrival order
        audio: Bytes,
    },
    /// Not a single audio byte was buffered; the armed turn (if any)
    /// stays armed
    NoAudio,
    /// Audio was buffered but no "start" ever armed a turn
    NoActiveTurn,
    /// The machine is closed or mid-pipeline; nothing to do
    Ignored,
}

/// Per-connection turn state machine
///
/// All transitions go through the `on_*` methods. Each matches
/// exhaustively on the current phase.
#[derive(Debug)]
pub struct TurnStateMachine {
    state: PhaseState,
    buffer: TurnBuffer,
}

impl TurnStateMachine {
    pub fn new() -> Self {
        Self {
            state: PhaseState::Idle,
            buffer: TurnBuffer::new(),
        }
    }

    /// Current phase
    pub fn phase(&self) -> TurnPhase {
        match self.state {
            PhaseState::Idle => TurnPhase::Idle,
            PhaseState::Recording(_) => TurnPhase::Recording,
            PhaseState::Processing => TurnPhase::Processing,
            PhaseState::Closed => TurnPhase::Closed,
        }
    }

    /// Bytes buffered for the current turn
    pub fn buffered(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    /// Handle "start": arm a fresh turn
    ///
    /// Allowed while Idle and while Recording, where it abandons the
    /// previous recording along with any buffered audio. Returns `None`
    /// when no turn can be armed (mid-pipeline or closed).
    pub fn on_start(&mut self) -> Option<TurnStarted> {
        match self.state {
            PhaseState::Idle | PhaseState::Recording(_) => {
                self.buffer.clear();
                let turn = ActiveTurn::new();
                let started = TurnStarted {
                    turn_id: turn.id.clone(),
                    started_ts: turn.clock.started_wall(),
                };
                self.state = PhaseState::Recording(turn);
                Some(started)
            }
            PhaseState::Processing | PhaseState::Closed => None,
        }
    }

    /// Handle one binary audio frame
    ///
    /// Frames are buffered in every phase except Closed, so frames that
    /// race a control message are kept rather than dropped. Audio that
    /// arrives before any "start" sits in the buffer until the next
    /// "start" clears it; it is never transcribed or persisted.
    pub fn on_audio(&mut self, frame: &[u8]) {
        match self.state {
            PhaseState::Idle | PhaseState::Recording(_) | PhaseState::Processing => {
                self.buffer.append(frame);
            }
            PhaseState::Closed => {}
        }
    }

    /// Handle "stop": freeze the buffer and hand the turn over
    ///
    /// An empty buffer is rejected without touching the armed turn, so
    /// the client can send audio and stop again. A stop that never had a
    /// matching "start" is rejected as well.
    pub fn on_stop(&mut self) -> StopOutcome {
        match std::mem::replace(&mut self.state, PhaseState::Processing) {
            PhaseState::Idle => {
                self.state = PhaseState::Idle;
                if self.buffer.is_empty() {
                    StopOutcome::NoAudio
                } else {
                    StopOutcome::NoActiveTurn
                }
            }
            PhaseState::Recording(turn) => {
                if self.buffer.is_empty() {
                    self.state = PhaseState::Recording(turn);
                    StopOutcome::NoAudio
                } else {
                    StopOutcome::Process {
                        turn,
                        audio: self.buffer.take(),
                    }
                }
            }
            // The pipeline blocks the connection task, so a stop can only
            // be observed here once the turn is done and the phase is back
            // to Idle. Kept for exhaustiveness.
            PhaseState::Processing => StopOutcome::Ignored,
            PhaseState::Closed => {
                self.state = PhaseState::Closed;
                StopOutcome::Ignored
            }
        }
    }

    /// Return to Idle after the pipeline finished
    pub fn finish_processing(&mut self) {
        match self.state {
            PhaseState::Processing => self.state = PhaseState::Idle,
            PhaseState::Idle | PhaseState::Recording(_) | PhaseState::Closed => {}
        }
    }

    /// Shut the machine down and release the buffer
    pub fn on_close(&mut self) {
        self.state = PhaseState::Closed;
        self.buffer.clear();
    }
}

impl Default for TurnStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
