//! Message types for Hugging Face Inference STT responses.

use serde::{Deserialize, Serialize};

/// Transcription response from the inference endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    /// The transcribed text. Absent or null is treated as empty.
    #[serde(default)]
    pub text: String,
}

/// Error response from the inference endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HfErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
