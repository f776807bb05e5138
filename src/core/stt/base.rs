//! Core STT abstractions shared by all speech-to-text providers.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Errors that can occur during speech-to-text operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum STTError {
    /// Provider configuration is missing or invalid.
    #[error("STT configuration error: {0}")]
    ConfigurationError(String),

    /// The provider rejected the supplied credentials.
    #[error("STT authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Transport-level failure while talking to the provider.
    #[error("STT network error: {0}")]
    NetworkError(String),

    /// The provider returned an error response.
    #[error("STT provider error: {0}")]
    ProviderError(String),
}

/// Result type for STT operations.
pub type STTResult<T> = Result<T, STTError>;

/// A finished transcription of one utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    /// Transcribed text with surrounding whitespace removed.
    pub text: String,

    /// Confidence score in the range 0.0 to 1.0.
    pub confidence: f32,
}

impl Transcription {
    /// Create a transcription from raw provider text.
    ///
    /// The text is trimmed; providers that do not report confidence
    /// use a fixed high score for non-empty text and zero otherwise.
    pub fn from_text(raw: &str) -> Self {
        let text = raw.trim().to_string();
        let confidence = if text.is_empty() { 0.0 } else { 0.9 };
        Self { text, confidence }
    }
}

/// Common interface implemented by every STT provider.
///
/// Providers are stateless HTTP clients and can be shared across
/// concurrent sessions behind an `Arc`.
#[async_trait]
pub trait BaseSTT: Send + Sync {
    /// Transcribe one complete utterance and return the final text.
    async fn transcribe(&self, audio: Bytes) -> STTResult<Transcription>;

    /// Short provider identifier used in logs.
    fn get_provider_info(&self) -> &'static str;
}
