//! Core TTS abstractions shared by all text-to-speech providers.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Errors that can occur during text-to-speech operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TTSError {
    /// Provider configuration is missing or invalid.
    #[error("TTS configuration error: {0}")]
    InvalidConfiguration(String),

    /// Transport-level failure while talking to the provider.
    #[error("TTS network error: {0}")]
    NetworkError(String),

    /// The provider returned an error response.
    #[error("TTS provider error: {0}")]
    ProviderError(String),

    /// The provider produced no usable audio.
    #[error("TTS audio generation failed: {0}")]
    AudioGenerationFailed(String),
}

/// Result type for TTS operations.
pub type TTSResult<T> = Result<T, TTSError>;

/// Common interface implemented by every TTS provider.
///
/// Providers are stateless HTTP clients and can be shared across
/// concurrent sessions behind an `Arc`.
#[async_trait]
pub trait BaseTTS: Send + Sync {
    /// Synthesize speech for the given text.
    ///
    /// Returns the complete encoded audio (MP3 for the Google Translate
    /// provider). Callers chunk the result for streaming delivery.
    async fn synthesize(&self, text: &str) -> TTSResult<Bytes>;

    /// Short provider identifier used in logs.
    fn get_provider_info(&self) -> &'static str;
}
