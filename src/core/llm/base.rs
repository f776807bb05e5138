//! Core LLM abstractions shared by all language model providers.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during language model operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LLMError {
    /// Provider configuration is missing or invalid.
    #[error("LLM configuration error: {0}")]
    ConfigurationError(String),

    /// The provider rejected the supplied credentials.
    #[error("LLM authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Transport-level failure while talking to the provider.
    #[error("LLM network error: {0}")]
    NetworkError(String),

    /// The provider returned an error response.
    #[error("LLM provider error: {0}")]
    ProviderError(String),
}

/// Result type for LLM operations.
pub type LLMResult<T> = Result<T, LLMError>;

/// Common interface implemented by every LLM provider.
///
/// Providers are stateless HTTP clients and can be shared across
/// concurrent sessions behind an `Arc`.
#[async_trait]
pub trait BaseLLM: Send + Sync {
    /// Generate an assistant reply for a single user message.
    ///
    /// The provider prepends its configured system prompt. The returned
    /// text is trimmed of surrounding whitespace.
    async fn generate_reply(&self, user_text: &str) -> LLMResult<String>;

    /// Short provider identifier used in logs.
    fn get_provider_info(&self) -> &'static str;
}
