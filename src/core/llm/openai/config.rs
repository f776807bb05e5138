//! Configuration for the OpenAI-compatible chat completion provider.
//!
//! Any endpoint that speaks the OpenAI chat completions protocol works
//! here. The default base URL points at the Hugging Face router, which
//! fronts hosted open models behind the same wire format.

use serde::{Deserialize, Serialize};

// =============================================================================
// Constants
// =============================================================================

/// Default OpenAI-compatible base URL (Hugging Face router).
pub const DEFAULT_BASE_URL: &str = "https://router.huggingface.co/v1";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "HuggingFaceH4/zephyr-7b-beta:featherless-ai";

/// System prompt steering replies toward short spoken answers.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful voice assistant. Keep responses concise (1-3 sentences).";

/// Default completion length cap. Spoken replies stay short.
pub const DEFAULT_MAX_TOKENS: u32 = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for `OpenAILLM`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAILLMConfig {
    /// API token. Optional; unauthenticated requests are allowed but
    /// rate-limited by the provider.
    pub api_key: Option<String>,

    /// Chat model identifier.
    pub model: String,

    /// System prompt prepended to every request.
    pub system_prompt: String,

    /// Maximum tokens to generate per reply.
    pub max_tokens: u32,

    /// Custom base URL overriding [`DEFAULT_BASE_URL`].
    /// Used for self-hosted endpoints and tests.
    pub custom_endpoint: Option<String>,
}

impl Default for OpenAILLMConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            custom_endpoint: None,
        }
    }
}

impl OpenAILLMConfig {
    /// Full URL of the chat completions endpoint.
    pub fn api_url(&self) -> String {
        let base = self
            .custom_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');
        format!("{base}/chat/completions")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("LLM model is required".to_string());
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Set the API token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the chat model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Set the completion length cap.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Override the chat completions base URL.
    pub fn with_custom_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.custom_endpoint = Some(endpoint.into());
        self
    }
}
