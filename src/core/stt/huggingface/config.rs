//! Configuration for the Hugging Face Inference STT provider.
//!
//! The provider calls the hosted inference endpoint for Whisper-family
//! models. A raw audio POST to `{base}/models/{model}` returns the
//! transcribed text as JSON.

use serde::{Deserialize, Serialize};

// =============================================================================
// Constants
// =============================================================================

/// Base URL of the Hugging Face Inference router.
pub const HF_INFERENCE_URL: &str = "https://router.huggingface.co/hf-inference";

/// Default transcription model.
pub const DEFAULT_MODEL: &str = "openai/whisper-large-v3";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for `HuggingFaceSTT`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuggingFaceSTTConfig {
    /// API token. Optional; unauthenticated requests are allowed but
    /// rate-limited by the provider.
    pub api_key: Option<String>,

    /// Model repository id (e.g. `openai/whisper-large-v3`).
    pub model: String,

    /// Custom base URL overriding [`HF_INFERENCE_URL`].
    /// Used for self-hosted endpoints and tests.
    pub custom_endpoint: Option<String>,
}

impl Default for HuggingFaceSTTConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            custom_endpoint: None,
        }
    }
}

impl HuggingFaceSTTConfig {
    /// Full transcription URL for the configured model.
    pub fn api_url(&self) -> String {
        let base = self
            .custom_endpoint
            .as_deref()
            .unwrap_or(HF_INFERENCE_URL)
            .trim_end_matches('/');
        format!("{}/models/{}", base, self.model)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("STT model is required".to_string());
        }
        Ok(())
    }

    /// Set the API token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the transcription model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the inference base URL.
    pub fn with_custom_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.custom_endpoint = Some(endpoint.into());
        self
    }
}
