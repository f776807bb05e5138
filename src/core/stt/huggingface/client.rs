//! Hugging Face Inference STT client.
//!
//! This module provides the `HuggingFaceSTT` client that implements the
//! `BaseSTT` trait against the hosted inference API. The API is a plain
//! REST endpoint: the complete utterance is sent as a raw byte POST and
//! the response carries the final transcript.
//!
//! The endpoint does not report a confidence score, so the client
//! assigns a fixed high confidence to non-empty transcripts and zero to
//! empty ones. Callers decide how to treat low-confidence results.

use bytes::Bytes;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use std::time::Duration;
use tracing::{debug, info};

use super::super::base::{BaseSTT, STTError, STTResult, Transcription};
use super::config::HuggingFaceSTTConfig;
use super::messages::{HfErrorResponse, TranscriptionResponse};

// =============================================================================
// Constants
// =============================================================================

/// Request timeout in seconds. Whisper inference on long utterances can
/// take a while on cold models.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Connect timeout in seconds.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// User-Agent header value for API requests.
const USER_AGENT: &str = concat!("S2S-Gateway/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Hugging Face STT Client
// =============================================================================

/// REST client for the Hugging Face Inference transcription endpoint.
#[derive(Debug)]
pub struct HuggingFaceSTT {
    config: HuggingFaceSTTConfig,
    http_client: Client,
}

impl HuggingFaceSTT {
    /// Create a new client from the given configuration.
    pub fn with_config(config: HuggingFaceSTTConfig) -> STTResult<Self> {
        config.validate().map_err(STTError::ConfigurationError)?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                STTError::ConfigurationError(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Current configuration.
    pub fn config(&self) -> &HuggingFaceSTTConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl BaseSTT for HuggingFaceSTT {
    async fn transcribe(&self, audio: Bytes) -> STTResult<Transcription> {
        let url = self.config.api_url();
        info!(
            "Sending {} bytes of audio to Hugging Face Inference API (model: {})",
            audio.len(),
            self.config.model
        );

        let mut request = self.http_client.post(&url).body(audio);
        if let Some(api_key) = &self.config.api_key {
            request = request.header(AUTHORIZATION, format!("Bearer {api_key}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| STTError::NetworkError(format!("Request failed: {e}")))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| STTError::NetworkError(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let error_msg = match serde_json::from_str::<HfErrorResponse>(&response_text) {
                Ok(parsed) => parsed.error,
                Err(_) => response_text,
            };
            return Err(match status.as_u16() {
                401 | 403 => {
                    STTError::AuthenticationFailed(format!("HTTP {}: {}", status, error_msg))
                }
                _ => STTError::ProviderError(format!("HTTP {}: {}", status, error_msg)),
            });
        }

        let parsed: TranscriptionResponse = serde_json::from_str(&response_text)
            .map_err(|e| STTError::ProviderError(format!("Failed to parse response: {e}")))?;

        let transcription = Transcription::from_text(&parsed.text);
        debug!(
            "Transcription complete: {} chars, confidence {:.2}",
            transcription.text.len(),
            transcription.confidence
        );
        Ok(transcription)
    }

    fn get_provider_info(&self) -> &'static str {
        "huggingface"
    }
}
