//! OpenAI-compatible chat completion client.
//!
//! This module provides the `OpenAILLM` client that implements the
//! `BaseLLM` trait against any OpenAI-compatible chat completions
//! endpoint. Requests are non-streaming: one POST per turn returns the
//! complete assistant reply.

use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use std::time::Duration;
use tracing::{debug, info};

use super::super::base::{BaseLLM, LLMError, LLMResult};
use super::config::OpenAILLMConfig;
use super::messages::{ChatCompletionRequest, ChatCompletionResponse, ChatErrorResponse, ChatMessage};

// =============================================================================
// Constants
// =============================================================================

/// Request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Connect timeout in seconds.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// User-Agent header value for API requests.
const USER_AGENT: &str = concat!("S2S-Gateway/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// OpenAI-Compatible LLM Client
// =============================================================================

/// REST client for OpenAI-compatible chat completion endpoints.
#[derive(Debug)]
pub struct OpenAILLM {
    config: OpenAILLMConfig,
    http_client: Client,
}

impl OpenAILLM {
    /// Create a new client from the given configuration.
    pub fn with_config(config: OpenAILLMConfig) -> LLMResult<Self> {
        config.validate().map_err(LLMError::ConfigurationError)?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                LLMError::ConfigurationError(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Current configuration.
    pub fn config(&self) -> &OpenAILLMConfig {
        &self.config
    }

    /// Build the request body for a single user message.
    fn build_request(&self, user_text: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(&self.config.system_prompt),
                ChatMessage::user(user_text),
            ],
            max_tokens: Some(self.config.max_tokens),
        }
    }
}

#[async_trait::async_trait]
impl BaseLLM for OpenAILLM {
    async fn generate_reply(&self, user_text: &str) -> LLMResult<String> {
        let url = self.config.api_url();
        info!(
            "Requesting chat completion (model: {}, prompt: {} chars)",
            self.config.model,
            user_text.len()
        );

        let body = self.build_request(user_text);
        let mut request = self.http_client.post(&url).json(&body);
        if let Some(api_key) = &self.config.api_key {
            request = request.header(AUTHORIZATION, format!("Bearer {api_key}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(format!("Request failed: {e}")))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| LLMError::NetworkError(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let error_msg = match serde_json::from_str::<ChatErrorResponse>(&response_text) {
                Ok(parsed) => parsed.error.message,
                Err(_) => response_text,
            };
            return Err(match status.as_u16() {
                401 | 403 => {
                    LLMError::AuthenticationFailed(format!("HTTP {}: {}", status, error_msg))
                }
                _ => LLMError::ProviderError(format!("HTTP {}: {}", status, error_msg)),
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&response_text)
            .map_err(|e| LLMError::ProviderError(format!("Failed to parse response: {e}")))?;

        let content = parsed
            .first_content()
            .ok_or_else(|| LLMError::ProviderError("Response contained no choices".to_string()))?;

        let reply = content.trim().to_string();
        debug!("Chat completion received: {} chars", reply.len());
        Ok(reply)
    }

    fn get_provider_info(&self) -> &'static str {
        "openai"
    }
}
