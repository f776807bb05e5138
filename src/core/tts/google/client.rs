//! Google Translate TTS client.
//!
//! This module provides the `GoogleTTS` client that implements the
//! `BaseTTS` trait against the public translate speech endpoint. Each
//! request returns a complete MP3 for one short text segment; longer
//! text is split at whitespace and the MP3 payloads are concatenated,
//! which MP3 framing tolerates.

use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use super::super::base::{BaseTTS, TTSError, TTSResult};
use super::config::{GoogleTTSConfig, MAX_SEGMENT_CHARS};

// =============================================================================
// Constants
// =============================================================================

/// Request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Connect timeout in seconds.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// User-Agent header value for API requests.
const USER_AGENT: &str = concat!("S2S-Gateway/", env!("CARGO_PKG_VERSION"));

/// Client identifier expected by the translate speech endpoint.
const TTS_CLIENT_PARAM: &str = "tw-ob";

// =============================================================================
// Google Translate TTS Client
// =============================================================================

/// REST client for the Google Translate speech endpoint.
#[derive(Debug)]
pub struct GoogleTTS {
    config: GoogleTTSConfig,
    http_client: Client,
}

impl GoogleTTS {
    /// Create a new client from the given configuration.
    pub fn with_config(config: GoogleTTSConfig) -> TTSResult<Self> {
        config.validate().map_err(TTSError::InvalidConfiguration)?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                TTSError::InvalidConfiguration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Current configuration.
    pub fn config(&self) -> &GoogleTTSConfig {
        &self.config
    }

    /// Fetch the MP3 audio for one text segment.
    async fn fetch_segment(&self, segment: &str) -> TTSResult<Bytes> {
        let response = self
            .http_client
            .get(self.config.api_url())
            .query(&[
                ("ie", "UTF-8"),
                ("q", segment),
                ("tl", self.config.language.as_str()),
                ("client", TTS_CLIENT_PARAM),
            ])
            .send()
            .await
            .map_err(|e| TTSError::NetworkError(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TTSError::ProviderError(format!("HTTP {status}: {body}")));
        }

        response
            .bytes()
            .await
            .map_err(|e| TTSError::NetworkError(format!("Failed to read response: {e}")))
    }
}

#[async_trait::async_trait]
impl BaseTTS for GoogleTTS {
    async fn synthesize(&self, text: &str) -> TTSResult<Bytes> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TTSError::AudioGenerationFailed(
                "No text to synthesize".to_string(),
            ));
        }

        let segments = split_segments(text, MAX_SEGMENT_CHARS);
        info!(
            "Synthesizing {} chars in {} segment(s) (lang: {})",
            text.len(),
            segments.len(),
            self.config.language
        );

        let mut audio = Vec::new();
        for segment in segments {
            let chunk = self.fetch_segment(segment).await?;
            audio.extend_from_slice(&chunk);
        }

        if audio.is_empty() {
            return Err(TTSError::AudioGenerationFailed(
                "Provider returned no audio data".to_string(),
            ));
        }

        debug!("Synthesis complete: {} bytes of audio", audio.len());
        Ok(Bytes::from(audio))
    }

    fn get_provider_info(&self) -> &'static str {
        "google"
    }
}

/// Split text into segments of at most `max_chars` characters,
/// cutting at whitespace so words stay intact. A single word longer
/// than the limit is hard-cut at a character boundary.
fn split_segments(text: &str, max_chars: usize) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut rest = text.trim();

    while !rest.is_empty() {
        if rest.chars().count() <= max_chars {
            segments.push(rest);
            break;
        }

        // Byte offset just past max_chars characters.
        let limit = rest
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());

        let cut = rest[..limit].rfind(char::is_whitespace).unwrap_or(limit);
        let (head, tail) = rest.split_at(cut);
        let head = head.trim_end();
        if !head.is_empty() {
            segments.push(head);
        }
        rest = tail.trim_start();
    }

    segments
}
