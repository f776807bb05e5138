//! Mock Pipeline Providers
//!
//! In-process implementations of the provider traits with scripted
//! results, failure switches, and optional response delays. The call
//! flow tests drive the full pipeline through these without touching
//! the network.

// Allow dead code in test infrastructure - each test binary compiles this
// module separately and uses a different subset of it
#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use s2s_gateway::ServerConfig;
use s2s_gateway::core::llm::{BaseLLM, LLMError, LLMResult};
use s2s_gateway::core::stt::{BaseSTT, STTError, STTResult, Transcription};
use s2s_gateway::core::tts::{BaseTTS, TTSError, TTSResult};
use s2s_gateway::state::AppState;
use s2s_gateway::storage::MemoryStore;

// =============================================================================
// STT Mock
// =============================================================================

/// Scripted speech-to-text provider.
///
/// Exact audio payloads registered with `with_mapping` return their
/// mapped transcription; anything else falls back to the default
/// result. Every payload received is recorded for inspection.
pub struct MockSTT {
    default: Transcription,
    mappings: Vec<(Vec<u8>, Transcription)>,
    fail: bool,
    delay: Option<Duration>,
    received: Mutex<Vec<Vec<u8>>>,
}

impl MockSTT {
    /// Transcribe everything to the given text and confidence.
    pub fn fixed(text: &str, confidence: f32) -> Self {
        Self {
            default: Transcription {
                text: text.to_string(),
                confidence,
            },
            mappings: Vec::new(),
            fail: false,
            delay: None,
            received: Mutex::new(Vec::new()),
        }
    }

    /// Fail every transcription request.
    pub fn failing() -> Self {
        let mut mock = Self::fixed("", 0.0);
        mock.fail = true;
        mock
    }

    /// Map an exact audio payload to a transcription result.
    pub fn with_mapping(mut self, audio: Vec<u8>, text: &str, confidence: f32) -> Self {
        self.mappings.push((
            audio,
            Transcription {
                text: text.to_string(),
                confidence,
            },
        ));
        self
    }

    /// Delay every transcription by the given duration.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All audio payloads received so far, in call order.
    pub fn received(&self) -> Vec<Vec<u8>> {
        self.received.lock().clone()
    }
}

#[async_trait]
impl BaseSTT for MockSTT {
    async fn transcribe(&self, audio: Bytes) -> STTResult<Transcription> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.received.lock().push(audio.to_vec());
        if self.fail {
            return Err(STTError::ProviderError(
                "mock transcription failure".to_string(),
            ));
        }
        let result = self
            .mappings
            .iter()
            .find(|(pattern, _)| pattern.as_slice() == audio.as_ref())
            .map(|(_, transcription)| transcription.clone())
            .unwrap_or_else(|| self.default.clone());
        Ok(result)
    }

    fn get_provider_info(&self) -> &'static str {
        "mock-stt"
    }
}

// =============================================================================
// LLM Mock
// =============================================================================

/// Scripted language model provider.
///
/// Replies with `Echo: {prompt}` unless a fixed reply is set. Prompts
/// are recorded for inspection.
pub struct MockLLM {
    reply: Option<String>,
    fail: bool,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl MockLLM {
    /// Echo the prompt back in the reply.
    pub fn echo() -> Self {
        Self {
            reply: None,
            fail: false,
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Reply with the same fixed text for every prompt.
    pub fn fixed(reply: &str) -> Self {
        let mut mock = Self::echo();
        mock.reply = Some(reply.to_string());
        mock
    }

    /// Fail every completion request.
    pub fn failing() -> Self {
        let mut mock = Self::echo();
        mock.fail = true;
        mock
    }

    /// Delay every completion by the given duration.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl BaseLLM for MockLLM {
    async fn generate_reply(&self, user_text: &str) -> LLMResult<String> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.prompts.lock().push(user_text.to_string());
        if self.fail {
            return Err(LLMError::ProviderError(
                "mock completion failure".to_string(),
            ));
        }
        Ok(self
            .reply
            .clone()
            .unwrap_or_else(|| format!("Echo: {user_text}")))
    }

    fn get_provider_info(&self) -> &'static str {
        "mock-llm"
    }
}

// =============================================================================
// TTS Mock
// =============================================================================

/// Scripted text-to-speech provider.
///
/// Returns a fixed-size audio payload regardless of input. Synthesized
/// texts are recorded for inspection.
pub struct MockTTS {
    audio_len: usize,
    fail: bool,
    delay: Option<Duration>,
    texts: Mutex<Vec<String>>,
}

impl MockTTS {
    /// Return `audio_len` bytes of audio for every synthesis request.
    pub fn with_audio_len(audio_len: usize) -> Self {
        Self {
            audio_len,
            fail: false,
            delay: None,
            texts: Mutex::new(Vec::new()),
        }
    }

    /// Fail every synthesis request.
    pub fn failing() -> Self {
        let mut mock = Self::with_audio_len(0);
        mock.fail = true;
        mock
    }

    /// Delay every synthesis by the given duration.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All texts synthesized so far, in call order.
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().clone()
    }
}

#[async_trait]
impl BaseTTS for MockTTS {
    async fn synthesize(&self, text: &str) -> TTSResult<Bytes> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.texts.lock().push(text.to_string());
        if self.fail {
            return Err(TTSError::ProviderError(
                "mock synthesis failure".to_string(),
            ));
        }
        Ok(Bytes::from(vec![0xAB; self.audio_len]))
    }

    fn get_provider_info(&self) -> &'static str {
        "mock-tts"
    }
}

// =============================================================================
// State Helper
// =============================================================================

/// Application state wired to the given mocks and a fresh in-memory store.
pub fn mock_app_state(
    config: ServerConfig,
    stt: Arc<MockSTT>,
    llm: Arc<MockLLM>,
    tts: Arc<MockTTS>,
) -> Arc<AppState> {
    AppState::with_providers(config, Arc::new(MemoryStore::new()), stt, llm, tts)
}
