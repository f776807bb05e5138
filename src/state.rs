//! Shared application state
//!
//! `AppState` holds everything a connection needs for the lifetime of the
//! server: the merged configuration, the session registry, the call store,
//! and the three pipeline providers (STT, LLM, TTS). Providers are built
//! once at startup and shared across all connections behind `Arc`.

use std::sync::Arc;

use tracing::info;

use crate::config::ServerConfig;
use crate::core::llm::{BaseLLM, OpenAILLM, OpenAILLMConfig};
use crate::core::stt::{BaseSTT, HuggingFaceSTT, HuggingFaceSTTConfig};
use crate::core::tts::{BaseTTS, GoogleTTS, GoogleTTSConfig};
use crate::errors::app_error::AppResult;
use crate::session::SessionRegistry;
use crate::storage::{CallStore, MemoryStore};

/// Shared state for all handlers
pub struct AppState {
    /// Merged server configuration
    pub config: ServerConfig,
    /// Registry of live call connections
    pub registry: SessionRegistry,
    /// Persistence for call sessions and turns
    pub store: Arc<dyn CallStore>,
    /// Speech-to-text provider
    pub stt: Arc<dyn BaseSTT>,
    /// Language model provider
    pub llm: Arc<dyn BaseLLM>,
    /// Text-to-speech provider
    pub tts: Arc<dyn BaseTTS>,
}

impl AppState {
    /// Build the application state from configuration
    ///
    /// Constructs the provider clients from the configured credentials,
    /// models, and endpoint overrides, and an in-memory call store.
    ///
    /// # Errors
    /// Returns an error if any provider configuration fails validation or
    /// an HTTP client cannot be constructed.
    pub async fn new(config: ServerConfig) -> AppResult<Arc<Self>> {
        let mut stt_config = HuggingFaceSTTConfig::default();
        if let Some(token) = config.hf_token.as_deref() {
            stt_config = stt_config.with_api_key(token);
        }
        if let Some(model) = config.stt_model.as_deref() {
            stt_config = stt_config.with_model(model);
        }
        if let Some(url) = config.stt_base_url.as_deref() {
            stt_config = stt_config.with_custom_endpoint(url);
        }
        let stt = HuggingFaceSTT::with_config(stt_config)?;

        let mut llm_config = OpenAILLMConfig::default();
        if let Some(token) = config.hf_token.as_deref() {
            llm_config = llm_config.with_api_key(token);
        }
        if let Some(model) = config.llm_model.as_deref() {
            llm_config = llm_config.with_model(model);
        }
        if let Some(url) = config.llm_base_url.as_deref() {
            llm_config = llm_config.with_custom_endpoint(url);
        }
        let llm = OpenAILLM::with_config(llm_config)?;

        let mut tts_config = GoogleTTSConfig::default();
        if let Some(language) = config.tts_language.as_deref() {
            tts_config = tts_config.with_language(language);
        }
        if let Some(url) = config.tts_base_url.as_deref() {
            tts_config = tts_config.with_custom_endpoint(url);
        }
        let tts = GoogleTTS::with_config(tts_config)?;

        info!(
            "Providers initialized: stt={}, llm={}, tts={}",
            stt.get_provider_info(),
            llm.get_provider_info(),
            tts.get_provider_info()
        );

        Ok(Arc::new(Self {
            config,
            registry: SessionRegistry::new(),
            store: Arc::new(MemoryStore::new()),
            stt: Arc::new(stt),
            llm: Arc::new(llm),
            tts: Arc::new(tts),
        }))
    }

    /// Build application state around externally constructed providers
    ///
    /// Used by tests to inject mock providers and inspect the store.
    pub fn with_providers(
        config: ServerConfig,
        store: Arc<dyn CallStore>,
        stt: Arc<dyn BaseSTT>,
        llm: Arc<dyn BaseLLM>,
        tts: Arc<dyn BaseTTS>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            registry: SessionRegistry::new(),
            store,
            stt,
            llm,
            tts,
        })
    }
}
