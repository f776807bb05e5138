//! Configuration for the Google Translate TTS provider.
//!
//! The provider uses the public translate speech endpoint, which
//! returns MP3 audio for short text snippets. Longer text is split
//! into segments and the resulting audio is concatenated.

use serde::{Deserialize, Serialize};

// =============================================================================
// Constants
// =============================================================================

/// Google Translate speech synthesis endpoint.
pub const GOOGLE_TRANSLATE_TTS_URL: &str = "https://translate.google.com/translate_tts";

/// Default language code.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Maximum characters per synthesis request. The endpoint rejects
/// longer inputs, so text is segmented at whitespace below this limit.
pub const MAX_SEGMENT_CHARS: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for `GoogleTTS`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleTTSConfig {
    /// Language code passed as the `tl` query parameter (e.g. `en`).
    pub language: String,

    /// Custom endpoint overriding [`GOOGLE_TRANSLATE_TTS_URL`].
    /// Used for tests.
    pub custom_endpoint: Option<String>,
}

impl Default for GoogleTTSConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            custom_endpoint: None,
        }
    }
}

impl GoogleTTSConfig {
    /// Full synthesis endpoint URL.
    pub fn api_url(&self) -> String {
        self.custom_endpoint
            .as_deref()
            .unwrap_or(GOOGLE_TRANSLATE_TTS_URL)
            .trim_end_matches('/')
            .to_string()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.language.trim().is_empty() {
            return Err("Language code is required".to_string());
        }
        Ok(())
    }

    /// Set the language code.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Override the synthesis endpoint.
    pub fn with_custom_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.custom_endpoint = Some(endpoint.into());
        self
    }
}
