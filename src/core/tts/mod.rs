mod base;
pub mod google;

use std::sync::Arc;

// Re-export public types and traits
pub use base::{BaseTTS, TTSError, TTSResult};

// Re-export Google Translate implementation
pub use google::{GOOGLE_TRANSLATE_TTS_URL, GoogleTTS, GoogleTTSConfig};

/// Supported TTS providers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TTSProvider {
    /// Google Translate speech REST endpoint (MP3)
    Google,
}

impl std::fmt::Display for TTSProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TTSProvider::Google => write!(f, "google"),
        }
    }
}

impl std::str::FromStr for TTSProvider {
    type Err = TTSError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" | "google-translate" | "gtts" => Ok(TTSProvider::Google),
            _ => Err(TTSError::InvalidConfiguration(format!(
                "Unsupported TTS provider: {s}. Supported providers: google"
            ))),
        }
    }
}

/// Factory function to create TTS providers by name
///
/// # Arguments
/// * `provider` - The name of the TTS provider (e.g. "google")
/// * `config` - Configuration for the TTS provider
///
/// # Returns
/// * `TTSResult<Arc<dyn BaseTTS>>` - A shared TTS provider or error
pub fn create_tts_provider(
    provider: &str,
    config: GoogleTTSConfig,
) -> TTSResult<Arc<dyn BaseTTS>> {
    match provider.parse::<TTSProvider>()? {
        TTSProvider::Google => Ok(Arc::new(GoogleTTS::with_config(config)?)),
    }
}

/// Get a list of all supported TTS providers
pub fn get_supported_tts_providers() -> Vec<&'static str> {
    vec!["google"]
}
