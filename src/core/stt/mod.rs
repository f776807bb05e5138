mod base;
pub mod huggingface;

use std::sync::Arc;

// Re-export public types and traits
pub use base::{BaseSTT, STTError, STTResult, Transcription};

// Re-export Hugging Face implementation
pub use huggingface::{HF_INFERENCE_URL, HuggingFaceSTT, HuggingFaceSTTConfig};

/// Supported STT providers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum STTProvider {
    /// Hugging Face Inference REST API (Whisper)
    HuggingFace,
}

impl std::fmt::Display for STTProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            STTProvider::HuggingFace => write!(f, "huggingface"),
        }
    }
}

impl std::str::FromStr for STTProvider {
    type Err = STTError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "huggingface" | "hugging-face" | "hf" | "hf-inference" => Ok(STTProvider::HuggingFace),
            _ => Err(STTError::ConfigurationError(format!(
                "Unsupported STT provider: {s}. Supported providers: huggingface"
            ))),
        }
    }
}

/// Factory function to create STT providers by name
///
/// # Arguments
/// * `provider` - The name of the STT provider (e.g. "huggingface")
/// * `config` - Configuration for the STT provider
///
/// # Returns
/// * `STTResult<Arc<dyn BaseSTT>>` - A shared STT provider or error
///
/// # Examples
/// ```rust,no_run
/// use s2s_gateway::core::stt::{HuggingFaceSTTConfig, create_stt_provider};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = HuggingFaceSTTConfig::default();
///     let stt = create_stt_provider("huggingface", config)?;
///     println!("Using STT provider: {}", stt.get_provider_info());
///     Ok(())
/// }
/// ```
pub fn create_stt_provider(
    provider: &str,
    config: HuggingFaceSTTConfig,
) -> STTResult<Arc<dyn BaseSTT>> {
    match provider.parse::<STTProvider>()? {
        STTProvider::HuggingFace => Ok(Arc::new(HuggingFaceSTT::with_config(config)?)),
    }
}

/// Get a list of all supported STT providers
pub fn get_supported_stt_providers() -> Vec<&'static str> {
    vec!["huggingface"]
}
