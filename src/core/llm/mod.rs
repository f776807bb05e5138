mod base;
pub mod openai;

use std::sync::Arc;

// Re-export public types and traits
pub use base::{BaseLLM, LLMError, LLMResult};

// Re-export OpenAI-compatible implementation
pub use openai::{OpenAILLM, OpenAILLMConfig};

/// Supported LLM providers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LLMProvider {
    /// OpenAI-compatible chat completions REST API
    OpenAI,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = LLMError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" | "openai-compatible" => Ok(LLMProvider::OpenAI),
            _ => Err(LLMError::ConfigurationError(format!(
                "Unsupported LLM provider: {s}. Supported providers: openai"
            ))),
        }
    }
}

/// Factory function to create LLM providers by name
///
/// # Arguments
/// * `provider` - The name of the LLM provider (e.g. "openai")
/// * `config` - Configuration for the LLM provider
///
/// # Returns
/// * `LLMResult<Arc<dyn BaseLLM>>` - A shared LLM provider or error
pub fn create_llm_provider(
    provider: &str,
    config: OpenAILLMConfig,
) -> LLMResult<Arc<dyn BaseLLM>> {
    match provider.parse::<LLMProvider>()? {
        LLMProvider::OpenAI => Ok(Arc::new(OpenAILLM::with_config(config)?)),
    }
}

/// Get a list of all supported LLM providers
pub fn get_supported_llm_providers() -> Vec<&'static str> {
    vec!["openai"]
}
