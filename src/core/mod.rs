pub mod llm;
pub mod stt;
pub mod tts;

// Re-export commonly used types for convenience
pub use llm::{
    BaseLLM, LLMError, LLMProvider, LLMResult, OpenAILLM, OpenAILLMConfig, create_llm_provider,
    get_supported_llm_providers,
};

pub use stt::{
    BaseSTT, HuggingFaceSTT, HuggingFaceSTTConfig, STTError, STTProvider, STTResult, Transcription,
    create_stt_provider, get_supported_stt_providers,
};

pub use tts::{
    BaseTTS, GoogleTTS, GoogleTTSConfig, TTSError, TTSProvider, TTSResult, create_tts_provider,
    get_supported_tts_providers,
};
