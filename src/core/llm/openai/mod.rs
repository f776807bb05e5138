//! OpenAI-compatible chat completion provider.
//!
//! This module integrates any endpoint speaking the OpenAI chat
//! completions protocol. The default configuration targets the Hugging
//! Face router, which serves hosted open models behind the same wire
//! format.
//!
//! # Configuration
//!
//! ## Environment Variables
//!
//! ```bash
//! export HF_TOKEN="hf_..."
//! ```
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use s2s_gateway::core::llm::{BaseLLM, OpenAILLM, OpenAILLMConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OpenAILLMConfig::default()
//!         .with_api_key(std::env::var("HF_TOKEN")?);
//!
//!     let llm = OpenAILLM::with_config(config)?;
//!     let reply = llm.generate_reply("What is the capital of France?").await?;
//!     println!("Reply: {reply}");
//!     Ok(())
//! }
//! ```
//!
//! # References
//!
//! - [OpenAI Chat Completions API](https://platform.openai.com/docs/api-reference/chat)
//! - [Hugging Face Router](https://huggingface.co/docs/inference-providers)

mod client;
pub mod config;
pub mod messages;

pub use client::OpenAILLM;
pub use config::{
    DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT, OpenAILLMConfig,
};
pub use messages::{
    ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatErrorDetail, ChatErrorResponse,
    ChatMessage,
};
