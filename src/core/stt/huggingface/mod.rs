//! Hugging Face Inference speech-to-text provider.
//!
//! This module integrates the hosted inference API for Whisper-family
//! models over plain HTTP REST. The full utterance is posted as raw
//! bytes; the endpoint returns the final transcript once inference
//! completes. There is no streaming interface.
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
//! use s2s_gateway::core::stt::{BaseSTT, HuggingFaceSTT, HuggingFaceSTTConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HuggingFaceSTTConfig::default()
//!         .with_api_key(std::env::var("HF_TOKEN")?);
//!
//!     let stt = HuggingFaceSTT::with_config(config)?;
//!     let audio = std::fs::read("utterance.wav")?;
//!     let result = stt.transcribe(audio.into()).await?;
//!     println!("Transcript: {}", result.text);
//!     Ok(())
//! }
//! ```
//!
//! # References
//!
//! - [Inference Providers Documentation](https://huggingface.co/docs/inference-providers)
//! - [Whisper Large V3 Model Card](https://huggingface.co/openai/whisper-large-v3)

mod client;
pub mod config;
pub mod messages;

pub use client::HuggingFaceSTT;
pub use config::{DEFAULT_MODEL, HF_INFERENCE_URL, HuggingFaceSTTConfig};
pub use messages::{HfErrorResponse, TranscriptionResponse};
