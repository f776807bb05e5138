//! Google Translate text-to-speech provider.
//!
//! This module integrates the public translate speech endpoint, which
//! returns MP3 audio for short text snippets without an API key. It is
//! suited to prototypes and low-volume use; production deployments
//! should front a dedicated TTS service behind the same trait.
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use s2s_gateway::core::tts::{BaseTTS, GoogleTTS, GoogleTTSConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tts = GoogleTTS::with_config(GoogleTTSConfig::default())?;
//!     let audio = tts.synthesize("Hello from the gateway.").await?;
//!     std::fs::write("reply.mp3", &audio)?;
//!     Ok(())
//! }
//! ```

mod client;
pub mod config;

pub use client::GoogleTTS;
pub use config::{
    DEFAULT_LANGUAGE, GOOGLE_TRANSLATE_TTS_URL, GoogleTTSConfig, MAX_SEGMENT_CHARS,
};
