use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Complete YAML configuration structure
///
/// This structure represents the full configuration that can be loaded from a YAML file.
/// All fields are optional to allow partial configuration. Environment variables can
/// provide any values not specified here.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 8080
///
/// tls:
///   cert_path: "/etc/s2s/cert.pem"
///   key_path: "/etc/s2s/key.pem"
///
/// providers:
///   hf_token: "hf_xxxxx"
///   stt_model: "openai/whisper-large-v3"
///   stt_base_url: "https://router.huggingface.co/hf-inference"
///   llm_model: "HuggingFaceH4/zephyr-7b-beta:featherless-ai"
///   llm_base_url: "https://router.huggingface.co/v1"
///   tts_language: "en"
///   tts_base_url: "https://translate.google.com/translate_tts"
///   allow_private_urls: false
///
/// limits:
///   session_idle_timeout_secs: 300
///   max_audio_frame_bytes: 1048576
///
/// security:
///   cors_allowed_origins: "*"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct YamlConfig {
    /// Server settings (host, port)
    #[serde(default)]
    pub server: Option<ServerYaml>,

    /// TLS certificate configuration
    #[serde(default)]
    pub tls: Option<TlsYaml>,

    /// Provider credentials, models and endpoint overrides
    #[serde(default)]
    pub providers: Option<ProvidersYaml>,

    /// Connection and buffering limits
    #[serde(default)]
    pub limits: Option<LimitsYaml>,

    /// Security settings (CORS)
    #[serde(default)]
    pub security: Option<SecurityYaml>,
}

/// Server configuration section
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ServerYaml {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

/// TLS configuration section
///
/// Both paths must be set for TLS to be enabled.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TlsYaml {
    #[serde(default)]
    pub cert_path: Option<PathBuf>,
    #[serde(default)]
    pub key_path: Option<PathBuf>,
}

/// Provider configuration section
///
/// Holds the Hugging Face token shared by STT and LLM, the model
/// identifiers, and optional endpoint overrides for self-hosted or
/// mock backends.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProvidersYaml {
    #[serde(default)]
    pub hf_token: Option<String>,
    #[serde(default)]
    pub stt_model: Option<String>,
    #[serde(default)]
    pub stt_base_url: Option<String>,
    #[serde(default)]
    pub llm_model: Option<String>,
    #[serde(default)]
    pub llm_base_url: Option<String>,
    #[serde(default)]
    pub tts_language: Option<String>,
    #[serde(default)]
    pub tts_base_url: Option<String>,
    #[serde(default)]
    pub allow_private_urls: Option<bool>,
}

/// Limits configuration section
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LimitsYaml {
    #[serde(default)]
    pub session_idle_timeout_secs: Option<u64>,
    #[serde(default)]
    pub max_audio_frame_bytes: Option<usize>,
}

/// Security configuration section
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecurityYaml {
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,
}

impl YamlConfig {
    /// Load YAML configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the YAML configuration file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or contains invalid YAML.
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file {}: {e}", path.display()))?;

        Ok(config)
    }
}
