//! Configuration module for the S2S Gateway server
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//!
//! # Example
//! ```rust,no_run
//! use s2s_gateway::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable base
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use crate::utils::validate_provider_url;

mod yaml;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SESSION_IDLE_TIMEOUT_SECS: u64 = 300;
const DEFAULT_MAX_AUDIO_FRAME_BYTES: usize = 1024 * 1024;

/// TLS configuration for HTTPS and WSS
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Server configuration
///
/// Contains all configuration needed to run the S2S Gateway server, including:
/// - Server settings (host, port, TLS)
/// - Provider credentials and model selection (Hugging Face STT/LLM, TTS)
/// - Connection limits (idle timeout, maximum audio frame size)
/// - Security settings (CORS)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // TLS configuration (optional)
    pub tls: Option<TlsConfig>,

    // Provider settings
    /// Hugging Face token shared by the STT and LLM providers
    pub hf_token: Option<String>,
    /// STT model identifier (None selects the provider default)
    pub stt_model: Option<String>,
    /// STT endpoint override for self-hosted or mock backends
    pub stt_base_url: Option<String>,
    /// LLM model identifier (None selects the provider default)
    pub llm_model: Option<String>,
    /// LLM endpoint override for self-hosted or mock backends
    pub llm_base_url: Option<String>,
    /// TTS language code (None selects "en")
    pub tts_language: Option<String>,
    /// TTS endpoint override for self-hosted or mock backends
    pub tts_base_url: Option<String>,
    /// Allow provider base URLs that resolve to private or loopback addresses
    /// Default: false
    pub allow_private_urls: bool,

    // Security configuration
    /// CORS allowed origins (comma-separated list or "*" for all)
    /// Default: None (CORS disabled, same-origin only)
    pub cors_allowed_origins: Option<String>,

    // Connection limits
    /// Seconds a call may sit idle before the connection is closed
    /// Default: 300
    pub session_idle_timeout_secs: u64,
    /// Maximum accepted size of a single binary audio frame
    /// Default: 1 MiB
    pub max_audio_frame_bytes: usize,
}

/// Implement Drop to zeroize the provider token when ServerConfig is dropped.
/// This ensures sensitive data is cleared from memory immediately after use.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut token) = self.hf_token {
            token.zeroize();
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

impl ServerConfig {
    /// Load configuration from environment variables only
    ///
    /// Reads each setting from the environment (after main.rs has loaded any
    /// .env file) and falls back to defaults for anything unset. Performs
    /// validation on the final configuration.
    ///
    /// # Errors
    /// Returns an error if an environment variable has an invalid format or
    /// validation of the final configuration fails.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Self::env_config()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Loads environment variables (with defaults), then applies YAML overrides.
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// After loading and merging, performs validation on the final configuration.
    ///
    /// # Arguments
    /// * `path` - Path to the YAML configuration file
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        // Note: .env file is loaded in main.rs at application startup
        let yaml_config = yaml::YamlConfig::from_file(path)?;

        let mut config = Self::env_config()?;
        config.apply_yaml(yaml_config);
        config.validate()?;

        Ok(config)
    }

    /// Build a configuration from environment variables and defaults
    fn env_config() -> Result<Self, Box<dyn std::error::Error>> {
        let host = env_var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match env_var("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|e| format!("Invalid PORT value {value}: {e}"))?,
            None => DEFAULT_PORT,
        };

        let tls = match (env_var("TLS_CERT_PATH"), env_var("TLS_KEY_PATH")) {
            (Some(cert), Some(key)) => Some(TlsConfig {
                cert_path: PathBuf::from(cert),
                key_path: PathBuf::from(key),
            }),
            (None, None) => None,
            _ => {
                return Err("TLS requires both TLS_CERT_PATH and TLS_KEY_PATH to be set".into());
            }
        };

        let session_idle_timeout_secs = match env_var("SESSION_IDLE_TIMEOUT_SECS") {
            Some(value) => value
                .parse::<u64>()
                .map_err(|e| format!("Invalid SESSION_IDLE_TIMEOUT_SECS value {value}: {e}"))?,
            None => DEFAULT_SESSION_IDLE_TIMEOUT_SECS,
        };

        let max_audio_frame_bytes = match env_var("MAX_AUDIO_FRAME_BYTES") {
            Some(value) => value
                .parse::<usize>()
                .map_err(|e| format!("Invalid MAX_AUDIO_FRAME_BYTES value {value}: {e}"))?,
            None => DEFAULT_MAX_AUDIO_FRAME_BYTES,
        };

        let allow_private_urls = env_var("ALLOW_PRIVATE_PROVIDER_URLS")
            .map(|value| matches!(value.to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);

        Ok(ServerConfig {
            host,
            port,
            tls,
            hf_token: env_var("HF_TOKEN"),
            stt_model: env_var("STT_MODEL"),
            stt_base_url: env_var("STT_BASE_URL"),
            llm_model: env_var("LLM_MODEL"),
            llm_base_url: env_var("LLM_BASE_URL"),
            tts_language: env_var("TTS_LANGUAGE"),
            tts_base_url: env_var("TTS_BASE_URL"),
            allow_private_urls,
            cors_allowed_origins: env_var("CORS_ALLOWED_ORIGINS"),
            session_idle_timeout_secs,
            max_audio_frame_bytes,
        })
    }

    /// Apply YAML overrides on top of the environment base
    fn apply_yaml(&mut self, yaml: yaml::YamlConfig) {
        if let Some(server) = yaml.server {
            if let Some(host) = server.host {
                self.host = host;
            }
            if let Some(port) = server.port {
                self.port = port;
            }
        }

        if let Some(tls) = yaml.tls {
            if let (Some(cert_path), Some(key_path)) = (tls.cert_path, tls.key_path) {
                self.tls = Some(TlsConfig {
                    cert_path,
                    key_path,
                });
            }
        }

        if let Some(providers) = yaml.providers {
            if let Some(token) = providers.hf_token {
                self.hf_token = Some(token);
            }
            if let Some(model) = providers.stt_model {
                self.stt_model = Some(model);
            }
            if let Some(url) = providers.stt_base_url {
                self.stt_base_url = Some(url);
            }
            if let Some(model) = providers.llm_model {
                self.llm_model = Some(model);
            }
            if let Some(url) = providers.llm_base_url {
                self.llm_base_url = Some(url);
            }
            if let Some(language) = providers.tts_language {
                self.tts_language = Some(language);
            }
            if let Some(url) = providers.tts_base_url {
                self.tts_base_url = Some(url);
            }
            if let Some(allow) = providers.allow_private_urls {
                self.allow_private_urls = allow;
            }
        }

        if let Some(limits) = yaml.limits {
            if let Some(secs) = limits.session_idle_timeout_secs {
                self.session_idle_timeout_secs = secs;
            }
            if let Some(bytes) = limits.max_audio_frame_bytes {
                self.max_audio_frame_bytes = bytes;
            }
        }

        if let Some(security) = yaml.security {
            if let Some(origins) = security.cors_allowed_origins {
                self.cors_allowed_origins = Some(origins);
            }
        }
    }

    /// Validate the merged configuration
    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        for base_url in [&self.stt_base_url, &self.llm_base_url, &self.tts_base_url]
            .into_iter()
            .flatten()
        {
            validate_provider_url(base_url, self.allow_private_urls)
                .map_err(|e| format!("Invalid provider base URL {base_url}: {e}"))?;
        }

        if self.session_idle_timeout_secs == 0 {
            return Err("SESSION_IDLE_TIMEOUT_SECS must be greater than zero".into());
        }
        if self.max_audio_frame_bytes == 0 {
            return Err("MAX_AUDIO_FRAME_BYTES must be greater than zero".into());
        }

        Ok(())
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if TLS is enabled
    ///
    /// Returns true if TLS configuration is present
    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    /// Get the Hugging Face token required by the STT and LLM providers
    ///
    /// # Returns
    /// * `Result<String, String>` - The token on success, or an error message on failure
    pub fn get_hf_token(&self) -> Result<String, String> {
        self.hf_token.as_ref().cloned().ok_or_else(|| {
            "Hugging Face token not configured in server environment (HF_TOKEN)".to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    /// Helper function to create a test ServerConfig with defaults
    fn test_config() -> ServerConfig {
        ServerConfig {
            host: "localhost".to_string(),
            port: 3001,
            tls: None,
            hf_token: None,
            stt_model: None,
            stt_base_url: None,
            llm_model: None,
            llm_base_url: None,
            tts_language: None,
            tts_base_url: None,
            allow_private_urls: false,
            cors_allowed_origins: None,
            session_idle_timeout_secs: 300,
            max_audio_frame_bytes: 1024 * 1024,
        }
    }

    // Helper to clean up environment variables
    fn cleanup_env_vars() {
        unsafe {
            env::remove_var("HOST");
            env::remove_var("PORT");
            env::remove_var("TLS_CERT_PATH");
            env::remove_var("TLS_KEY_PATH");
            env::remove_var("HF_TOKEN");
            env::remove_var("STT_MODEL");
            env::remove_var("STT_BASE_URL");
            env::remove_var("LLM_MODEL");
            env::remove_var("LLM_BASE_URL");
            env::remove_var("TTS_LANGUAGE");
            env::remove_var("TTS_BASE_URL");
            env::remove_var("ALLOW_PRIVATE_PROVIDER_URLS");
            env::remove_var("CORS_ALLOWED_ORIGINS");
            env::remove_var("SESSION_IDLE_TIMEOUT_SECS");
            env::remove_var("MAX_AUDIO_FRAME_BYTES");
        }
    }

    #[test]
    fn test_address() {
        let config = test_config();
        assert_eq!(config.address(), "localhost:3001");
    }

    #[test]
    fn test_is_tls_enabled() {
        let mut config = test_config();
        assert!(!config.is_tls_enabled());

        config.tls = Some(TlsConfig {
            cert_path: PathBuf::from("/etc/s2s/cert.pem"),
            key_path: PathBuf::from("/etc/s2s/key.pem"),
        });
        assert!(config.is_tls_enabled());
    }

    #[test]
    fn test_get_hf_token_success() {
        let mut config = test_config();
        config.hf_token = Some("hf_test_token".to_string());

        let result = config.get_hf_token();
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "hf_test_token");
    }

    #[test]
    fn test_get_hf_token_missing() {
        let config = test_config();

        let result = config.get_hf_token();
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err(),
            "Hugging Face token not configured in server environment (HF_TOKEN)"
        );
    }

    #[test]
    fn test_validate_rejects_private_url_when_not_allowed() {
        let mut config = test_config();
        config.llm_base_url = Some("https://localhost:8000/v1".to_string());
        config.allow_private_urls = false;

        let result = config.validate();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid provider base URL")
        );
    }

    #[test]
    fn test_validate_accepts_private_url_when_allowed() {
        let mut config = test_config();
        config.llm_base_url = Some("http://127.0.0.1:8000/v1".to_string());
        config.allow_private_urls = true;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_idle_timeout() {
        let mut config = test_config();
        config.session_idle_timeout_secs = 0;

        let result = config.validate();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("SESSION_IDLE_TIMEOUT_SECS")
        );
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        cleanup_env_vars();

        let config = ServerConfig::from_env().unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(config.tls.is_none());
        assert!(config.hf_token.is_none());
        assert!(config.stt_model.is_none());
        assert!(config.llm_base_url.is_none());
        assert!(!config.allow_private_urls);
        assert!(config.cors_allowed_origins.is_none());
        assert_eq!(config.session_idle_timeout_secs, 300);
        assert_eq!(config.max_audio_frame_bytes, 1024 * 1024);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        cleanup_env_vars();

        unsafe {
            env::set_var("HOST", "127.0.0.1");
            env::set_var("PORT", "9090");
            env::set_var("HF_TOKEN", "hf_env_token");
            env::set_var("STT_MODEL", "openai/whisper-small");
            env::set_var("LLM_BASE_URL", "http://127.0.0.1:8000/v1");
            env::set_var("ALLOW_PRIVATE_PROVIDER_URLS", "true");
            env::set_var("CORS_ALLOWED_ORIGINS", "*");
            env::set_var("SESSION_IDLE_TIMEOUT_SECS", "120");
            env::set_var("MAX_AUDIO_FRAME_BYTES", "65536");
        }

        let config = ServerConfig::from_env().unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9090);
        assert_eq!(config.hf_token, Some("hf_env_token".to_string()));
        assert_eq!(config.stt_model, Some("openai/whisper-small".to_string()));
        assert_eq!(
            config.llm_base_url,
            Some("http://127.0.0.1:8000/v1".to_string())
        );
        assert!(config.allow_private_urls);
        assert_eq!(config.cors_allowed_origins, Some("*".to_string()));
        assert_eq!(config.session_idle_timeout_secs, 120);
        assert_eq!(config.max_audio_frame_bytes, 65536);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_port() {
        cleanup_env_vars();

        unsafe {
            env::set_var("PORT", "not-a-number");
        }

        let result = ServerConfig::from_env();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid PORT value")
        );

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_tls_requires_both_paths() {
        cleanup_env_vars();

        unsafe {
            env::set_var("TLS_CERT_PATH", "/etc/s2s/cert.pem");
        }

        let result = ServerConfig::from_env();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("TLS requires both")
        );

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_yaml_overrides_env() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let yaml_content = r#"
server:
  host: "127.0.0.1"
  port: 8081

providers:
  hf_token: "hf_yaml_token"
"#;

        fs::write(&config_path, yaml_content).unwrap();

        unsafe {
            env::set_var("HOST", "0.0.0.0");
            env::set_var("HF_TOKEN", "hf_env_token");
            env::set_var("TTS_LANGUAGE", "fr");
        }

        let config = ServerConfig::from_file(&config_path).unwrap();

        // YAML overrides ENV
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.hf_token, Some("hf_yaml_token".to_string()));
        // YAML value
        assert_eq!(config.port, 8081);
        // ENV value kept where YAML is silent
        assert_eq!(config.tts_language, Some("fr".to_string()));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_missing_file() {
        cleanup_env_vars();

        let config_path = PathBuf::from("/nonexistent/config.yaml");
        let result = ServerConfig::from_file(&config_path);

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );

        cleanup_env_vars();
    }
}
