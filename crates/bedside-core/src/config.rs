use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{BedsideError, Result};

/// Top-level configuration for the Bedside application.
///
/// Loaded from `~/.bedside/config.toml` by default. Each section corresponds
/// to a bounded context or cross-cutting concern.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BedsideConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl BedsideConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BedsideConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| BedsideError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Path to the records dataset JSON file. When unset, the bundled
    /// dataset ships with the directory crate is used.
    pub records_file: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            records_file: None,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to bind on 127.0.0.1.
    pub port: u16,
    /// Origins allowed by CORS. When empty, localhost origins for the
    /// configured port are allowed.
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// The effective CORS origin list: configured origins, or the localhost
    /// pair for the bound port when none are configured.
    pub fn origins(&self) -> Vec<String> {
        if self.allowed_origins.is_empty() {
            vec![
                format!("http://127.0.0.1:{}", self.port),
                format!("http://localhost:{}", self.port),
            ]
        } else {
            self.allowed_origins.clone()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            allowed_origins: vec![],
        }
    }
}

/// Completion-provider transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Vendor wire format: "gemini" or "openai".
    pub vendor: String,
    /// Base endpoint URL (the adapter appends the vendor-specific path).
    pub endpoint: String,
    /// Model name sent with every request.
    pub model: String,
    /// Environment variable holding the API key. The key itself is never
    /// written to the config file.
    pub api_key_env: String,
    /// Round-trip timeout in seconds for the completion call.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            vendor: "gemini".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash-preview-05-20".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Chat behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// System-level instruction fixing the assistant's tone and role.
    pub persona: String,
    /// Maximum message length in characters.
    pub max_message_length: usize,
    /// Minutes of inactivity before a session expires.
    pub session_timeout_minutes: u32,
    /// Whether to retrieve directory records and augment the prompt.
    pub retrieval: bool,
    /// Canned reply for bare greetings, answered without a provider call.
    pub greeting_reply: String,
    /// Maximum tokens the model may generate per reply.
    pub max_tokens: u32,
    /// Sampling temperature for the model.
    pub temperature: f32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            persona: "You are Baymax, a friendly and helpful healthcare companion. \
                      Answer questions based *only* on the context provided. If the \
                      context doesn't contain the answer, say you cannot find the \
                      information. Always be concise and provide links when available."
                .to_string(),
            max_message_length: 2000,
            session_timeout_minutes: 30,
            retrieval: true,
            greeting_reply: "Hello. How can I help you find a doctor?".to_string(),
            max_tokens: 2048,
            temperature: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = BedsideConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert!(config.general.records_file.is_none());
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.provider.vendor, "gemini");
        assert_eq!(config.provider.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.provider.timeout_secs, 30);
        assert_eq!(config.chat.max_message_length, 2000);
        assert_eq!(config.chat.session_timeout_minutes, 30);
        assert!(config.chat.retrieval);
        assert_eq!(config.chat.max_tokens, 2048);
        assert!((config.chat.temperature - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"
records_file = "/data/doctors.json"

[server]
port = 5050
allowed_origins = ["http://localhost:8080"]

[provider]
vendor = "openai"
endpoint = "https://api.sambanova.ai/v1"
model = "Meta-Llama-3.1-8B-Instruct"
api_key_env = "SAMBANOVA_API_KEY"
timeout_secs = 15

[chat]
persona = "You are TARS, a logical and efficient AI assistant."
max_message_length = 500
session_timeout_minutes = 10
retrieval = false
greeting_reply = "Hello."
max_tokens = 1024
temperature = 0.7
"#;
        let file = create_temp_config(content);
        let config = BedsideConfig::load(file.path()).unwrap();

        assert_eq!(config.general.log_level, "debug");
        assert_eq!(
            config.general.records_file.as_deref(),
            Some("/data/doctors.json")
        );
        assert_eq!(config.server.port, 5050);
        assert_eq!(config.server.allowed_origins, vec!["http://localhost:8080"]);
        assert_eq!(config.provider.vendor, "openai");
        assert_eq!(config.provider.endpoint, "https://api.sambanova.ai/v1");
        assert_eq!(config.provider.model, "Meta-Llama-3.1-8B-Instruct");
        assert_eq!(config.provider.api_key_env, "SAMBANOVA_API_KEY");
        assert_eq!(config.provider.timeout_secs, 15);
        assert!(config.chat.persona.contains("TARS"));
        assert_eq!(config.chat.max_message_length, 500);
        assert_eq!(config.chat.session_timeout_minutes, 10);
        assert!(!config.chat.retrieval);
        assert_eq!(config.chat.max_tokens, 1024);
        assert!((config.chat.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[general]
log_level = "warn"
"#;
        let file = create_temp_config(content);
        let config = BedsideConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "warn");
        // Remaining fields use defaults
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.provider.vendor, "gemini");
        assert!(config.chat.retrieval);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = BedsideConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.provider.vendor, "gemini");
    }

    #[test]
    fn test_load_invalid_toml() {
        let content = "this is {{ not valid TOML";
        let file = create_temp_config(content);
        let result = BedsideConfig::load(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = BedsideConfig::default();
        config.save(&path).unwrap();

        let reloaded = BedsideConfig::load(&path).unwrap();
        assert_eq!(reloaded.server.port, config.server.port);
        assert_eq!(reloaded.provider.model, config.provider.model);
        assert_eq!(reloaded.chat.persona, config.chat.persona);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("dir").join("config.toml");

        let config = BedsideConfig::default();
        config.save(&path).unwrap();

        assert!(path.exists());
        let reloaded = BedsideConfig::load(&path).unwrap();
        assert_eq!(reloaded.general.log_level, "info");
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = BedsideConfig::load(file.path()).unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.chat.max_tokens, 2048);
    }

    #[test]
    fn test_serialization_round_trip() {
        let config = BedsideConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let deserialized: BedsideConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized.general.log_level, config.general.log_level);
        assert_eq!(deserialized.provider.endpoint, config.provider.endpoint);
        assert_eq!(
            deserialized.chat.greeting_reply,
            config.chat.greeting_reply
        );
    }

    #[test]
    fn test_origins_default_to_localhost_pair() {
        let server = ServerConfig::default();
        let origins = server.origins();
        assert_eq!(
            origins,
            vec!["http://127.0.0.1:5000", "http://localhost:5000"]
        );
    }

    #[test]
    fn test_origins_configured_list_wins() {
        let server = ServerConfig {
            port: 5000,
            allowed_origins: vec!["https://chat.example.com".to_string()],
        };
        assert_eq!(server.origins(), vec!["https://chat.example.com"]);
    }

    #[test]
    fn test_sub_config_defaults() {
        let general = GeneralConfig::default();
        assert_eq!(general.log_level, "info");

        let server = ServerConfig::default();
        assert_eq!(server.port, 5000);
        assert!(server.allowed_origins.is_empty());

        let provider = ProviderConfig::default();
        assert_eq!(provider.vendor, "gemini");
        assert!(provider.endpoint.contains("generativelanguage"));

        let chat = ChatConfig::default();
        assert!(chat.persona.contains("Baymax"));
        assert_eq!(chat.greeting_reply, "Hello. How can I help you find a doctor?");
    }
}
