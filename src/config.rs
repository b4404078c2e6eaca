//! Configuration loading and management for textquiz.
//!
//! Settings come from an optional `textquiz.toml`; credentials always come
//! from the environment and are checked once at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const HUGGINGFACE_KEY_ENV: &str = "HUGGINGFACE_API_KEY";
pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";

const CONFIG_FILE_NAME: &str = "textquiz.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("missing API key(s): set {0} in the environment or a .env file")]
    MissingApiKey(String),
}

/// Summarization inference service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Base URL; the model id is appended as a path segment
    pub endpoint: String,
    /// Hosted summarization model id
    pub model: String,
    pub timeout_secs: u64,
}

/// Chat-completion service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// OpenAI-compatible base URL (without `/chat/completions`)
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
    pub keyword_max_tokens: u32,
    pub keyword_temperature: f32,
    pub quiz_max_tokens: u32,
    pub quiz_temperature: f32,
}

/// API keys (loaded from environment)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub huggingface_key: Option<String>,
    #[serde(default)]
    pub openai_key: Option<String>,
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub summarizer: SummarizerConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Both service keys, validated as present.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub huggingface_key: String,
    pub openai_key: String,
}

impl Config {
    /// Load configuration from `explicit`, or from the default locations.
    ///
    /// An explicit path must exist. Without one, a missing config file is not
    /// an error and the built-in defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_config_file(),
        };

        let mut config = match path {
            Some(path) => Self::load_from(&path)?,
            None => Config::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration from a specific path, without environment overrides
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!(path = %path.display(), "loading config file");
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Override API keys from environment variables. Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_blank(HUGGINGFACE_KEY_ENV) {
            self.api.huggingface_key = Some(key.trim().to_string());
        }
        if let Some(key) = non_blank(OPENAI_KEY_ENV) {
            self.api.openai_key = Some(key.trim().to_string());
        }
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let local_config = PathBuf::from(CONFIG_FILE_NAME);
        if local_config.exists() {
            return Some(local_config);
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home
                .join(".config")
                .join("textquiz")
                .join(CONFIG_FILE_NAME);
            if home_config.exists() {
                return Some(home_config);
            }
        }

        None
    }

    /// Both API keys, or an error naming every missing variable
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let present = |key: &Option<String>| {
            key.as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
        };

        match (present(&self.api.huggingface_key), present(&self.api.openai_key)) {
            (Some(huggingface_key), Some(openai_key)) => Ok(Credentials {
                huggingface_key,
                openai_key,
            }),
            (hf, openai) => {
                let mut missing = Vec::new();
                if hf.is_none() {
                    missing.push(HUGGINGFACE_KEY_ENV);
                }
                if openai.is_none() {
                    missing.push(OPENAI_KEY_ENV);
                }
                Err(ConfigError::MissingApiKey(missing.join(", ")))
            }
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api-inference.huggingface.co/models".to_string(),
            model: "sshleifer/distilbart-cnn-12-6".to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            timeout_secs: 120,
            keyword_max_tokens: 300,
            keyword_temperature: 0.2,
            quiz_max_tokens: 1200,
            quiz_temperature: 0.7,
        }
    }
}
