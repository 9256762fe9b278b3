//! Configuration loading, validation, and management for TavernKit.
//!
//! Loads configuration from `~/.tavernkit/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.tavernkit/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the chat backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// System prompt used when a card carries none of its own
    #[serde(default = "default_system_prompt")]
    pub default_system_prompt: String,

    /// Bot display name used when a card carries no name
    #[serde(default = "default_bot_name")]
    pub fallback_bot_name: String,

    /// Byte cap for a single outgoing response message
    #[serde(default = "default_response_max_bytes")]
    pub response_max_bytes: usize,

    /// Empirical bytes-per-token ratio for context estimates
    #[serde(default = "default_bytes_per_token")]
    pub bytes_per_token: f32,

    /// How many stored messages a conversation retains
    #[serde(default = "default_memory_depth")]
    pub memory_depth: usize,
}

fn default_model() -> String {
    "anthropic/claude-sonnet-4".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    4096
}
fn default_system_prompt() -> String {
    concat!(
        "Write {{char}}'s next reply in a fictional chat between {{char}} ",
        "and {{user}}. Write 1 reply only, stay in character, and avoid ",
        "repetition.",
    )
    .into()
}
fn default_bot_name() -> String {
    "Assistant".into()
}
fn default_response_max_bytes() -> usize {
    2000
}
fn default_bytes_per_token() -> f32 {
    3.6
}
fn default_memory_depth() -> usize {
    100
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("default_system_prompt", &self.default_system_prompt)
            .field("fallback_bot_name", &self.fallback_bot_name)
            .field("response_max_bytes", &self.response_max_bytes)
            .field("bytes_per_token", &self.bytes_per_token)
            .field("memory_depth", &self.memory_depth)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.tavernkit/config.toml),
    /// or from `TAVERNKIT_CONFIG` when set.
    ///
    /// Also checks environment variables for API keys:
    /// - `TAVERNKIT_API_KEY` (highest priority)
    /// - `OPENROUTER_API_KEY`
    /// - `OPENAI_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = match std::env::var("TAVERNKIT_CONFIG") {
            Ok(path) => PathBuf::from(path),
            Err(_) => Self::config_dir().join("config.toml"),
        };
        let mut config = Self::load_from(&config_path)?;

        // Environment variable overrides (highest priority)
        if config.api_key.is_none() {
            config.api_key = std::env::var("TAVERNKIT_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok())
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("TAVERNKIT_MODEL") {
            config.default_model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".tavernkit")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.bytes_per_token <= 0.0 {
            return Err(ConfigError::ValidationError(
                "bytes_per_token must be > 0".into(),
            ));
        }

        if self.response_max_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "response_max_bytes must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            default_system_prompt: default_system_prompt(),
            fallback_bot_name: default_bot_name(),
            response_max_bytes: default_response_max_bytes(),
            bytes_per_token: default_bytes_per_token(),
            memory_depth: default_memory_depth(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
