//! Configuration loading, validation, and management for toolloop.
//!
//! Loads configuration from `~/.toolloop/config.toml` (or an explicit path)
//! with environment variable overrides. Validates all settings at load.
//! Components receive the values they need at construction; nothing reads
//! this at runtime as ambient state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use toolloop_core::policy::{DuplicatePolicy, UnknownToolPolicy};

/// The root configuration structure.
///
/// Maps directly to `~/.toolloop/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the model endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per model response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Plain reasoning loop settings
    #[serde(default)]
    pub react: ReactConfig,

    /// Memory-augmented reasoning loop settings
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Planner settings
    #[serde(default)]
    pub planner: PlannerConfig,

    /// Tool registry settings
    #[serde(default)]
    pub tools: ToolsConfig,
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.2
}
fn default_max_tokens() -> u32 {
    300
}
fn default_max_steps() -> u32 {
    5
}

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
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("react", &self.react)
            .field("memory", &self.memory)
            .field("planner", &self.planner)
            .field("tools", &self.tools)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactConfig {
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    /// Overrides `default_max_tokens` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(default)]
    pub unknown_tool: UnknownToolPolicy,

    /// Render only the most recent N steps into the prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_window: Option<usize>,
}

impl Default for ReactConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            max_tokens: None,
            unknown_tool: UnknownToolPolicy::FailFast,
            history_window: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    #[serde(default = "default_memory_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_memory_unknown_tool")]
    pub unknown_tool: UnknownToolPolicy,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_window: Option<usize>,

    /// Facts seeded into long-term memory before each run
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facts: Vec<String>,
}

fn default_memory_max_tokens() -> u32 {
    400
}
fn default_memory_unknown_tool() -> UnknownToolPolicy {
    UnknownToolPolicy::SkipUnknown
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            max_tokens: default_memory_max_tokens(),
            unknown_tool: default_memory_unknown_tool(),
            history_window: None,
            facts: vec![],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub on_duplicate: DuplicatePolicy,
}

impl AppConfig {
    /// Load configuration from the default path (~/.toolloop/config.toml).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_overrides(&Self::config_dir().join("config.toml"))
    }

    /// Load from `path`, then apply environment variable overrides:
    /// - `TOOLLOOP_API_KEY` (highest priority), then `OPENAI_API_KEY`
    /// - `TOOLLOOP_MODEL`
    /// - `TOOLLOOP_API_URL`
    pub fn load_with_overrides(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("TOOLLOOP_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("TOOLLOOP_MODEL") {
            config.default_model = model;
        }

        if let Ok(url) = std::env::var("TOOLLOOP_API_URL") {
            config.api_url = url;
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
        dirs_home().join(".toolloop")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.react.max_steps == 0 || self.memory.max_steps == 0 {
            return Err(ConfigError::ValidationError(
                "max_steps must be at least 1".into(),
            ));
        }

        let token_limits = [
            Some(self.default_max_tokens),
            self.react.max_tokens,
            Some(self.memory.max_tokens),
            Some(self.planner.max_tokens),
        ];
        if token_limits.iter().flatten().any(|&t| t == 0) {
            return Err(ConfigError::ValidationError(
                "max_tokens must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Max tokens for the plain reasoning loop.
    pub fn react_max_tokens(&self) -> u32 {
        self.react.max_tokens.unwrap_or(self.default_max_tokens)
    }

    /// Render the configuration as TOML, without the API key.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        let redacted = Self {
            api_key: None,
            ..self.clone()
        };
        toml::to_string_pretty(&redacted)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            react: ReactConfig::default(),
            memory: MemoryConfig::default(),
            planner: PlannerConfig::default(),
            tools: ToolsConfig::default(),
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

impl From<ConfigError> for toolloop_core::Error {
    fn from(err: ConfigError) -> Self {
        toolloop_core::Error::Config {
            message: err.to_string(),
        }
    }
}
