//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Persona text seeding every new conversation
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful, professional assistant. \
Answer in a formal yet warm tone. You may use emoji sparingly for warmth or emphasis \
(for example: 😊, 💡, ✅, ⚠️, 📌), no more than one or two per reply, and avoid excessive informality.";

/// Root configuration for statefulchat
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Chat-completion provider
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Conversation storage
    #[serde(default)]
    pub storage: StorageConfig,
    /// Session behaviour
    #[serde(default)]
    pub session: SessionConfig,
    /// Terminal presentation
    #[serde(default)]
    pub display: DisplayConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Provider configuration (OpenAI-compatible endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub extra_headers: HashMap<String, String>,
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_api_base(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            extra_headers: HashMap::new(),
        }
    }
}

/// Where records and audit logs are kept
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_dir")]
    pub dir: String,
}

fn default_storage_dir() -> String {
    "~/.statefulchat/conversations".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
        }
    }
}

/// Terminal presentation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// `rich` (styled, spinner) or `plain`
    #[serde(default = "default_display_style")]
    pub style: String,
}

fn default_display_style() -> String {
    "rich".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            style: default_display_style(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Directory for diagnostic log files
    #[serde(default = "default_log_dir")]
    pub dir: String,
    /// Mirror diagnostics to stderr
    #[serde(default)]
    pub stderr: bool,
    /// Module-specific overrides
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_dir() -> String {
    "~/.statefulchat/diagnostics".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            dir: default_log_dir(),
            stderr: false,
            overrides: HashMap::new(),
        }
    }
}
