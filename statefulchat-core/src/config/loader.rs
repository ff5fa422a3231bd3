//! Configuration loading and management

use super::schema::Config;
use super::validate::validate_config;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Configuration loader
pub struct ConfigLoader {
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// Create a new config loader with the default config directory
    pub fn new() -> Self {
        let config_dir = dirs::home_dir()
            .map(|h| h.join(".statefulchat"))
            .unwrap_or_else(|| PathBuf::from(".statefulchat"));

        Self { config_dir }
    }

    /// Create a new config loader with a custom config directory
    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            config_dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Load configuration from file and environment.
    ///
    /// Missing sections and fields take their defaults. Environment variables
    /// win over the file: the well-known aliases first, then
    /// `STATEFULCHAT__<SECTION>__<KEY>`.
    pub fn load(&self) -> crate::Result<Config> {
        let config_path = self.config_path();
        let config: Config = if config_path.exists() {
            serde_json::from_str(&std::fs::read_to_string(&config_path)?)?
        } else {
            Config::default()
        };

        let overrides = env_overrides(std::env::vars());
        let config = if overrides.is_empty() {
            config
        } else {
            let mut value = serde_json::to_value(config)?;
            for (section, key, field) in overrides {
                if let Some(section) = value.get_mut(&section).and_then(Value::as_object_mut) {
                    section.insert(key, field);
                }
            }
            serde_json::from_value(value)?
        };

        validate_config(&config)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, config: &Config) -> crate::Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        let content = serde_json::to_string_pretty(config)?;
        std::fs::write(self.config_path(), content)?;
        Ok(())
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

const ENV_PREFIX: &str = "STATEFULCHAT__";

const ENV_ALIASES: &[(&str, &str, &str)] = &[
    ("OPENAI_API_KEY", "provider", "api_key"),
    ("OPENAI_BASE_URL", "provider", "api_base"),
    ("STATEFULCHAT_MODEL", "provider", "model"),
];

/// `(section, key, value)` triples in the order they should be applied
fn env_overrides(vars: impl Iterator<Item = (String, String)>) -> Vec<(String, String, Value)> {
    let vars: Vec<(String, String)> = vars.collect();

    let aliases = ENV_ALIASES.iter().filter_map(|(name, section, key)| {
        vars.iter()
            .find(|(var, _)| var == name)
            .map(|(_, raw)| (section.to_string(), key.to_string(), Value::String(raw.clone())))
    });

    let paths = vars.iter().filter_map(|(var, raw)| {
        let (section, key) = var.strip_prefix(ENV_PREFIX)?.split_once("__")?;
        if section.is_empty() || key.is_empty() || key.contains("__") {
            return None;
        }
        // Numbers and booleans arrive as JSON; anything else is a plain string.
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()));
        Some((section.to_ascii_lowercase(), key.to_ascii_lowercase(), value))
    });

    aliases.chain(paths).collect()
}
