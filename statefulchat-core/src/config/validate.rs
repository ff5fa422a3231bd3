//! Configuration validation rules.

use super::schema::Config;

/// Validate configuration and return aggregated validation errors.
pub fn validate_config(config: &Config) -> crate::Result<()> {
    let mut errors = Vec::new();

    if config.storage.dir.trim().is_empty() {
        errors.push("storage.dir must not be empty".to_string());
    }
    if config.provider.model.trim().is_empty() {
        errors.push("provider.model must not be empty".to_string());
    }
    if config.provider.api_base.trim().is_empty() {
        errors.push("provider.api_base must not be empty".to_string());
    }
    if config.provider.max_tokens == 0 {
        errors.push("provider.max_tokens must be > 0".to_string());
    }
    if !(0.0..=2.0).contains(&config.provider.temperature) {
        errors.push("provider.temperature must be in [0.0, 2.0]".to_string());
    }
    if config.session.system_prompt.trim().is_empty() {
        errors.push("session.system_prompt must not be empty".to_string());
    }
    if !matches!(config.display.style.as_str(), "rich" | "plain") {
        errors.push(format!(
            "display.style must be 'rich' or 'plain', got '{}'",
            config.display.style
        ));
    }
    if !matches!(config.logging.format.to_lowercase().as_str(), "text" | "json") {
        errors.push(format!(
            "logging.format must be 'text' or 'json', got '{}'",
            config.logging.format
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(crate::Error::Validation(errors.join("; ")))
    }
}
