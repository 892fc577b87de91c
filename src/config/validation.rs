//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{Result, SwottingError};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_conversation_config(&settings.conversation)?;
    validate_dispatcher_config(&settings.dispatcher)?;
    validate_scripts_config(&settings.scripts)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate conversation configuration
fn validate_conversation_config(config: &super::ConversationConfig) -> Result<()> {
    if config.default_flow.trim().is_empty() {
        return Err(SwottingError::Config(
            "Default flow is required".to_string()
        ));
    }

    Ok(())
}

/// Validate dispatcher configuration
fn validate_dispatcher_config(config: &super::DispatcherConfig) -> Result<()> {
    if config.queue_capacity == 0 {
        return Err(SwottingError::Config(
            "Dispatcher queue capacity must be greater than 0".to_string()
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(SwottingError::Config(
            "Dispatcher timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate script directory configuration
fn validate_scripts_config(config: &super::ScriptsConfig) -> Result<()> {
    if let Some(directory) = &config.directory {
        if directory.trim().is_empty() {
            return Err(SwottingError::Config(
                "Script directory must not be blank when set".to_string()
            ));
        }
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(SwottingError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(SwottingError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_rejects_zero_capacity() {
        let mut settings = Settings::default();
        settings.dispatcher.queue_capacity = 0;
        assert_matches!(validate_settings(&settings), Err(SwottingError::Config(_)));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut settings = Settings::default();
        settings.dispatcher.timeout_seconds = 0;
        assert_matches!(validate_settings(&settings), Err(SwottingError::Config(_)));
    }

    #[test]
    fn test_rejects_unknown_level() {
        let mut settings = Settings::default();
        settings.logging.level = "verbose".to_string();
        assert_matches!(validate_settings(&settings), Err(SwottingError::Config(msg)) => {
            assert!(msg.contains("verbose"));
        });
    }

    #[test]
    fn test_rejects_blank_default_flow() {
        let mut settings = Settings::default();
        settings.conversation.default_flow = "  ".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
