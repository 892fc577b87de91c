//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

use crate::session::RetryPolicy;

/// Main application configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub conversation: ConversationConfig,
    pub dispatcher: DispatcherConfig,
    pub scripts: ScriptsConfig,
    pub logging: LoggingConfig,
}

/// Conversation behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Flow used when the first message names no known flow
    pub default_flow: String,
    /// What happens to a conversation whose completion request fails
    pub retry_policy: RetryPolicy,
}

/// Completion dispatcher configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatcherConfig {
    pub queue_capacity: usize,
    pub timeout_seconds: u64,
}

/// Extra script files
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Directory of `*.toml` scripts loaded on top of the built-in ones
    pub directory: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for a daily rolling log file; stderr only when unset
    pub file_path: Option<String>,
    /// Emit JSON lines on stderr instead of the human-readable format
    pub json: bool,
}

impl Settings {
    /// Load settings from the named file (extension optional) and `SWOTTING__*` variables
    pub fn load(file: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix("SWOTTING")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::SwottingError> {
        super::validation::validate_settings(self)
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            default_flow: "explorer".to_string(),
            retry_policy: RetryPolicy::Rollback,
        }
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 16,
            timeout_seconds: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
            json: false,
        }
    }
}
