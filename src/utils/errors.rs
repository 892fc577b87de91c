//! Error handling for Swotting
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the Swotting chat engine
#[derive(Error, Debug)]
pub enum SwottingError {
    #[error("Invalid script: {0}")]
    InvalidScript(String),

    #[error("Answer must not be empty")]
    EmptyAnswer,

    #[error("Invalid choice '{value}'. Available options: {}", .allowed.join(", "))]
    InvalidChoice { value: String, allowed: Vec<String> },

    #[error("Value {value} is out of range ({min}..={max})")]
    OutOfRange { value: i64, min: i64, max: i64 },

    #[error("Not a whole number: {0}")]
    NotANumber(String),

    #[error("Conversation is already complete")]
    AlreadyComplete,

    #[error("Conversation has not been started")]
    NotStarted,

    #[error("Only a completed conversation can be reopened")]
    NotReopenable,

    #[error("Unknown flow: {0}")]
    UnknownFlow(String),

    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    #[error("Completion channel closed")]
    ChannelClosed,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Script parse error: {0}")]
    ScriptParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reported by a completion handler
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("Completion request failed: {0}")]
    RequestFailed(String),

    #[error("Completion request timed out")]
    Timeout,

    #[error("Invalid completion response: {0}")]
    InvalidResponse(String),

    #[error("Completion service unavailable")]
    ServiceUnavailable,
}

/// Result type alias for Swotting operations
pub type Result<T> = std::result::Result<T, SwottingError>;

/// Result type alias for completion handlers
pub type CompletionResult<T> = std::result::Result<T, CompletionError>;

impl SwottingError {
    /// Check if the error is recoverable
    ///
    /// Recoverable errors leave the conversation untouched; the caller can
    /// re-prompt or retry.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SwottingError::InvalidScript(_) => false,
            SwottingError::EmptyAnswer => true,
            SwottingError::InvalidChoice { .. } => true,
            SwottingError::OutOfRange { .. } => true,
            SwottingError::NotANumber(_) => true,
            SwottingError::AlreadyComplete => true,
            SwottingError::NotStarted => true,
            SwottingError::NotReopenable => true,
            SwottingError::UnknownFlow(_) => true,
            SwottingError::Completion(_) => true,
            SwottingError::ChannelClosed => false,
            SwottingError::Config(_) => false,
            SwottingError::ScriptParse(_) => false,
            SwottingError::Io(_) => true,
        }
    }

    /// Whether this error came from validating a user's answer
    pub fn is_answer_rejection(&self) -> bool {
        matches!(
            self,
            SwottingError::EmptyAnswer
                | SwottingError::InvalidChoice { .. }
                | SwottingError::OutOfRange { .. }
                | SwottingError::NotANumber(_)
        )
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SwottingError::InvalidScript(_) => ErrorSeverity::Critical,
            SwottingError::Config(_) => ErrorSeverity::Critical,
            SwottingError::ChannelClosed => ErrorSeverity::Critical,
            SwottingError::AlreadyComplete => ErrorSeverity::Warning,
            SwottingError::NotStarted => ErrorSeverity::Warning,
            SwottingError::NotReopenable => ErrorSeverity::Warning,
            SwottingError::UnknownFlow(_) => ErrorSeverity::Warning,
            err if err.is_answer_rejection() => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
