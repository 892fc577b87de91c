//! Swotting conversation engine
//!
//! Scripted question-and-answer flows that collect a learner's goals and
//! background before handing the answers to a course recommendation backend.
//! This library provides the flow engine, the script registry, chat sessions
//! with an asynchronous completion dispatcher, and the surrounding
//! configuration and logging.

pub mod config;
pub mod flow;
pub mod models;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{SwottingError, Result};

// Re-export main components for easy access
pub use flow::{ConversationEngine, ScriptRegistry};
pub use session::{ChatSession, CompletionDispatcher};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
