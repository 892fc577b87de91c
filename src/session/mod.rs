//! Session management module
//!
//! This module ties a conversation engine to the completion handler that
//! turns finished conversations into results.

pub mod chat;
pub mod dispatcher;
pub mod handler;

// Re-export commonly used session components
pub use chat::{ChatSession, RetryPolicy, SessionEvent};
pub use dispatcher::{CompletionDispatcher, CompletionRequest, CompletionResponse};
pub use handler::{CompletionHandler, PrintHandler};
