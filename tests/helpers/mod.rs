//! Test helpers module
//!
//! This module provides utilities and helpers for testing the conversation
//! engine and chat sessions: small scripts, mock completion handlers, and
//! session setup.

pub mod mock_handlers;
pub mod test_data;

pub use mock_handlers::*;
pub use test_data::*;

use std::sync::Arc;

use swotting::config::DispatcherConfig;
use swotting::session::{ChatSession, CompletionDispatcher, CompletionHandler, RetryPolicy};

/// Dispatcher settings used by session tests
pub fn test_dispatcher_config() -> DispatcherConfig {
    DispatcherConfig {
        queue_capacity: 4,
        timeout_seconds: 5,
    }
}

/// Create a session backed by `handler`
pub fn create_test_session(handler: Arc<dyn CompletionHandler>, policy: RetryPolicy) -> ChatSession {
    let dispatcher = CompletionDispatcher::spawn(handler, &test_dispatcher_config());
    ChatSession::new(dispatcher, policy)
}
