//! Conversation flow module
//!
//! This module defines questions and scripts and the engine that walks a
//! user through them.

pub mod engine;
pub mod question;
pub mod registry;
pub mod script;

// Re-export commonly used flow components
pub use engine::{
    CompletionPayload, ConversationEngine, ConversationState, FlowPhase, Speaker, SubmitOutcome,
    TranscriptEntry,
};
pub use question::{AnswerValue, Choice, Question, QuestionKind};
pub use registry::ScriptRegistry;
pub use script::Script;
