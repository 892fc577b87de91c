//! Mock completion handlers

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use swotting::flow::CompletionPayload;
use swotting::models::{CompletionOutcome, CourseLink, SearchResults};
use swotting::session::CompletionHandler;
use swotting::utils::errors::{CompletionError, CompletionResult};

/// Returns a fixed outcome and remembers every payload it saw
pub struct RecordingHandler {
    outcome: CompletionOutcome,
    calls: Mutex<Vec<CompletionPayload>>,
}

impl RecordingHandler {
    pub fn new(outcome: CompletionOutcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Handler answering with one course per call
    pub fn with_courses() -> Self {
        Self::new(CompletionOutcome::Courses(SearchResults::new(
            "rust",
            vec![CourseLink::new("The Rust Book", "https://doc.rust-lang.org/book/")],
        )))
    }

    pub fn calls(&self) -> Vec<CompletionPayload> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionHandler for RecordingHandler {
    fn name(&self) -> &str {
        "recording"
    }

    async fn handle(&self, payload: &CompletionPayload) -> CompletionResult<CompletionOutcome> {
        self.calls.lock().unwrap().push(payload.clone());
        Ok(self.outcome.clone())
    }
}

/// Always fails with the given error
pub struct FailingHandler {
    error: CompletionError,
}

impl FailingHandler {
    pub fn new(error: CompletionError) -> Self {
        Self { error }
    }

    pub fn unavailable() -> Self {
        Self::new(CompletionError::ServiceUnavailable)
    }
}

#[async_trait]
impl CompletionHandler for FailingHandler {
    fn name(&self) -> &str {
        "failing"
    }

    async fn handle(&self, _payload: &CompletionPayload) -> CompletionResult<CompletionOutcome> {
        Err(self.error.clone())
    }
}

/// Sleeps before acknowledging
pub struct SlowHandler {
    delay: Duration,
}

impl SlowHandler {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl CompletionHandler for SlowHandler {
    fn name(&self) -> &str {
        "slow"
    }

    async fn handle(&self, _payload: &CompletionPayload) -> CompletionResult<CompletionOutcome> {
        tokio::time::sleep(self.delay).await;
        Ok(CompletionOutcome::Acknowledged)
    }
}
