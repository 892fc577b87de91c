//! Completion handlers
//!
//! A completion handler receives the answers of a finished conversation and
//! turns them into a result: a course list, a learning plan, or a plain
//! acknowledgement. Handlers are injected into the dispatcher so the engine
//! never knows where results come from.

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::flow::CompletionPayload;
use crate::models::CompletionOutcome;
use crate::utils::errors::{CompletionError, CompletionResult};

/// Produces a result for a finished conversation
#[async_trait]
pub trait CompletionHandler: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    async fn handle(&self, payload: &CompletionPayload) -> CompletionResult<CompletionOutcome>;
}

/// Writes the payload as pretty JSON to stdout
#[derive(Debug, Default, Clone)]
pub struct PrintHandler;

impl PrintHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CompletionHandler for PrintHandler {
    fn name(&self) -> &str {
        "print"
    }

    async fn handle(&self, payload: &CompletionPayload) -> CompletionResult<CompletionOutcome> {
        let json = serde_json::to_string_pretty(payload)
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("{json}\n").as_bytes())
            .await
            .map_err(|e| CompletionError::RequestFailed(e.to_string()))?;
        stdout
            .flush()
            .await
            .map_err(|e| CompletionError::RequestFailed(e.to_string()))?;

        debug!(flow = %payload.flow, "Printed completion payload");
        Ok(CompletionOutcome::Acknowledged)
    }
}
