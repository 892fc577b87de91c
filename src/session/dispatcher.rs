//! Completion dispatcher
//!
//! Runs the injected completion handler on a background task. Requests go in
//! through a bounded channel, responses come back through another, each
//! tagged with the conversation generation that produced it so the session
//! can drop answers meant for a conversation that no longer exists.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::handler::CompletionHandler;
use crate::config::DispatcherConfig;
use crate::flow::CompletionPayload;
use crate::models::CompletionOutcome;
use crate::utils::errors::{CompletionError, CompletionResult, Result, SwottingError};
use crate::utils::logging;

/// A finished conversation waiting for its result
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub request_id: Uuid,
    /// Generation of the conversation that completed
    pub generation: u64,
    pub payload: CompletionPayload,
}

impl CompletionRequest {
    pub fn new(generation: u64, payload: CompletionPayload) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            generation,
            payload,
        }
    }
}

/// The handler's answer to a request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub request_id: Uuid,
    pub generation: u64,
    pub result: CompletionResult<CompletionOutcome>,
}

/// Background task that feeds requests to a completion handler
#[derive(Debug)]
pub struct CompletionDispatcher {
    requests: mpsc::Sender<CompletionRequest>,
    responses: mpsc::Receiver<CompletionResponse>,
    worker: Option<JoinHandle<()>>,
}

impl CompletionDispatcher {
    /// Start the dispatcher task. Must be called inside a tokio runtime.
    pub fn spawn(handler: Arc<dyn CompletionHandler>, config: &DispatcherConfig) -> Self {
        let (request_tx, mut request_rx) = mpsc::channel::<CompletionRequest>(config.queue_capacity);
        let (response_tx, response_rx) = mpsc::channel::<CompletionResponse>(config.queue_capacity);
        let timeout = Duration::from_secs(config.timeout_seconds);

        info!(
            handler = handler.name(),
            queue_capacity = config.queue_capacity,
            timeout_seconds = config.timeout_seconds,
            "Starting completion dispatcher"
        );

        let worker = tokio::spawn(async move {
            while let Some(request) = request_rx.recv().await {
                let handler = handler.clone();
                let response_tx = response_tx.clone();

                // One task per request so a slow handler call doesn't hold up newer conversations
                tokio::spawn(async move {
                    let response = run_request(handler.as_ref(), request, timeout).await;
                    if response_tx.send(response).await.is_err() {
                        debug!("Response receiver dropped, discarding completion result");
                    }
                });
            }
            debug!("Completion request channel closed, dispatcher exiting");
        });

        Self {
            requests: request_tx,
            responses: response_rx,
            worker: Some(worker),
        }
    }

    /// Queue a request for the handler. Fails once the dispatcher is stopped.
    pub async fn send(&self, request: CompletionRequest) -> Result<()> {
        if self.worker.is_none() {
            return Err(SwottingError::ChannelClosed);
        }
        debug!(
            request_id = %request.request_id,
            generation = request.generation,
            flow = %request.payload.flow,
            "Queueing completion request"
        );
        self.requests
            .send(request)
            .await
            .map_err(|_| SwottingError::ChannelClosed)
    }

    /// Wait for the next handler response
    pub async fn recv(&mut self) -> Option<CompletionResponse> {
        self.responses.recv().await
    }

    /// Stop the dispatcher task
    pub fn stop(&mut self) {
        if let Some(handle) = self.worker.take() {
            handle.abort();
            info!("Stopped completion dispatcher");
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.as_ref().map_or(false, |h| !h.is_finished())
    }
}

impl Drop for CompletionDispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_request(
    handler: &dyn CompletionHandler,
    request: CompletionRequest,
    timeout: Duration,
) -> CompletionResponse {
    let started = std::time::Instant::now();
    let result = match tokio::time::timeout(timeout, handler.handle(&request.payload)).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                request_id = %request.request_id,
                handler = handler.name(),
                timeout_seconds = timeout.as_secs(),
                "Completion handler timed out"
            );
            Err(CompletionError::Timeout)
        }
    };

    logging::log_completion_call(
        handler.name(),
        &request.payload.flow,
        request.generation,
        started.elapsed().as_millis() as u64,
        result.is_ok(),
    );

    CompletionResponse {
        request_id: request.request_id,
        generation: request.generation,
        result,
    }
}
