//! Chat session
//!
//! A session owns one conversation engine and the dispatcher channel that
//! delivers its completion results. Every conversation gets a generation
//! number; `start` and `reset` bump it, and a completion response tagged
//! with an older generation is discarded without touching the engine.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::dispatcher::{CompletionDispatcher, CompletionRequest, CompletionResponse};
use crate::flow::{
    AnswerValue, CompletionPayload, ConversationEngine, FlowPhase, Question, Script, SubmitOutcome,
};
use crate::models::CompletionOutcome;
use crate::utils::errors::{CompletionError, Result, SwottingError};
use crate::utils::logging;

/// What to do with a conversation whose completion request failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryPolicy {
    /// Reopen the last question so the user can submit again
    #[default]
    Rollback,
    /// Keep the conversation complete; only a reset starts over
    Terminal,
}

/// Something the caller should show or act on
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Ask this question
    Prompt(Question),
    /// The script is finished and the payload was handed to the dispatcher
    AwaitingCompletion {
        generation: u64,
        payload: CompletionPayload,
    },
    /// The handler produced a result
    Delivered(CompletionOutcome),
    /// The handler failed; `retry` is the reopened question under `RetryPolicy::Rollback`
    CompletionFailed {
        error: CompletionError,
        retry: Option<Question>,
    },
    /// A response for an outdated or unknown conversation was dropped
    Discarded { generation: u64 },
}

/// One user's conversation plus its completion plumbing
#[derive(Debug)]
pub struct ChatSession {
    engine: ConversationEngine,
    dispatcher: CompletionDispatcher,
    retry_policy: RetryPolicy,
    generation: u64,
    pending: Option<u64>,
}

impl ChatSession {
    pub fn new(dispatcher: CompletionDispatcher, retry_policy: RetryPolicy) -> Self {
        Self {
            engine: ConversationEngine::new(),
            dispatcher,
            retry_policy,
            generation: 0,
            pending: None,
        }
    }

    /// Start a fresh conversation on `script`
    pub fn start(&mut self, script: Arc<Script>) -> Result<SessionEvent> {
        self.generation += 1;
        self.pending = None;

        let flow = script.id.clone();
        let question = self.engine.start(script)?.clone();
        logging::log_flow_started(&flow, self.generation);
        Ok(SessionEvent::Prompt(question))
    }

    /// Submit an answer to the current question.
    ///
    /// When this answer finishes the script the completion request is queued
    /// before returning.
    pub async fn submit(&mut self, raw: &str) -> Result<SessionEvent> {
        let flow = self.flow_id();
        let position = self.engine.state().script_position;

        let outcome = match self.engine.submit_answer(raw) {
            Ok(outcome) => outcome,
            Err(e) => {
                logging::log_answer_rejected(&flow, position, &e);
                return Err(e);
            }
        };

        let field = self
            .engine
            .script()
            .and_then(|s| s.question(position))
            .map(|q| q.field.clone())
            .unwrap_or_default();
        logging::log_answer_accepted(&flow, position, &field, raw.trim());

        match outcome {
            SubmitOutcome::Continue { next } => Ok(SessionEvent::Prompt(next)),
            SubmitOutcome::Complete { answers } => self.dispatch_completion(answers.len()).await,
        }
    }

    /// Numeric answer, e.g. from a range slider
    pub async fn submit_number(&mut self, value: i64) -> Result<SessionEvent> {
        self.submit(&value.to_string()).await
    }

    /// Drop the conversation; any in-flight completion becomes stale
    pub fn reset(&mut self) {
        self.engine.reset();
        self.generation += 1;
        if let Some(pending) = self.pending.take() {
            debug!(pending_generation = pending, "Reset with completion in flight");
        }
        info!(generation = self.generation, "Session reset");
    }

    /// Apply a handler response to this session
    pub fn apply_response(&mut self, response: CompletionResponse) -> Result<SessionEvent> {
        if response.generation != self.generation || self.pending != Some(response.generation) {
            logging::log_stale_response(response.generation, self.generation);
            return Ok(SessionEvent::Discarded {
                generation: response.generation,
            });
        }
        self.pending = None;

        match response.result {
            Ok(outcome) => {
                info!(
                    generation = self.generation,
                    outcome = outcome.kind(),
                    "Completion delivered"
                );
                Ok(SessionEvent::Delivered(outcome))
            }
            Err(error) => {
                warn!(generation = self.generation, error = %error, policy = ?self.retry_policy, "Completion failed");
                let retry = match self.retry_policy {
                    RetryPolicy::Rollback => Some(self.engine.reopen()?.clone()),
                    RetryPolicy::Terminal => None,
                };
                Ok(SessionEvent::CompletionFailed { error, retry })
            }
        }
    }

    /// Wait for the next dispatcher response and apply it
    pub async fn next_response(&mut self) -> Result<SessionEvent> {
        let response = self
            .dispatcher
            .recv()
            .await
            .ok_or(SwottingError::ChannelClosed)?;
        self.apply_response(response)
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.engine.current_question()
    }

    pub fn engine(&self) -> &ConversationEngine {
        &self.engine
    }

    pub fn phase(&self) -> FlowPhase {
        self.engine.phase()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a completion request is waiting for its response
    pub fn is_awaiting_completion(&self) -> bool {
        self.pending.is_some()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    pub fn set_retry_policy(&mut self, policy: RetryPolicy) {
        self.retry_policy = policy;
    }

    /// Answers recorded so far, keyed by field
    pub fn answers_by_field(&self) -> Vec<(String, AnswerValue)> {
        let Some(script) = self.engine.script() else {
            return Vec::new();
        };
        self.engine
            .answers()
            .iter()
            .filter_map(|(index, answer)| {
                script
                    .question(*index)
                    .map(|q| (q.field.clone(), answer.clone()))
            })
            .collect()
    }

    async fn dispatch_completion(&mut self, answer_count: usize) -> Result<SessionEvent> {
        let payload = self
            .engine
            .completion_payload()
            .ok_or(SwottingError::NotStarted)?;
        logging::log_flow_completed(&payload.flow, self.generation, answer_count);

        let request = CompletionRequest::new(self.generation, payload.clone());
        if let Err(e) = self.dispatcher.send(request).await {
            warn!(generation = self.generation, error = %e, policy = ?self.retry_policy, "Completion request not sent");
            if self.retry_policy == RetryPolicy::Rollback {
                self.engine.reopen()?;
            }
            return Err(e);
        }
        self.pending = Some(self.generation);

        Ok(SessionEvent::AwaitingCompletion {
            generation: self.generation,
            payload,
        })
    }

    fn flow_id(&self) -> String {
        self.engine
            .script()
            .map(|s| s.id.clone())
            .unwrap_or_default()
    }
}
