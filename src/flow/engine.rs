//! Conversation flow engine
//!
//! The engine walks one user through a script: it asks the current question,
//! validates and records answers, keeps the transcript, and reports when the
//! script is exhausted. It performs no I/O; handing the collected answers to
//! a result service is the caller's job.
//!
//! Phases progress `Idle -> Active(0) -> ... -> Active(n-1) -> Complete`.
//! `reset` returns to `Idle` from anywhere.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::question::{AnswerValue, Question};
use super::script::Script;
use crate::utils::errors::{Result, SwottingError};

/// Where a conversation currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowPhase {
    /// No script started
    Idle,
    /// Waiting for the answer to the question at this index
    Active(usize),
    /// Every question answered
    Complete,
}

impl FlowPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl fmt::Display for FlowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Active(position) => write!(f, "active({position})"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Who produced a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    System,
}

/// One line of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub content: String,
}

impl TranscriptEntry {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            content: content.into(),
        }
    }
}

/// Mutable state of one conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    /// Index of the question being asked; equals the script length once complete
    pub script_position: usize,
    /// Accepted answers keyed by question index
    pub answers: BTreeMap<usize, AnswerValue>,
    pub transcript: Vec<TranscriptEntry>,
    pub is_complete: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self {
            script_position: 0,
            answers: BTreeMap::new(),
            transcript: Vec::new(),
            is_complete: false,
            started_at: None,
            updated_at: None,
        }
    }
}

impl ConversationState {
    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

/// Result of an accepted answer
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// More questions remain; this one is next
    Continue { next: Question },
    /// The script is exhausted; all answers by question index
    Complete { answers: BTreeMap<usize, AnswerValue> },
}

/// Collected answers handed to the completion handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionPayload {
    /// Id of the script that produced the answers
    pub flow: String,
    /// Answers keyed by question field
    pub answers: BTreeMap<String, AnswerValue>,
    pub completed_at: DateTime<Utc>,
}

impl CompletionPayload {
    pub fn text(&self, field: &str) -> Option<&str> {
        self.answers.get(field).and_then(|a| a.as_text())
    }

    pub fn number(&self, field: &str) -> Option<i64> {
        self.answers.get(field).and_then(|a| a.as_number())
    }
}

/// Scripted conversation state machine
#[derive(Debug, Clone, Default)]
pub struct ConversationEngine {
    script: Option<Arc<Script>>,
    state: ConversationState,
}

impl ConversationEngine {
    /// Create an idle engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a conversation on `script`, discarding any previous one.
    ///
    /// Appends the first prompt to the transcript and returns the first question.
    pub fn start(&mut self, script: Arc<Script>) -> Result<&Question> {
        self.reset();
        script.validate()?;

        let now = Utc::now();
        self.state.started_at = Some(now);
        self.state.updated_at = Some(now);
        self.script = Some(script);

        let first = self.question_at(0)?;
        let prompt = first.prompt.clone();
        self.state.transcript.push(TranscriptEntry::system(prompt));

        self.question_at(0)
    }

    /// The question awaiting an answer, if any
    pub fn current_question(&self) -> Option<&Question> {
        if self.state.is_complete {
            return None;
        }
        self.script
            .as_ref()
            .and_then(|s| s.question(self.state.script_position))
    }

    /// Validate and record an answer to the current question.
    ///
    /// Rejected answers leave the state untouched.
    pub fn submit_answer(&mut self, raw: &str) -> Result<SubmitOutcome> {
        let script = self.script.clone().ok_or(SwottingError::NotStarted)?;
        if self.state.is_complete {
            return Err(SwottingError::AlreadyComplete);
        }

        let position = self.state.script_position;
        let question = script
            .question(position)
            .ok_or(SwottingError::AlreadyComplete)?;
        let answer = question.validate_answer(raw)?;

        self.state.transcript.push(TranscriptEntry::user(raw.trim()));
        self.state.answers.insert(position, answer);
        self.state.script_position = position + 1;
        self.state.touch();

        match script.question(self.state.script_position) {
            Some(next) => {
                self.state
                    .transcript
                    .push(TranscriptEntry::system(next.prompt.clone()));
                Ok(SubmitOutcome::Continue { next: next.clone() })
            }
            None => {
                self.state.is_complete = true;
                Ok(SubmitOutcome::Complete {
                    answers: self.state.answers.clone(),
                })
            }
        }
    }

    /// Submit a numeric answer, e.g. from a range slider
    pub fn submit_number(&mut self, value: i64) -> Result<SubmitOutcome> {
        self.submit_answer(&value.to_string())
    }

    /// Undo completion so the last question can be answered again.
    ///
    /// Removes the last answer and its transcript line, re-asks the last
    /// question and returns it.
    pub fn reopen(&mut self) -> Result<&Question> {
        if !self.state.is_complete {
            return Err(SwottingError::NotReopenable);
        }
        let last = self.state.script_position.saturating_sub(1);

        self.state.answers.remove(&last);
        if let Some(index) = self
            .state
            .transcript
            .iter()
            .rposition(|e| e.speaker == Speaker::User)
        {
            self.state.transcript.remove(index);
        }
        self.state.script_position = last;
        self.state.is_complete = false;
        self.state.touch();

        // The last prompt is usually still the final entry once the answer is gone
        let prompt = self.question_at(last)?.prompt.clone();
        let reprompt = TranscriptEntry::system(prompt);
        if self.state.transcript.last() != Some(&reprompt) {
            self.state.transcript.push(reprompt);
        }
        self.question_at(last)
    }

    /// Discard all state and return to `Idle`
    pub fn reset(&mut self) {
        self.script = None;
        self.state = ConversationState::default();
    }

    pub fn phase(&self) -> FlowPhase {
        match &self.script {
            None => FlowPhase::Idle,
            Some(_) if self.state.is_complete => FlowPhase::Complete,
            Some(_) => FlowPhase::Active(self.state.script_position),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete
    }

    pub fn script(&self) -> Option<&Script> {
        self.script.as_deref()
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.state.transcript
    }

    pub fn answers(&self) -> &BTreeMap<usize, AnswerValue> {
        &self.state.answers
    }

    /// Answers keyed by field name, available once the script is complete
    pub fn completion_payload(&self) -> Option<CompletionPayload> {
        let script = self.script.as_ref()?;
        if !self.state.is_complete {
            return None;
        }

        let answers = self
            .state
            .answers
            .iter()
            .filter_map(|(index, answer)| {
                script
                    .question(*index)
                    .map(|q| (q.field.clone(), answer.clone()))
            })
            .collect();

        Some(CompletionPayload {
            flow: script.id.clone(),
            answers,
            completed_at: self.state.updated_at.unwrap_or_else(Utc::now),
        })
    }

    fn question_at(&self, index: usize) -> Result<&Question> {
        self.script
            .as_ref()
            .and_then(|s| s.question(index))
            .ok_or_else(|| SwottingError::InvalidScript(format!("no question at index {index}")))
    }
}
