//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the conversation engine and completion dispatcher.

use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::utils::errors::{Result, SwottingError};
use crate::utils::helpers::truncate_text;

/// Longest answer text written to logs
const MAX_LOGGED_ANSWER: usize = 64;

/// Initialize logging based on configuration.
///
/// Keep the returned guard alive for as long as file logging should flush.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| SwottingError::Config(format!("Invalid log filter '{}': {}", config.level, e)))?;

    let (file_layer, guard) = match &config.file_path {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "swotting.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let (plain_layer, json_layer) = if config.json {
        (None, Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
    } else {
        (Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain_layer)
        .with(json_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| SwottingError::Config(format!("Failed to initialize logging: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log the start of a conversation
pub fn log_flow_started(flow: &str, generation: u64) {
    info!(flow = flow, generation = generation, "Conversation started");
}

/// Log an accepted answer
pub fn log_answer_accepted(flow: &str, position: usize, field: &str, answer: &str) {
    debug!(
        flow = flow,
        position = position,
        field = field,
        answer = %truncate_text(answer, MAX_LOGGED_ANSWER),
        "Answer accepted"
    );
}

/// Log a rejected answer
pub fn log_answer_rejected(flow: &str, position: usize, error: &SwottingError) {
    if error.is_answer_rejection() {
        debug!(flow = flow, position = position, error = %error, "Answer rejected");
    } else {
        warn!(flow = flow, position = position, error = %error, severity = %error.severity(), "Submission refused");
    }
}

/// Log a finished script
pub fn log_flow_completed(flow: &str, generation: u64, answers: usize) {
    info!(
        flow = flow,
        generation = generation,
        answers = answers,
        "Conversation complete"
    );
}

/// Log a completion response that arrived for an outdated conversation
pub fn log_stale_response(response_generation: u64, current_generation: u64) {
    warn!(
        response_generation = response_generation,
        current_generation = current_generation,
        "Discarding stale completion response"
    );
}

/// Log a completion handler call
pub fn log_completion_call(handler: &str, flow: &str, generation: u64, duration_ms: u64, success: bool) {
    if success {
        debug!(
            handler = handler,
            flow = flow,
            generation = generation,
            duration_ms = duration_ms,
            "Completion handler succeeded"
        );
    } else {
        error!(
            handler = handler,
            flow = flow,
            generation = generation,
            duration_ms = duration_ms,
            "Completion handler failed"
        );
    }
}
