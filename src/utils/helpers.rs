//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use crate::flow::{Question, QuestionKind};

/// Truncate text to a maximum number of characters with ellipsis
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Render a question as plain text: the prompt followed by its input hint
pub fn describe_question(question: &Question) -> String {
    let mut lines = vec![question.prompt.clone()];

    for choice in &question.choices {
        if choice.label == choice.value {
            lines.push(format!("  - {}", choice.label));
        } else {
            lines.push(format!("  - {} [{}]", choice.label, choice.value));
        }
    }

    match &question.kind {
        QuestionKind::SingleChoiceWithCustom => {
            lines.push("  (or type your own answer)".to_string());
        }
        QuestionKind::NumericRange { min, max, default } => {
            lines.push(format!("  ({min}-{max}, e.g. {default})"));
        }
        QuestionKind::FreeText | QuestionKind::SingleChoice => {}
    }

    lines.join("\n")
}
