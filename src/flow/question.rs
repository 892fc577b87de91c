//! Question definitions
//!
//! A question is one step of a script: the prompt shown to the user, the
//! kind of input it expects and, for choice questions, the declared options.
//! Each kind carries its own validation rule for submitted answers.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::errors::{Result, SwottingError};

/// A selectable option of a choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Text shown to the user
    pub label: String,
    /// Value recorded when the option is picked
    pub value: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Choice whose label and value are the same text
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            label: text.clone(),
            value: text,
        }
    }
}

/// Kind of input a question expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    FreeText,
    SingleChoice,
    SingleChoiceWithCustom,
    NumericRange { min: i64, max: i64, default: i64 },
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FreeText => write!(f, "free_text"),
            Self::SingleChoice => write!(f, "single_choice"),
            Self::SingleChoiceWithCustom => write!(f, "single_choice_with_custom"),
            Self::NumericRange { min, max, .. } => write!(f, "numeric_range({min}..={max})"),
        }
    }
}

/// A recorded answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(i64),
    Text(String),
}

impl AnswerValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}

/// One step of a conversation script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Logical key of the answer in the completion payload
    pub field: String,
    /// Prompt shown to the user
    pub prompt: String,
    /// Expected input
    pub kind: QuestionKind,
    /// Declared options, only meaningful for choice kinds
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
}

impl Question {
    pub fn free_text(field: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            prompt: prompt.into(),
            kind: QuestionKind::FreeText,
            choices: Vec::new(),
        }
    }

    pub fn single_choice(
        field: impl Into<String>,
        prompt: impl Into<String>,
        choices: Vec<Choice>,
    ) -> Self {
        Self {
            field: field.into(),
            prompt: prompt.into(),
            kind: QuestionKind::SingleChoice,
            choices,
        }
    }

    /// Choice question that also accepts any non-empty text in place of an option
    pub fn choice_with_custom(
        field: impl Into<String>,
        prompt: impl Into<String>,
        choices: Vec<Choice>,
    ) -> Self {
        Self {
            field: field.into(),
            prompt: prompt.into(),
            kind: QuestionKind::SingleChoiceWithCustom,
            choices,
        }
    }

    pub fn numeric_range(
        field: impl Into<String>,
        prompt: impl Into<String>,
        min: i64,
        max: i64,
        default: i64,
    ) -> Self {
        Self {
            field: field.into(),
            prompt: prompt.into(),
            kind: QuestionKind::NumericRange { min, max, default },
            choices: Vec::new(),
        }
    }

    pub fn allows_custom_value(&self) -> bool {
        matches!(self.kind, QuestionKind::SingleChoiceWithCustom)
    }

    pub fn is_choice(&self) -> bool {
        matches!(
            self.kind,
            QuestionKind::SingleChoice | QuestionKind::SingleChoiceWithCustom
        )
    }

    /// Declared choice values in order
    pub fn choice_values(&self) -> Vec<String> {
        self.choices.iter().map(|c| c.value.clone()).collect()
    }

    /// Check a raw submission against this question's rule.
    ///
    /// `raw` is trimmed first; a blank submission is rejected for every kind.
    pub fn validate_answer(&self, raw: &str) -> Result<AnswerValue> {
        let input = raw.trim();
        if input.is_empty() {
            return Err(SwottingError::EmptyAnswer);
        }

        match &self.kind {
            QuestionKind::FreeText => Ok(AnswerValue::Text(input.to_string())),
            QuestionKind::SingleChoice => {
                if self.choices.iter().any(|c| c.value == input) {
                    Ok(AnswerValue::Text(input.to_string()))
                } else {
                    Err(SwottingError::InvalidChoice {
                        value: input.to_string(),
                        allowed: self.choice_values(),
                    })
                }
            }
            // Anything non-blank is fine, declared value or not
            QuestionKind::SingleChoiceWithCustom => Ok(AnswerValue::Text(input.to_string())),
            QuestionKind::NumericRange { min, max, .. } => {
                let value = input
                    .parse::<i64>()
                    .map_err(|_| SwottingError::NotANumber(input.to_string()))?;
                if value < *min || value > *max {
                    return Err(SwottingError::OutOfRange {
                        value,
                        min: *min,
                        max: *max,
                    });
                }
                Ok(AnswerValue::Number(value))
            }
        }
    }

    /// Check that the question definition itself is usable
    pub fn check_definition(&self) -> Result<()> {
        if self.field.trim().is_empty() {
            return Err(SwottingError::InvalidScript(format!(
                "question '{}' has an empty field name",
                self.prompt
            )));
        }

        if self.is_choice() {
            if self.choices.is_empty() {
                return Err(SwottingError::InvalidScript(format!(
                    "choice question '{}' declares no choices",
                    self.field
                )));
            }

            let mut seen = HashSet::new();
            for choice in &self.choices {
                if !seen.insert(choice.value.as_str()) {
                    return Err(SwottingError::InvalidScript(format!(
                        "choice question '{}' repeats value '{}'",
                        self.field, choice.value
                    )));
                }
            }
        }

        if let QuestionKind::NumericRange { min, max, default } = self.kind {
            if min > max {
                return Err(SwottingError::InvalidScript(format!(
                    "range question '{}' has min {} above max {}",
                    self.field, min, max
                )));
            }
            if default < min || default > max {
                return Err(SwottingError::InvalidScript(format!(
                    "range question '{}' default {} lies outside {}..={}",
                    self.field, default, min, max
                )));
            }
        }

        Ok(())
    }
}
