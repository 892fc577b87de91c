//! Result models
//!
//! Shapes produced by completion handlers and consumed by whatever renders
//! the result panel.

pub mod course;
pub mod learning_plan;

use serde::{Deserialize, Serialize};

pub use course::{CourseLink, SearchResults};
pub use learning_plan::{LearningPlan, LearningPlanStep};

/// What a completion handler produced for a finished conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompletionOutcome {
    /// Flat list of courses for one query
    Courses(SearchResults),
    /// Structured multi-step plan
    LearningPlan(LearningPlan),
    /// Payload accepted without a displayable result
    Acknowledged,
}

impl CompletionOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Courses(_) => "courses",
            Self::LearningPlan(_) => "learning_plan",
            Self::Acknowledged => "acknowledged",
        }
    }
}
