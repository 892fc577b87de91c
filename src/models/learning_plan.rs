//! Learning plan model

use serde::{Deserialize, Serialize};

use super::course::CourseLink;

/// One step of a generated learning plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPlanStep {
    pub step_number: u32,
    /// Term used to look up courses for this step
    pub search_term: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub recommended_courses: Vec<CourseLink>,
}

/// Multi-step plan leading from current knowledge to the desired skill
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LearningPlan {
    #[serde(rename = "learningPlanSteps")]
    pub steps: Vec<LearningPlanStep>,
}

impl LearningPlan {
    pub fn new(steps: Vec<LearningPlanStep>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Search terms in step order
    pub fn search_terms(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.search_term.as_str()).collect()
    }
}
