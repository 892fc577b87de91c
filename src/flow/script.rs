//! Conversation scripts
//!
//! A script is the ordered list of questions that makes up one flow, plus
//! the identifiers used to select it. This module also defines the built-in
//! flows offered by the wizard.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::question::{Choice, Question};
use crate::utils::errors::{Result, SwottingError};

/// An ordered, immutable sequence of questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Flow identifier, used as the kind tag of the completion payload
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// What the flow is for
    #[serde(default)]
    pub description: String,
    /// Alternative commands that select this flow
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Questions asked in order
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Script {
    pub fn new(id: impl Into<String>, name: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            aliases: Vec::new(),
            questions,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Whether `command` names this script, by id or alias, ignoring case
    pub fn answers_to(&self, command: &str) -> bool {
        let command = command.trim();
        self.id.eq_ignore_ascii_case(command)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(command))
    }

    /// Validate the script before a conversation runs on it
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(SwottingError::InvalidScript("script id is empty".to_string()));
        }

        if self.questions.is_empty() {
            return Err(SwottingError::InvalidScript(format!(
                "script '{}' has no questions",
                self.id
            )));
        }

        let mut fields = HashSet::new();
        for question in &self.questions {
            question.check_definition()?;
            if !fields.insert(question.field.as_str()) {
                return Err(SwottingError::InvalidScript(format!(
                    "script '{}' uses field '{}' twice",
                    self.id, question.field
                )));
            }
        }

        Ok(())
    }
}

fn hours_per_week_choices() -> Vec<Choice> {
    vec![
        Choice::plain("0-2 hours"),
        Choice::plain("2-5 hours"),
        Choice::plain("5-10 hours"),
        Choice::plain("10+ hours"),
    ]
}

/// Direct course search for a single topic
pub fn quick_search_script() -> Script {
    Script::new(
        "quick_search",
        "Quick Search",
        vec![Question::free_text(
            "search_term",
            "Enter a topic to find relevant courses:",
        )],
    )
    .with_description("Searches courses for one topic and shows the top results")
    .with_aliases(&["q", "quick-search", "search"])
}

/// Goal and current knowledge, for users with a clear topic in mind
pub fn explorer_script() -> Script {
    Script::new(
        "explorer",
        "Explorer",
        vec![
            Question::free_text(
                "goal",
                "What specific topic or skill would you like to learn more about?",
            ),
            Question::free_text(
                "current_knowledge",
                "What's your current level of knowledge in this area?",
            ),
        ],
    )
    .with_description("Builds a curriculum from the user's goal and current knowledge")
}

/// Step-by-step curriculum including the weekly time budget
pub fn curriculum_script() -> Script {
    Script::new(
        "curriculum",
        "Build a curriculum",
        vec![
            Question::free_text("topic", "What do you want to learn?"),
            Question::free_text(
                "current_knowledge",
                "What is your current knowledge in this area?",
            ),
            Question::single_choice(
                "hours_per_week",
                "How many hours do you want to spend learning per week?",
                hours_per_week_choices(),
            ),
        ],
    )
    .with_description(
        "Builds a step-by-step curriculum from current knowledge to the goal and recommends courses for each skill",
    )
    .with_aliases(&["build-curriculum"])
}

/// Questionnaire for users who don't know what to learn yet
pub fn pathways_script() -> Script {
    Script::new(
        "pathways",
        "Pathways",
        vec![
            Question::free_text("age", "What's your age?"),
            Question::choice_with_custom(
                "occupation",
                "What's your current occupation?",
                vec![
                    Choice::plain("School"),
                    Choice::plain("College"),
                    Choice::plain("Work"),
                    Choice::plain("Nothing"),
                ],
            ),
            Question::choice_with_custom(
                "goal",
                "What's your goal?",
                vec![
                    Choice::plain("Switch job"),
                    Choice::plain("Learn something new"),
                    Choice::plain("Not sure what to study"),
                ],
            ),
            Question::free_text(
                "hobbies",
                "What are your hobbies? (e.g., sports, movies, YouTube interests)",
            ),
            Question::single_choice(
                "personality",
                "How would you describe your personality?",
                vec![
                    Choice::plain("Extraverted"),
                    Choice::plain("Introverted"),
                    Choice::plain("Somewhere in between"),
                ],
            ),
            Question::free_text("group_projects", "What do you enjoy doing in group projects?"),
            Question::free_text("strengths", "What do others say you're really good at?"),
            Question::free_text(
                "favourite_subjects",
                "Which subjects/topics did you enjoy in school or personal time?",
            ),
            Question::single_choice(
                "hours_per_week",
                "How many hours per week can you dedicate to learning?",
                hours_per_week_choices(),
            ),
        ],
    )
    .with_description(
        "Explores interests, goals and skills through detailed questions and suggests promising fields",
    )
    .with_aliases(&["no-idea"])
}

/// All scripts shipped with the crate
pub fn builtin_scripts() -> Vec<Script> {
    vec![
        quick_search_script(),
        explorer_script(),
        curriculum_script(),
        pathways_script(),
    ]
}
