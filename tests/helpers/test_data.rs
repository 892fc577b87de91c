//! Test data helpers for creating scripts and walking conversations

use std::sync::Arc;

use swotting::flow::{Choice, ConversationEngine, Question, Script, SubmitOutcome};

/// Two free-text questions: topic, then level
pub fn topic_level_script() -> Arc<Script> {
    Arc::new(Script::new(
        "topic_level",
        "Topic and level",
        vec![
            Question::free_text("topic", "What topic do you want to learn?"),
            Question::free_text("level", "What's your current level?"),
        ],
    ))
}

/// A single closed choice between A and B
pub fn ab_choice_script() -> Arc<Script> {
    Arc::new(Script::new(
        "ab_choice",
        "A or B",
        vec![Question::single_choice(
            "letter",
            "Pick a letter",
            vec![Choice::plain("A"), Choice::plain("B")],
        )],
    ))
}

/// One question of every kind
pub fn mixed_script() -> Arc<Script> {
    Arc::new(Script::new(
        "mixed",
        "Mixed",
        vec![
            Question::numeric_range("age", "What's your age?", 10, 100, 25),
            Question::choice_with_custom(
                "occupation",
                "What's your current occupation?",
                vec![Choice::plain("School"), Choice::plain("Work")],
            ),
            Question::single_choice(
                "personality",
                "How would you describe your personality?",
                vec![Choice::plain("Extraverted"), Choice::plain("Introverted")],
            ),
            Question::free_text("hobbies", "What are your hobbies?"),
        ],
    ))
}

/// A free-text script with `len` questions
pub fn free_text_script(len: usize) -> Arc<Script> {
    let questions = (0..len)
        .map(|i| Question::free_text(format!("q{i}"), format!("Question {i}?")))
        .collect();
    Arc::new(Script::new("generated", "Generated", questions))
}

/// Answers accepted by `mixed_script`
pub fn mixed_answers() -> Vec<&'static str> {
    vec!["31", "Freelance illustrator", "Introverted", "Drawing"]
}

/// Submit every answer in order, returning the last outcome
pub fn answer_all(engine: &mut ConversationEngine, answers: &[&str]) -> SubmitOutcome {
    let mut last = None;
    for answer in answers {
        last = Some(engine.submit_answer(answer).expect("answer should be accepted"));
    }
    last.expect("at least one answer is required")
}
