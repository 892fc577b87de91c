//! Chat session tests
//!
//! These tests run whole conversations through a session and its completion
//! dispatcher with mock handlers.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use helpers::*;
use swotting::config::DispatcherConfig;
use swotting::flow::{AnswerValue, FlowPhase};
use swotting::models::CompletionOutcome;
use swotting::session::{
    ChatSession, CompletionDispatcher, CompletionResponse, RetryPolicy, SessionEvent,
};
use swotting::utils::errors::CompletionError;
use swotting::SwottingError;
use uuid::Uuid;

#[tokio::test]
async fn test_completion_delivered() {
    let handler = Arc::new(RecordingHandler::with_courses());
    let mut session = create_test_session(handler.clone(), RetryPolicy::Rollback);

    let event = session.start(topic_level_script()).unwrap();
    assert_matches!(event, SessionEvent::Prompt(q) => assert_eq!(q.field, "topic"));

    session.submit("Python").await.unwrap();
    let event = session.submit("Beginner").await.unwrap();
    assert_matches!(event, SessionEvent::AwaitingCompletion { generation, payload } => {
        assert_eq!(generation, 1);
        assert_eq!(payload.flow, "topic_level");
        assert_eq!(payload.text("level"), Some("Beginner"));
    });
    assert!(session.is_awaiting_completion());

    let event = session.next_response().await.unwrap();
    assert_matches!(event, SessionEvent::Delivered(CompletionOutcome::Courses(results)) => {
        assert_eq!(results.length, 1);
    });
    assert!(!session.is_awaiting_completion());
    assert_eq!(session.phase(), FlowPhase::Complete);

    let calls = handler.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].text("topic"), Some("Python"));
}

#[tokio::test]
async fn test_failed_completion_rolls_back() {
    let mut session = create_test_session(Arc::new(FailingHandler::unavailable()), RetryPolicy::Rollback);
    session.start(topic_level_script()).unwrap();
    session.submit("Python").await.unwrap();
    session.submit("Beginner").await.unwrap();

    let event = session.next_response().await.unwrap();
    assert_matches!(event, SessionEvent::CompletionFailed { error, retry: Some(question) } => {
        assert_eq!(error, CompletionError::ServiceUnavailable);
        assert_eq!(question.field, "level");
    });
    assert_eq!(session.phase(), FlowPhase::Active(1));
    assert_eq!(session.engine().answers().len(), 1);

    // The user can answer the last question again
    let event = session.submit("Intermediate").await.unwrap();
    assert_matches!(event, SessionEvent::AwaitingCompletion { payload, .. } => {
        assert_eq!(payload.text("level"), Some("Intermediate"));
    });
}

#[tokio::test]
async fn test_failed_completion_stays_terminal() {
    let mut session = create_test_session(Arc::new(FailingHandler::unavailable()), RetryPolicy::Terminal);
    session.start(ab_choice_script()).unwrap();
    session.submit("A").await.unwrap();

    let event = session.next_response().await.unwrap();
    assert_matches!(event, SessionEvent::CompletionFailed { retry: None, .. });
    assert_eq!(session.phase(), FlowPhase::Complete);

    assert_matches!(session.submit("B").await, Err(SwottingError::AlreadyComplete));

    session.reset();
    assert_eq!(session.phase(), FlowPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_after_reset_is_discarded() {
    let handler = Arc::new(SlowHandler::new(Duration::from_millis(200)));
    let mut session = create_test_session(handler, RetryPolicy::Rollback);

    session.start(ab_choice_script()).unwrap();
    let event = session.submit("A").await.unwrap();
    assert_matches!(event, SessionEvent::AwaitingCompletion { generation: 1, .. });

    session.reset();
    session.start(topic_level_script()).unwrap();
    session.submit("Rust").await.unwrap();
    let before = session.engine().state().clone();

    let event = session.next_response().await.unwrap();
    assert_matches!(event, SessionEvent::Discarded { generation: 1 });
    assert_eq!(session.engine().state(), &before);
    assert_eq!(session.phase(), FlowPhase::Active(1));
    assert_eq!(session.generation(), 3);
}

#[tokio::test]
async fn test_response_without_pending_request_is_discarded() {
    let mut session = create_test_session(Arc::new(RecordingHandler::with_courses()), RetryPolicy::Rollback);
    session.start(topic_level_script()).unwrap();

    let response = CompletionResponse {
        request_id: Uuid::new_v4(),
        generation: session.generation(),
        result: Ok(CompletionOutcome::Acknowledged),
    };
    let event = session.apply_response(response).unwrap();
    assert_matches!(event, SessionEvent::Discarded { .. });
    assert_eq!(session.phase(), FlowPhase::Active(0));
}

#[tokio::test(start_paused = true)]
async fn test_slow_handler_times_out() {
    let config = DispatcherConfig {
        queue_capacity: 2,
        timeout_seconds: 1,
    };
    let dispatcher = CompletionDispatcher::spawn(Arc::new(SlowHandler::new(Duration::from_secs(10))), &config);
    let mut session = ChatSession::new(dispatcher, RetryPolicy::Rollback);

    session.start(ab_choice_script()).unwrap();
    session.submit("B").await.unwrap();

    let event = session.next_response().await.unwrap();
    assert_matches!(event, SessionEvent::CompletionFailed { error: CompletionError::Timeout, retry: Some(_) });
    assert_eq!(session.phase(), FlowPhase::Active(0));
}

#[tokio::test]
async fn test_rejected_answer_does_not_dispatch() {
    let handler = Arc::new(RecordingHandler::with_courses());
    let mut session = create_test_session(handler.clone(), RetryPolicy::Rollback);
    session.start(ab_choice_script()).unwrap();

    assert_matches!(session.submit(" ").await, Err(SwottingError::EmptyAnswer));
    assert_matches!(session.submit("Z").await, Err(SwottingError::InvalidChoice { .. }));
    assert!(!session.is_awaiting_completion());
    assert!(handler.calls().is_empty());
}

#[tokio::test]
async fn test_submit_before_start() {
    let mut session = create_test_session(Arc::new(RecordingHandler::with_courses()), RetryPolicy::Rollback);
    assert_matches!(session.submit("hello").await, Err(SwottingError::NotStarted));
    assert_eq!(session.generation(), 0);
}

#[tokio::test]
async fn test_answers_by_field() {
    let mut session = create_test_session(Arc::new(RecordingHandler::with_courses()), RetryPolicy::Rollback);
    session.start(mixed_script()).unwrap();
    session.submit_number(42).await.unwrap();
    session.submit("Work").await.unwrap();

    assert_eq!(
        session.answers_by_field(),
        vec![
            ("age".to_string(), AnswerValue::Number(42)),
            ("occupation".to_string(), AnswerValue::Text("Work".to_string())),
        ]
    );
}

#[tokio::test]
async fn test_retry_policy_can_change() {
    let mut session = create_test_session(Arc::new(FailingHandler::unavailable()), RetryPolicy::Terminal);
    session.set_retry_policy(RetryPolicy::Rollback);
    assert_eq!(session.retry_policy(), RetryPolicy::Rollback);

    session.start(ab_choice_script()).unwrap();
    session.submit("A").await.unwrap();
    assert_matches!(
        session.next_response().await.unwrap(),
        SessionEvent::CompletionFailed { retry: Some(_), .. }
    );
}

#[tokio::test]
async fn test_unsent_completion_rolls_back() {
    let mut dispatcher =
        CompletionDispatcher::spawn(Arc::new(RecordingHandler::with_courses()), &test_dispatcher_config());
    dispatcher.stop();
    let mut session = ChatSession::new(dispatcher, RetryPolicy::Rollback);

    session.start(ab_choice_script()).unwrap();
    assert_matches!(session.submit("A").await, Err(SwottingError::ChannelClosed));

    assert_eq!(session.phase(), FlowPhase::Active(0));
    assert!(!session.is_awaiting_completion());
    assert_eq!(session.current_question().unwrap().field, "letter");
    assert!(session.engine().answers().is_empty());

    // Still answerable, not AlreadyComplete
    assert_matches!(session.submit("B").await, Err(SwottingError::ChannelClosed));
}

#[tokio::test]
async fn test_unsent_completion_stays_terminal() {
    let mut dispatcher =
        CompletionDispatcher::spawn(Arc::new(RecordingHandler::with_courses()), &test_dispatcher_config());
    dispatcher.stop();
    let mut session = ChatSession::new(dispatcher, RetryPolicy::Terminal);

    session.start(ab_choice_script()).unwrap();
    assert_matches!(session.submit("A").await, Err(SwottingError::ChannelClosed));

    assert_eq!(session.phase(), FlowPhase::Complete);
    assert!(!session.is_awaiting_completion());
    assert_matches!(session.submit("B").await, Err(SwottingError::AlreadyComplete));
}
