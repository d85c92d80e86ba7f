//! Integration tests for the quiz flows, driven through stub ports so no
//! external generation service is involved.

use std::collections::VecDeque;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use api_lib::adapters::{InMemorySessionStore, PlainTextExtractor};
use api_lib::config::Config;
use api_lib::web::quiz_task::{self, QuizRequestInput};
use api_lib::web::state::AppState;
use async_trait::async_trait;
use quiz_core::error::QuizError;
use quiz_core::ports::{PortError, PortResult, QuizGenerationService, SessionStore};
use quiz_core::session::SessionPhase;
use tracing::Level;
use uuid::Uuid;

/// A generation stub that replays scripted replies and records every call.
struct ScriptedGenerator {
    replies: Mutex<VecDeque<PortResult<String>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    fn new(replies: Vec<PortResult<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn prompt(&self, index: usize) -> String {
        self.prompts.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl QuizGenerationService for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> PortResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("generation stub ran out of scripted replies")
    }
}

fn test_state(generator: Arc<ScriptedGenerator>) -> AppState {
    AppState {
        store: Arc::new(InMemorySessionStore::new()),
        generator,
        extractor: Arc::new(PlainTextExtractor::new()),
        config: Arc::new(Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            log_level: Level::INFO,
            openai_api_key: None,
            openai_api_base: None,
            generation_model: "stub-model".to_string(),
        }),
    }
}

fn topic_request(count: usize, quiz_type: &str) -> QuizRequestInput {
    QuizRequestInput {
        count: Some(count),
        quiz_type: Some(quiz_type.to_string()),
        difficulty: Some("Medium".to_string()),
        language: Some("English".to_string()),
        source: Some("topic".to_string()),
        topic: Some("Photosynthesis".to_string()),
        ..Default::default()
    }
}

const SKY_RECORD: &str = r#"{
    "question": "Sky color?",
    "options": ["Red", "Blue", "Green", "Yellow"],
    "answer": "Blue",
    "explanation": "Rayleigh scattering favors shorter wavelengths."
}"#;

const MOON_RECORD: &str = r#"{
    "question": "What is the Moon's primary influence on Earth?",
    "options": ["Weather", "Tides", "Seasons", "Day length"],
    "answer": "Tides",
    "explanation": "The Moon's gravity drives the tides."
}"#;

fn reply_of(records: &[&str]) -> String {
    format!("[{}]", records.join(","))
}

#[tokio::test]
async fn full_cycle_generates_answers_and_scores() {
    let generator = ScriptedGenerator::new(vec![Ok(reply_of(&[SKY_RECORD, MOON_RECORD]))]);
    let state = test_state(generator.clone());
    let session_id = state.store.create().await.unwrap().id();

    let outcome = quiz_task::generate_quiz(&state, session_id, topic_request(2, "Multiple-Choice"))
        .await
        .unwrap();
    assert_eq!(outcome.requested, 2);
    assert_eq!(outcome.delivered, 2);
    assert!(outcome.shortfall_notice().is_none());

    // Every item starts unanswered.
    let session = state.store.fetch(session_id).await.unwrap();
    assert_eq!(session.phase(), SessionPhase::Ready);
    assert_eq!(session.answers().len(), 2);
    assert!(session.answers().iter().all(Option::is_none));

    quiz_task::record_answer(&state, session_id, 0, "Blue".to_string())
        .await
        .unwrap();
    quiz_task::record_answer(&state, session_id, 1, "Weather".to_string())
        .await
        .unwrap();

    let report = quiz_task::submit_answers(&state, session_id).await.unwrap();
    assert_eq!(report.score, 1);
    assert_eq!(report.total, 2);
    assert!(report.items[0].is_correct);
    assert!(!report.items[1].is_correct);
    assert_eq!(report.items[1].correct_answer, "Tides");

    let session = state.store.fetch(session_id).await.unwrap();
    assert_eq!(session.phase(), SessionPhase::Scored);
}

#[tokio::test]
async fn repeated_items_are_filtered_with_an_advisory_notice() {
    let generator = ScriptedGenerator::new(vec![
        Ok(reply_of(&[SKY_RECORD])),
        Ok(reply_of(&[SKY_RECORD, MOON_RECORD])),
    ]);
    let state = test_state(generator.clone());
    let session_id = state.store.create().await.unwrap().id();

    quiz_task::generate_quiz(&state, session_id, topic_request(1, "Multiple-Choice"))
        .await
        .unwrap();

    // The second reply repeats an already-seen item; only the new one survives.
    let outcome = quiz_task::generate_quiz(&state, session_id, topic_request(2, "Multiple-Choice"))
        .await
        .unwrap();
    assert_eq!(outcome.requested, 2);
    assert_eq!(outcome.delivered, 1);
    let notice = outcome.shortfall_notice().expect("shortfall notice expected");
    assert!(notice.contains("Only 1 unique questions were generated"));

    let session = state.store.fetch(session_id).await.unwrap();
    assert_eq!(session.items().len(), 1);
    assert_eq!(
        session.items()[0].question(),
        "What is the Moon's primary influence on Earth?"
    );
    assert_eq!(session.history().len(), 2);
}

#[tokio::test]
async fn an_all_duplicates_reply_still_reaches_ready_with_zero_items() {
    let generator = ScriptedGenerator::new(vec![
        Ok(reply_of(&[SKY_RECORD])),
        Ok(reply_of(&[SKY_RECORD])),
    ]);
    let state = test_state(generator.clone());
    let session_id = state.store.create().await.unwrap().id();

    quiz_task::generate_quiz(&state, session_id, topic_request(1, "Multiple-Choice"))
        .await
        .unwrap();
    let outcome = quiz_task::generate_quiz(&state, session_id, topic_request(1, "Multiple-Choice"))
        .await
        .unwrap();
    assert_eq!(outcome.delivered, 0);
    assert!(outcome.shortfall_notice().is_some());

    // Submission over an empty quiz is allowed and scores 0 out of 0.
    let report = quiz_task::submit_answers(&state, session_id).await.unwrap();
    assert_eq!(report.score, 0);
    assert_eq!(report.total, 0);
}

#[tokio::test]
async fn a_malformed_reply_leaves_the_session_unchanged() {
    let generator = ScriptedGenerator::new(vec![
        Ok(reply_of(&[SKY_RECORD])),
        Ok("I could not produce a quiz this time.".to_string()),
    ]);
    let state = test_state(generator.clone());
    let session_id = state.store.create().await.unwrap().id();

    quiz_task::generate_quiz(&state, session_id, topic_request(1, "Multiple-Choice"))
        .await
        .unwrap();
    let before = state.store.fetch(session_id).await.unwrap();

    let err = quiz_task::generate_quiz(&state, session_id, topic_request(1, "Multiple-Choice"))
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::MalformedGenerationOutput(_)));

    let after = state.store.fetch(session_id).await.unwrap();
    assert_eq!(after.items(), before.items());
    assert_eq!(after.history(), before.history());
    assert_eq!(after.phase(), before.phase());
}

#[tokio::test]
async fn an_unavailable_service_is_reported_without_mutation() {
    let generator = ScriptedGenerator::new(vec![Err(PortError::Unavailable(
        "connection refused".to_string(),
    ))]);
    let state = test_state(generator.clone());
    let session_id = state.store.create().await.unwrap().id();

    let err = quiz_task::generate_quiz(&state, session_id, topic_request(1, "Multiple-Choice"))
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::GenerationUnavailable(_)));

    let session = state.store.fetch(session_id).await.unwrap();
    assert_eq!(session.phase(), SessionPhase::Empty);
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn unset_difficulty_never_reaches_the_generation_service() {
    let generator = ScriptedGenerator::new(Vec::new());
    let state = test_state(generator.clone());
    let session_id = state.store.create().await.unwrap().id();

    let mut request = topic_request(2, "Multiple-Choice");
    request.difficulty = None;

    let err = quiz_task::generate_quiz(&state, session_id, request)
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::InvalidParameterSelection(_)));
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn document_source_requires_an_upload_first() {
    let generator = ScriptedGenerator::new(vec![Ok(reply_of(&[SKY_RECORD]))]);
    let state = test_state(generator.clone());
    let session_id = state.store.create().await.unwrap().id();

    let mut request = topic_request(1, "Multiple-Choice");
    request.source = Some("document".to_string());
    request.topic = None;

    let err = quiz_task::generate_quiz(&state, session_id, request.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::InvalidParameterSelection(_)));
    assert_eq!(generator.call_count(), 0);

    quiz_task::attach_document(
        &state,
        session_id,
        "notes.txt",
        "The sky appears blue because of Rayleigh scattering.".as_bytes(),
    )
    .await
    .unwrap();

    quiz_task::generate_quiz(&state, session_id, request)
        .await
        .unwrap();
    assert_eq!(generator.call_count(), 1);
    assert!(generator
        .prompt(0)
        .contains("The sky appears blue because of Rayleigh scattering."));
}

#[tokio::test]
async fn history_questions_are_embedded_in_later_prompts() {
    let generator = ScriptedGenerator::new(vec![
        Ok(reply_of(&[SKY_RECORD])),
        Ok(reply_of(&[MOON_RECORD])),
    ]);
    let state = test_state(generator.clone());
    let session_id = state.store.create().await.unwrap().id();

    quiz_task::generate_quiz(&state, session_id, topic_request(1, "Multiple-Choice"))
        .await
        .unwrap();
    quiz_task::generate_quiz(&state, session_id, topic_request(1, "Multiple-Choice"))
        .await
        .unwrap();

    assert!(!generator.prompt(0).contains("already been asked"));
    let second_prompt = generator.prompt(1);
    assert!(second_prompt.contains("already been asked"));
    assert!(second_prompt.contains("Sky color?"));
}

#[tokio::test]
async fn an_unknown_session_is_not_found() {
    let generator = ScriptedGenerator::new(Vec::new());
    let state = test_state(generator.clone());

    let err = quiz_task::generate_quiz(&state, Uuid::new_v4(), topic_request(1, "True-False"))
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::SessionNotFound(_)));
    assert_eq!(generator.call_count(), 0);
}
