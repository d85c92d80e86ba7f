//! services/api/src/web/quiz_task.rs
//!
//! The sequential per-request quiz flows: generation, answer recording, and
//! submission scoring. Each flow fetches the session, applies the core
//! logic, and writes the session back wholesale, so a failed step leaves
//! the stored session exactly as it was.

use crate::web::state::AppState;
use quiz_core::{
    build_generation_prompt, filter_previously_seen, parse_generated_items,
    domain::{QuizParameters, QuizReport, SubjectDescriptor},
    error::{QuizError, QuizResult},
    ports::{DocumentTextExtractor, PortError, QuizGenerationService, SessionStore},
    session::QuizSession,
};
use tracing::{info, warn};
use uuid::Uuid;

/// The raw, still-unvalidated selections of one generation request.
///
/// Every field mirrors a user control that may have been left at its unset
/// placeholder; validation turns this into a typed [`QuizParameters`] or an
/// `InvalidParameterSelection` before any external call happens.
#[derive(Debug, Default, Clone)]
pub struct QuizRequestInput {
    /// Defaults to a single question when absent.
    pub count: Option<usize>,
    pub quiz_type: Option<String>,
    pub difficulty: Option<String>,
    pub language: Option<String>,
    /// One of "document", "subject", or "topic".
    pub source: Option<String>,
    pub subject: Option<String>,
    pub subfield: Option<String>,
    pub topic: Option<String>,
}

/// What a successful generation produced, alongside the updated session.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub session: QuizSession,
    pub requested: usize,
    pub delivered: usize,
}

impl GenerationOutcome {
    /// The advisory shortfall notice, when fewer unique questions survived
    /// deduplication than were requested. Non-blocking: generation has
    /// already succeeded when this is shown.
    pub fn shortfall_notice(&self) -> Option<String> {
        (self.delivered < self.requested).then(|| {
            format!(
                "Only {} unique questions were generated, but {} were requested. \
                 You may want to reduce the number of questions or try different parameters.",
                self.delivered, self.requested
            )
        })
    }
}

//=========================================================================================
// Flows
//=========================================================================================

/// Runs one full generation request against a session.
///
/// Order matters: parameters are validated before the generation service is
/// contacted, and the session is only written back after a reply has been
/// parsed and filtered, so a failure at any step leaves the prior quiz and
/// history observable and unchanged.
pub async fn generate_quiz(
    state: &AppState,
    session_id: Uuid,
    input: QuizRequestInput,
) -> QuizResult<GenerationOutcome> {
    let mut session = fetch_session(state, session_id).await?;
    let params = resolve_parameters(&input, &session)?;

    let prompt = build_generation_prompt(&params, session.history());
    info!(
        "Requesting {} {} question(s) for session {}.",
        params.count(),
        params.kind(),
        session_id
    );

    let raw_reply = state
        .generator
        .generate(&prompt)
        .await
        .map_err(|e| QuizError::GenerationUnavailable(e.to_string()))?;

    let items = parse_generated_items(&raw_reply, params.kind())?;
    let unique = filter_previously_seen(items, session.history());

    let requested = params.count();
    let delivered = unique.len();
    if delivered < requested {
        warn!(
            "Session {}: only {} of {} requested questions were unique.",
            session_id, delivered, requested
        );
    }

    session.install_items(unique);
    persist(state, session.clone()).await?;

    Ok(GenerationOutcome {
        session,
        requested,
        delivered,
    })
}

/// Stores the text of an uploaded document on the session.
pub async fn attach_document(
    state: &AppState,
    session_id: Uuid,
    file_name: &str,
    data: &[u8],
) -> QuizResult<usize> {
    let mut session = fetch_session(state, session_id).await?;

    let text = state
        .extractor
        .extract_text(file_name, data)
        .await
        .map_err(|e| QuizError::DocumentUnreadable(e.to_string()))?;

    let length = text.chars().count();
    session.set_document_text(text);
    persist(state, session).await?;
    Ok(length)
}

/// Records the user's selection for one question.
pub async fn record_answer(
    state: &AppState,
    session_id: Uuid,
    index: usize,
    answer: String,
) -> QuizResult<()> {
    let mut session = fetch_session(state, session_id).await?;
    session.record_answer(index, answer)?;
    persist(state, session).await
}

/// Scores the session's current quiz and returns the report.
pub async fn submit_answers(
    state: &AppState,
    session_id: Uuid,
) -> QuizResult<QuizReport> {
    let mut session = fetch_session(state, session_id).await?;
    let report = session.submit()?;
    persist(state, session).await?;
    Ok(report)
}

//=========================================================================================
// Helpers
//=========================================================================================

/// Turns the request's raw selections into validated [`QuizParameters`].
///
/// Runs strictly before the generation port is touched; any unset or
/// unrecognized selection stops the request here.
fn resolve_parameters(
    input: &QuizRequestInput,
    session: &QuizSession,
) -> QuizResult<QuizParameters> {
    let unset = |what: &str| QuizError::InvalidParameterSelection(format!(
        "please select {}",
        what
    ));

    let kind = input
        .quiz_type
        .as_deref()
        .ok_or_else(|| unset("a quiz type"))?
        .parse()
        .map_err(|_| {
            QuizError::InvalidParameterSelection(format!(
                "'{}' is not a valid quiz type",
                input.quiz_type.as_deref().unwrap_or_default()
            ))
        })?;
    let difficulty = input
        .difficulty
        .as_deref()
        .ok_or_else(|| unset("a quiz level"))?
        .parse()
        .map_err(|_| {
            QuizError::InvalidParameterSelection(format!(
                "'{}' is not a valid quiz level",
                input.difficulty.as_deref().unwrap_or_default()
            ))
        })?;
    let language = input
        .language
        .as_deref()
        .ok_or_else(|| unset("a quiz language"))?
        .parse()
        .map_err(|_| {
            QuizError::InvalidParameterSelection(format!(
                "'{}' is not a valid quiz language",
                input.language.as_deref().unwrap_or_default()
            ))
        })?;

    let subject = match input.source.as_deref() {
        Some("document") => {
            let text = session.document_text().ok_or_else(|| {
                QuizError::InvalidParameterSelection(
                    "no document has been uploaded to this session".to_string(),
                )
            })?;
            SubjectDescriptor::DocumentText(text.to_string())
        }
        Some("subject") => SubjectDescriptor::Taxonomy {
            subject: input
                .subject
                .clone()
                .ok_or_else(|| unset("a subject"))?,
            subfield: input
                .subfield
                .clone()
                .ok_or_else(|| unset("a sub-field"))?,
        },
        Some("topic") => {
            SubjectDescriptor::Topic(input.topic.clone().ok_or_else(|| unset("a topic"))?)
        }
        Some(other) => {
            return Err(QuizError::InvalidParameterSelection(format!(
                "'{}' is not a valid quiz source",
                other
            )))
        }
        None => return Err(unset("a quiz source")),
    };

    QuizParameters::new(
        input.count.unwrap_or(1),
        kind,
        difficulty,
        language,
        subject,
    )
}

async fn fetch_session(state: &AppState, session_id: Uuid) -> QuizResult<QuizSession> {
    state.store.fetch(session_id).await.map_err(|e| match e {
        PortError::NotFound(_) => QuizError::SessionNotFound(session_id),
        other => QuizError::Unexpected(other.to_string()),
    })
}

async fn persist(state: &AppState, session: QuizSession) -> QuizResult<()> {
    state
        .store
        .store(session)
        .await
        .map_err(|e| QuizError::Unexpected(e.to_string()))
}
