//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::quiz_task::{self, GenerationOutcome, QuizRequestInput};
use crate::web::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use quiz_core::{
    domain::{QuizItem, QuizReport},
    error::QuizError,
    ports::SessionStore,
    session::QuizSession,
    taxonomy,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        create_session_handler,
        get_session_handler,
        upload_document_handler,
        list_subjects_handler,
        generate_quiz_handler,
        record_answer_handler,
        submit_answers_handler,
    ),
    components(
        schemas(
            SessionResponse,
            UploadDocumentResponse,
            SubjectEntry,
            GenerateQuizRequest,
            GenerateQuizResponse,
            QuizItemView,
            AnswerRequest,
            SubmissionResponse,
            ScoredItemView,
        )
    ),
    tags(
        (name = "Quiz API", description = "API endpoints for the LLM-backed quiz generator.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// Summary of one quiz session.
#[derive(Serialize, ToSchema)]
pub struct SessionResponse {
    session_id: Uuid,
    /// One of "empty", "ready", or "scored".
    phase: String,
    question_count: usize,
    history_count: usize,
    has_document: bool,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

impl SessionResponse {
    fn from_session(session: &QuizSession) -> Self {
        Self {
            session_id: session.id(),
            phase: session.phase().label().to_string(),
            question_count: session.items().len(),
            history_count: session.history().len(),
            has_document: session.document_text().is_some(),
            created_at: session.created_at(),
            last_activity_at: session.last_activity_at(),
        }
    }
}

/// The response payload sent after a document upload.
#[derive(Serialize, ToSchema)]
pub struct UploadDocumentResponse {
    session_id: Uuid,
    extracted_characters: usize,
}

/// One subject of the fixed catalog with its selectable sub-fields.
#[derive(Serialize, ToSchema)]
pub struct SubjectEntry {
    subject: String,
    subfields: Vec<String>,
}

/// The parameter selections of a generation request. Fields left out of the
/// payload count as unset selections.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateQuizRequest {
    /// Number of questions to generate; defaults to 1.
    pub count: Option<usize>,
    /// "Multiple-Choice" or "True-False".
    pub quiz_type: Option<String>,
    /// "Easy", "Medium", or "Hard".
    pub difficulty: Option<String>,
    /// "English", "Urdu", or "French".
    pub language: Option<String>,
    /// Where the quiz material comes from: "document", "subject", or "topic".
    pub source: Option<String>,
    pub subject: Option<String>,
    pub subfield: Option<String>,
    pub topic: Option<String>,
}

impl From<GenerateQuizRequest> for QuizRequestInput {
    fn from(request: GenerateQuizRequest) -> Self {
        QuizRequestInput {
            count: request.count,
            quiz_type: request.quiz_type,
            difficulty: request.difficulty,
            language: request.language,
            source: request.source,
            subject: request.subject,
            subfield: request.subfield,
            topic: request.topic,
        }
    }
}

/// The presentation view of one question: its text and the choices offered
/// to the user. Correct answers and explanations are withheld until
/// submission.
#[derive(Serialize, ToSchema)]
pub struct QuizItemView {
    index: usize,
    question: String,
    kind: String,
    choices: Vec<String>,
}

impl QuizItemView {
    fn from_item(index: usize, item: &QuizItem) -> Self {
        let choices = match item.options() {
            Some(options) => options.to_vec(),
            None => vec!["True".to_string(), "False".to_string()],
        };
        Self {
            index,
            question: item.question().to_string(),
            kind: item.kind().label().to_string(),
            choices,
        }
    }
}

/// The response payload of a successful generation.
#[derive(Serialize, ToSchema)]
pub struct GenerateQuizResponse {
    session_id: Uuid,
    items: Vec<QuizItemView>,
    requested: usize,
    delivered: usize,
    /// Advisory notice when fewer unique questions than requested survived.
    notice: Option<String>,
}

impl GenerateQuizResponse {
    fn from_outcome(outcome: &GenerationOutcome) -> Self {
        Self {
            session_id: outcome.session.id(),
            items: outcome
                .session
                .items()
                .iter()
                .enumerate()
                .map(|(index, item)| QuizItemView::from_item(index, item))
                .collect(),
            requested: outcome.requested,
            delivered: outcome.delivered,
            notice: outcome.shortfall_notice(),
        }
    }
}

/// The user's selection for one question.
#[derive(Deserialize, ToSchema)]
pub struct AnswerRequest {
    pub answer: String,
}

/// The scored rendering of one question after submission.
#[derive(Serialize, ToSchema)]
pub struct ScoredItemView {
    question: String,
    your_answer: Option<String>,
    correct_answer: String,
    correct: bool,
    explanation: String,
}

/// The full scoring report for a submitted quiz.
#[derive(Serialize, ToSchema)]
pub struct SubmissionResponse {
    session_id: Uuid,
    score: usize,
    total: usize,
    message: String,
    items: Vec<ScoredItemView>,
}

impl SubmissionResponse {
    fn from_report(session_id: Uuid, report: QuizReport) -> Self {
        Self {
            session_id,
            score: report.score,
            total: report.total,
            message: format!("Your score is {}/{}!", report.score, report.total),
            items: report
                .items
                .into_iter()
                .map(|item| ScoredItemView {
                    question: item.question,
                    your_answer: item.user_answer,
                    correct_answer: item.correct_answer,
                    correct: item.is_correct,
                    explanation: item.explanation,
                })
                .collect(),
        }
    }
}

/// Maps a domain failure to the HTTP response the user sees.
fn quiz_error_response(err: QuizError) -> (StatusCode, String) {
    let status = match err {
        QuizError::InvalidParameterSelection(_) | QuizError::InvalidAnswerSubmission(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        QuizError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        QuizError::DocumentUnreadable(_) => StatusCode::BAD_REQUEST,
        QuizError::GenerationUnavailable(_) | QuizError::MalformedGenerationOutput(_) => {
            StatusCode::BAD_GATEWAY
        }
        QuizError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Create a new, empty quiz session.
#[utoipa::path(
    post,
    path = "/sessions",
    responses(
        (status = 201, description = "Session created successfully", body = SessionResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_session_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match app_state.store.create().await {
        Ok(session) => Ok((
            StatusCode::CREATED,
            Json(SessionResponse::from_session(&session)),
        )),
        Err(e) => {
            error!("Failed to create session: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create session".to_string(),
            ))
        }
    }
}

/// Look up the summary of an existing session.
#[utoipa::path(
    get,
    path = "/sessions/{session_id}",
    responses(
        (status = 200, description = "Session summary", body = SessionResponse),
        (status = 404, description = "Unknown session")
    ),
    params(
        ("session_id" = Uuid, Path, description = "The quiz session id.")
    )
)]
pub async fn get_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = app_state
        .store
        .fetch(session_id)
        .await
        .map_err(|_| (StatusCode::NOT_FOUND, format!("Unknown session {}", session_id)))?;
    Ok(Json(SessionResponse::from_session(&session)))
}

/// Upload a document whose extracted text becomes a quiz source.
///
/// Accepts a multipart/form-data request with a single file part. An empty
/// document is accepted; its extracted text is simply empty.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/document",
    request_body(content_type = "multipart/form-data", description = "The document to upload."),
    responses(
        (status = 200, description = "Document text extracted and stored", body = UploadDocumentResponse),
        (status = 400, description = "Bad request (e.g., missing file or unreadable document)"),
        (status = 404, description = "Unknown session")
    ),
    params(
        ("session_id" = Uuid, Path, description = "The quiz session id.")
    )
)]
pub async fn upload_document_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let (file_name, data) = if let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to read multipart data: {}", e),
        )
    })? {
        let name = field.file_name().unwrap_or("untitled.txt").to_string();
        let data = field.bytes().await.map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                format!("Failed to read file bytes: {}", e),
            )
        })?;
        (name, data)
    } else {
        return Err((
            StatusCode::BAD_REQUEST,
            "Multipart form must include a file".to_string(),
        ));
    };

    let extracted_characters =
        quiz_task::attach_document(&app_state, session_id, &file_name, &data)
            .await
            .map_err(quiz_error_response)?;

    Ok(Json(UploadDocumentResponse {
        session_id,
        extracted_characters,
    }))
}

/// List the fixed subject catalog for taxonomy-based quizzes.
#[utoipa::path(
    get,
    path = "/subjects",
    responses(
        (status = 200, description = "The subject catalog", body = [SubjectEntry])
    )
)]
pub async fn list_subjects_handler() -> Json<Vec<SubjectEntry>> {
    let entries = taxonomy::subjects()
        .into_iter()
        .map(|subject| SubjectEntry {
            subject: subject.to_string(),
            subfields: taxonomy::subfields(subject)
                .unwrap_or_default()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        })
        .collect();
    Json(entries)
}

/// Generate a new quiz for a session.
///
/// Replaces the session's current quiz on success; a failed generation
/// leaves the session untouched.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/quiz",
    request_body = GenerateQuizRequest,
    responses(
        (status = 200, description = "Quiz generated", body = GenerateQuizResponse),
        (status = 404, description = "Unknown session"),
        (status = 422, description = "Required parameters left unset or invalid"),
        (status = 502, description = "The generation service failed or replied with unusable output")
    ),
    params(
        ("session_id" = Uuid, Path, description = "The quiz session id.")
    )
)]
pub async fn generate_quiz_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<GenerateQuizRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let outcome = quiz_task::generate_quiz(&app_state, session_id, request.into())
        .await
        .map_err(quiz_error_response)?;
    Ok(Json(GenerateQuizResponse::from_outcome(&outcome)))
}

/// Record the user's answer for one question of the current quiz.
#[utoipa::path(
    put,
    path = "/sessions/{session_id}/answers/{index}",
    request_body = AnswerRequest,
    responses(
        (status = 204, description = "Answer recorded"),
        (status = 404, description = "Unknown session"),
        (status = 422, description = "No such question, or the quiz is not accepting answers")
    ),
    params(
        ("session_id" = Uuid, Path, description = "The quiz session id."),
        ("index" = usize, Path, description = "Zero-based question index.")
    )
)]
pub async fn record_answer_handler(
    State(app_state): State<Arc<AppState>>,
    Path((session_id, index)): Path<(Uuid, usize)>,
    Json(request): Json<AnswerRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    quiz_task::record_answer(&app_state, session_id, index, request.answer)
        .await
        .map_err(quiz_error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Submit the current quiz for scoring.
///
/// Always allowed regardless of how many questions were answered;
/// unanswered questions count as incorrect.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/submission",
    responses(
        (status = 200, description = "The scoring report", body = SubmissionResponse),
        (status = 404, description = "Unknown session"),
        (status = 422, description = "No quiz has been generated yet")
    ),
    params(
        ("session_id" = Uuid, Path, description = "The quiz session id.")
    )
)]
pub async fn submit_answers_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let report = quiz_task::submit_answers(&app_state, session_id)
        .await
        .map_err(quiz_error_response)?;
    Ok(Json(SubmissionResponse::from_report(session_id, report)))
}
