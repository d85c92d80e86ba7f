//! crates/quiz_core/src/error.rs
//!
//! Defines the domain-level error type for quiz operations.

use uuid::Uuid;

/// Failures that quiz operations can surface to the caller.
///
/// Every variant is handled at the boundary where it occurs and converted
/// into a user-visible message; none of them are fatal to the session.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    /// One or more required quiz parameters were left unset or hold an
    /// invalid value. Raised before any external call is made.
    #[error("Invalid parameter selection: {0}")]
    InvalidParameterSelection(String),

    /// The external generation service call did not complete successfully.
    /// Not retried automatically; the user may re-trigger generation.
    #[error("Quiz generation service unavailable: {0}")]
    GenerationUnavailable(String),

    /// The generation reply could not be parsed into the expected item
    /// structure. The whole reply is rejected; no partial acceptance.
    #[error("Failed to parse the generated quiz: {0}")]
    MalformedGenerationOutput(String),

    /// An answer was recorded against a missing item or outside the
    /// answerable phase of the session.
    #[error("Invalid answer submission: {0}")]
    InvalidAnswerSubmission(String),

    /// The uploaded document could not be resolved into text.
    #[error("Could not extract text from the document: {0}")]
    DocumentUnreadable(String),

    /// No session exists under the given id.
    #[error("Unknown quiz session: {0}")]
    SessionNotFound(Uuid),

    /// A catch-all for faults that crossed a port without a more
    /// specific meaning.
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, QuizError>`.
pub type QuizResult<T> = Result<T, QuizError>;
