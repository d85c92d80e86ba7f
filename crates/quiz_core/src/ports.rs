//! crates/quiz_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like LLM providers or
//! session storage.

use async_trait::async_trait;
use uuid::Uuid;

use crate::session::QuizSession;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., the
/// generation provider or the session store).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The external service could not be reached or did not complete the call.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The external text-generation collaborator.
///
/// The core hands it a fully built instruction string and receives the raw
/// textual reply; how the reply was produced is opaque. A failed call is
/// not retried within a single request.
#[async_trait]
pub trait QuizGenerationService: Send + Sync {
    async fn generate(&self, prompt: &str) -> PortResult<String>;
}

/// The external document-text-extraction collaborator.
///
/// Resolves an uploaded file into its concatenated text. A zero-length
/// result is valid output, not an error.
#[async_trait]
pub trait DocumentTextExtractor: Send + Sync {
    async fn extract_text(&self, file_name: &str, data: &[u8]) -> PortResult<String>;
}

/// Ownership boundary for per-user quiz sessions.
///
/// Sessions are fetched and stored wholesale; a session value is never
/// shared between requests mid-mutation, which keeps the generation-path
/// state change atomic from any reader's point of view.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates a fresh, empty session and returns it.
    async fn create(&self) -> PortResult<QuizSession>;

    /// Returns a copy of the session under `session_id`.
    async fn fetch(&self, session_id: Uuid) -> PortResult<QuizSession>;

    /// Replaces the stored session with `session`, keyed by its id.
    async fn store(&self, session: QuizSession) -> PortResult<()>;
}
