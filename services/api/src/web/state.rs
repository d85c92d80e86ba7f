//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use quiz_core::ports::{DocumentTextExtractor, QuizGenerationService, SessionStore};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
///
/// Everything behind the port traits is swappable; the per-session quiz
/// state itself lives in the session store, never here.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    pub generator: Arc<dyn QuizGenerationService>,
    pub extractor: Arc<dyn DocumentTextExtractor>,
    pub config: Arc<Config>,
}
