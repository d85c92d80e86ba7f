//! services/api/src/adapters/session_store.rs
//!
//! This module contains the in-memory adapter for session storage.
//! It implements the `SessionStore` port from the `core` crate.

use std::collections::HashMap;

use async_trait::async_trait;
use quiz_core::ports::{PortError, PortResult, SessionStore};
use quiz_core::session::QuizSession;
use tokio::sync::RwLock;
use uuid::Uuid;

/// An adapter that keeps quiz sessions in process memory.
///
/// Sessions live for the lifetime of the server process; there is no
/// persistence layer behind them. Each session is handed out as a copy and
/// written back wholesale, so a generation request's state change lands in
/// the map as one replacement.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, QuizSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self) -> PortResult<QuizSession> {
        let session = QuizSession::new(Uuid::new_v4());
        self.sessions
            .write()
            .await
            .insert(session.id(), session.clone());
        Ok(session)
    }

    async fn fetch(&self, session_id: Uuid) -> PortResult<QuizSession> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("session {}", session_id)))
    }

    async fn store(&self, session: QuizSession) -> PortResult<()> {
        self.sessions.write().await.insert(session.id(), session);
        Ok(())
    }
}
