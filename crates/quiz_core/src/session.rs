//! crates/quiz_core/src/session.rs
//!
//! The per-user quiz session: an explicit finite-state object holding the
//! current items, the user's selections, and the dedup history. All state
//! transitions run sequentially inside one request; there is no concurrent
//! mutation of a session.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{QuizItem, QuizReport, ScoredItem};
use crate::error::{QuizError, QuizResult};

/// Where a session currently sits in its generation/submission cycle.
///
/// `Empty` → `Ready` on the first successful generation; `Ready` → `Scored`
/// on submission; any later successful generation returns to `Ready`.
/// A failed generation never transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No quiz has been generated yet.
    Empty,
    /// Items are loaded and accepting answer selections.
    Ready,
    /// A score has been reported for the current items.
    Scored,
}

impl SessionPhase {
    pub fn label(&self) -> &'static str {
        match self {
            SessionPhase::Empty => "empty",
            SessionPhase::Ready => "ready",
            SessionPhase::Scored => "scored",
        }
    }
}

/// Mutable state for one interactive quiz session.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    phase: SessionPhase,
    items: Vec<QuizItem>,
    /// One slot per current item, `None` while unanswered.
    answers: Vec<Option<String>>,
    /// Every item ever accepted into `items`, in acceptance order. Grows
    /// monotonically for the lifetime of the session.
    history: Vec<QuizItem>,
    /// Text extracted from the most recently uploaded document, if any.
    document_text: Option<String>,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

impl QuizSession {
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            phase: SessionPhase::Empty,
            items: Vec::new(),
            answers: Vec::new(),
            history: Vec::new(),
            document_text: None,
            created_at: now,
            last_activity_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn items(&self) -> &[QuizItem] {
        &self.items
    }

    pub fn answers(&self) -> &[Option<String>] {
        &self.answers
    }

    pub fn history(&self) -> &[QuizItem] {
        &self.history
    }

    pub fn document_text(&self) -> Option<&str> {
        self.document_text.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_activity_at(&self) -> DateTime<Utc> {
        self.last_activity_at
    }

    /// Attaches extracted document text as the session's upload-based
    /// quiz source, replacing any earlier upload.
    pub fn set_document_text(&mut self, text: String) {
        self.document_text = Some(text);
        self.touch();
    }

    /// Accepts a filtered generation result as the current quiz.
    ///
    /// This is the sole generation-path mutation: the item list is replaced
    /// wholesale, every answer slot is reset to unanswered, and the accepted
    /// batch is appended to the history as-is. An empty batch is accepted
    /// and still moves the session to `Ready`.
    pub fn install_items(&mut self, items: Vec<QuizItem>) {
        self.history.extend(items.iter().cloned());
        self.answers = vec![None; items.len()];
        self.items = items;
        self.phase = SessionPhase::Ready;
        self.touch();
    }

    /// Records the user's selection for the item at `index`.
    ///
    /// Selections are only accepted while the session is `Ready`; a scored
    /// quiz is read-only until a new generation replaces it.
    pub fn record_answer(&mut self, index: usize, answer: String) -> QuizResult<()> {
        match self.phase {
            SessionPhase::Ready => {}
            SessionPhase::Empty => {
                return Err(QuizError::InvalidAnswerSubmission(
                    "no quiz has been generated yet".to_string(),
                ))
            }
            SessionPhase::Scored => {
                return Err(QuizError::InvalidAnswerSubmission(
                    "this quiz has been scored; generate a new quiz to continue".to_string(),
                ))
            }
        }
        if index >= self.items.len() {
            return Err(QuizError::InvalidAnswerSubmission(format!(
                "question index {} is out of range for a quiz of {} questions",
                index,
                self.items.len()
            )));
        }
        self.answers[index] = Some(answer);
        self.touch();
        Ok(())
    }

    /// Scores the current items against the recorded answers.
    ///
    /// Pure read: comparison is exact, case-sensitive string equality, an
    /// unanswered item counts as incorrect, and an empty quiz scores 0 out
    /// of 0. Calling this twice on the same state yields the same report.
    pub fn score(&self) -> QuizReport {
        let items = self
            .items
            .iter()
            .zip(&self.answers)
            .map(|(item, answer)| {
                let is_correct = answer.as_deref() == Some(item.answer_text());
                ScoredItem {
                    question: item.question().to_string(),
                    user_answer: answer.clone(),
                    correct_answer: item.answer_text().to_string(),
                    is_correct,
                    explanation: item.explanation().to_string(),
                }
            })
            .collect::<Vec<_>>();
        let score = items.iter().filter(|item| item.is_correct).count();
        let total = items.len();
        QuizReport {
            items,
            score,
            total,
        }
    }

    /// Submits the current answers for scoring.
    ///
    /// Allowed from `Ready` and, idempotently, from `Scored`; the report is
    /// the same pure `score()` result either way. Items, answers, and
    /// history are left untouched.
    pub fn submit(&mut self) -> QuizResult<QuizReport> {
        if self.phase == SessionPhase::Empty {
            return Err(QuizError::InvalidAnswerSubmission(
                "no quiz has been generated yet".to_string(),
            ));
        }
        self.phase = SessionPhase::Scored;
        self.touch();
        Ok(self.score())
    }

    fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }
}
