//! crates/quiz_core/src/dedup.rs
//!
//! Filters freshly generated items against the session's dedup history.

use crate::domain::QuizItem;

/// Returns the items of `generated` that are not structurally equal to any
/// item already in `history`, preserving the generated order.
///
/// Identity is full-record equality, so a rephrased question counts as a
/// new item. The batch is only compared against `history`, never against
/// itself; duplicates within one reply all survive and are appended to the
/// history together, matching how the history is accumulated.
pub fn filter_previously_seen(generated: Vec<QuizItem>, history: &[QuizItem]) -> Vec<QuizItem> {
    generated
        .into_iter()
        .filter(|item| !history.contains(item))
        .collect()
}
