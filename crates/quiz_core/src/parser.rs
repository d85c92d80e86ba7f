//! crates/quiz_core/src/parser.rs
//!
//! Validating deserializer for generation replies. The reply must be a JSON
//! array of quiz records matching the kind that was requested; any mismatch
//! rejects the whole reply. There is no partial acceptance and no fallback
//! parse attempt.

use serde::Deserialize;

use crate::domain::{QuizItem, QuizKind};
use crate::error::{QuizError, QuizResult};

/// The wire shape of one generated record, before validation.
#[derive(Debug, Deserialize)]
struct RawQuizRecord {
    question: String,
    #[serde(default)]
    options: Option<Vec<String>>,
    answer: String,
    explanation: String,
}

/// Parses a raw generation reply into quiz items of the declared kind.
///
/// An empty array is a successful parse. Any deviation from the expected
/// shape (unparseable JSON, a missing field, the wrong option count, an
/// answer that is not one of the options) fails with
/// [`QuizError::MalformedGenerationOutput`].
pub fn parse_generated_items(raw: &str, kind: QuizKind) -> QuizResult<Vec<QuizItem>> {
    let records: Vec<RawQuizRecord> = serde_json::from_str(raw.trim()).map_err(|e| {
        QuizError::MalformedGenerationOutput(format!(
            "reply is not a JSON array of quiz records: {}",
            e
        ))
    })?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| validate_record(index, record, kind))
        .collect()
}

fn validate_record(
    index: usize,
    record: RawQuizRecord,
    kind: QuizKind,
) -> QuizResult<QuizItem> {
    let malformed = |message: String| QuizError::MalformedGenerationOutput(message);

    if record.question.trim().is_empty() {
        return Err(malformed(format!("record {}: question is empty", index)));
    }

    match kind {
        QuizKind::MultipleChoice => {
            let options = record.options.ok_or_else(|| {
                malformed(format!(
                    "record {}: multiple-choice record has no options",
                    index
                ))
            })?;
            if options.len() != 4 {
                return Err(malformed(format!(
                    "record {}: expected 4 options, got {}",
                    index,
                    options.len()
                )));
            }
            for (i, option) in options.iter().enumerate() {
                if options[..i].contains(option) {
                    return Err(malformed(format!(
                        "record {}: duplicate option '{}'",
                        index, option
                    )));
                }
            }
            if !options.contains(&record.answer) {
                return Err(malformed(format!(
                    "record {}: answer '{}' is not one of the options",
                    index, record.answer
                )));
            }
            let options: [String; 4] = options
                .try_into()
                .map_err(|_| malformed(format!("record {}: expected 4 options", index)))?;
            Ok(QuizItem::MultipleChoice {
                question: record.question,
                options,
                answer: record.answer,
                explanation: record.explanation,
            })
        }
        QuizKind::TrueFalse => {
            if record.options.is_some() {
                return Err(malformed(format!(
                    "record {}: true/false record carries options",
                    index
                )));
            }
            let answer = match record.answer.as_str() {
                "True" => true,
                "False" => false,
                other => {
                    return Err(malformed(format!(
                        "record {}: true/false answer must be \"True\" or \"False\", got '{}'",
                        index, other
                    )))
                }
            };
            Ok(QuizItem::TrueFalse {
                question: record.question,
                answer,
                explanation: record.explanation,
            })
        }
    }
}
