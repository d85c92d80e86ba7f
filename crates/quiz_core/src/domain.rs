//! crates/quiz_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any transport or serialization format;
//! the wire shape of generated items lives in the parser.

use std::fmt;
use std::str::FromStr;

use crate::error::{QuizError, QuizResult};
use crate::taxonomy;

/// The largest number of questions a single generation request may ask for.
pub const MAX_QUESTION_COUNT: usize = 50;

//=========================================================================================
// Parameter Enums
//=========================================================================================

/// The answer affordance of a quiz: pick one of four options, or True/False.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizKind {
    MultipleChoice,
    TrueFalse,
}

impl QuizKind {
    /// The label shown to users and embedded in generation instructions.
    pub fn label(&self) -> &'static str {
        match self {
            QuizKind::MultipleChoice => "Multiple-Choice",
            QuizKind::TrueFalse => "True-False",
        }
    }
}

impl fmt::Display for QuizKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for QuizKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            s if s.eq_ignore_ascii_case("multiple-choice") => Ok(QuizKind::MultipleChoice),
            s if s.eq_ignore_ascii_case("true-false") => Ok(QuizKind::TrueFalse),
            _ => Err(()),
        }
    }
}

/// Requested difficulty of the generated questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            s if s.eq_ignore_ascii_case("easy") => Ok(Difficulty::Easy),
            s if s.eq_ignore_ascii_case("medium") => Ok(Difficulty::Medium),
            s if s.eq_ignore_ascii_case("hard") => Ok(Difficulty::Hard),
            _ => Err(()),
        }
    }
}

/// Language the questions are generated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Urdu,
    French,
}

impl Language {
    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Urdu => "Urdu",
            Language::French => "French",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            s if s.eq_ignore_ascii_case("english") => Ok(Language::English),
            s if s.eq_ignore_ascii_case("urdu") => Ok(Language::Urdu),
            s if s.eq_ignore_ascii_case("french") => Ok(Language::French),
            _ => Err(()),
        }
    }
}

//=========================================================================================
// QuizItem
//=========================================================================================

/// One question unit, tagged by its answer affordance.
///
/// Structural equality over all populated fields is the identity used for
/// deduplication: two items are the same question only if every field
/// matches exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizItem {
    MultipleChoice {
        question: String,
        /// Exactly four pairwise-distinct answer options.
        options: [String; 4],
        /// The correct option; always equal to one entry of `options`.
        answer: String,
        explanation: String,
    },
    TrueFalse {
        question: String,
        answer: bool,
        explanation: String,
    },
}

impl QuizItem {
    pub fn kind(&self) -> QuizKind {
        match self {
            QuizItem::MultipleChoice { .. } => QuizKind::MultipleChoice,
            QuizItem::TrueFalse { .. } => QuizKind::TrueFalse,
        }
    }

    pub fn question(&self) -> &str {
        match self {
            QuizItem::MultipleChoice { question, .. } => question,
            QuizItem::TrueFalse { question, .. } => question,
        }
    }

    /// The answer options shown to the user; `None` for True/False items,
    /// whose affordance is always the fixed True/False pair.
    pub fn options(&self) -> Option<&[String; 4]> {
        match self {
            QuizItem::MultipleChoice { options, .. } => Some(options),
            QuizItem::TrueFalse { .. } => None,
        }
    }

    /// The correct answer as the exact string a user selection is compared
    /// against: an option text, or `"True"`/`"False"`.
    pub fn answer_text(&self) -> &str {
        match self {
            QuizItem::MultipleChoice { answer, .. } => answer,
            QuizItem::TrueFalse { answer: true, .. } => "True",
            QuizItem::TrueFalse { answer: false, .. } => "False",
        }
    }

    pub fn explanation(&self) -> &str {
        match self {
            QuizItem::MultipleChoice { explanation, .. } => explanation,
            QuizItem::TrueFalse { explanation, .. } => explanation,
        }
    }
}

//=========================================================================================
// Subject Descriptor and QuizParameters
//=========================================================================================

/// The resolved content basis a quiz is generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectDescriptor {
    /// Raw text extracted from an uploaded document. May be empty; an empty
    /// document is a valid (if unhelpful) subject.
    DocumentText(String),
    /// A subject and sub-field pair from the fixed catalog.
    Taxonomy { subject: String, subfield: String },
    /// A free-text topic entered by the user.
    Topic(String),
}

/// Immutable configuration for one generation request.
///
/// Construction validates every selection; a value of this type always
/// describes a request that is safe to send to the generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizParameters {
    count: usize,
    kind: QuizKind,
    difficulty: Difficulty,
    language: Language,
    subject: SubjectDescriptor,
}

impl QuizParameters {
    pub fn new(
        count: usize,
        kind: QuizKind,
        difficulty: Difficulty,
        language: Language,
        subject: SubjectDescriptor,
    ) -> QuizResult<Self> {
        if count == 0 {
            return Err(QuizError::InvalidParameterSelection(
                "the number of questions must be at least 1".to_string(),
            ));
        }
        if count > MAX_QUESTION_COUNT {
            return Err(QuizError::InvalidParameterSelection(format!(
                "the number of questions must not exceed {}",
                MAX_QUESTION_COUNT
            )));
        }

        match &subject {
            SubjectDescriptor::DocumentText(_) => {}
            SubjectDescriptor::Taxonomy { subject, subfield } => {
                if !taxonomy::is_valid_pair(subject, subfield) {
                    return Err(QuizError::InvalidParameterSelection(format!(
                        "'{}' / '{}' is not a valid subject and sub-field pair",
                        subject, subfield
                    )));
                }
            }
            SubjectDescriptor::Topic(topic) => {
                if topic.trim().is_empty() {
                    return Err(QuizError::InvalidParameterSelection(
                        "the topic must not be empty".to_string(),
                    ));
                }
            }
        }

        Ok(Self {
            count,
            kind,
            difficulty,
            language,
            subject,
        })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn kind(&self) -> QuizKind {
        self.kind
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn subject(&self) -> &SubjectDescriptor {
        &self.subject
    }
}

//=========================================================================================
// Scoring Output
//=========================================================================================

/// The scored rendering of a single item after submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredItem {
    pub question: String,
    /// What the user selected, or `None` if the item was left unanswered.
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: String,
}

/// The result of scoring a full quiz: one entry per item, in item order,
/// plus the aggregate score out of the item count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizReport {
    pub items: Vec<ScoredItem>,
    pub score: usize,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic_subject() -> SubjectDescriptor {
        SubjectDescriptor::Topic("Rust ownership".to_string())
    }

    #[test]
    fn accepts_a_valid_parameter_set() {
        let params = QuizParameters::new(
            5,
            QuizKind::MultipleChoice,
            Difficulty::Medium,
            Language::English,
            topic_subject(),
        )
        .expect("parameters are valid");
        assert_eq!(params.count(), 5);
        assert_eq!(params.kind(), QuizKind::MultipleChoice);
    }

    #[test]
    fn rejects_zero_and_oversized_counts() {
        for count in [0, MAX_QUESTION_COUNT + 1] {
            let err = QuizParameters::new(
                count,
                QuizKind::TrueFalse,
                Difficulty::Easy,
                Language::English,
                topic_subject(),
            )
            .unwrap_err();
            assert!(matches!(err, QuizError::InvalidParameterSelection(_)));
        }
    }

    #[test]
    fn rejects_blank_topics() {
        let err = QuizParameters::new(
            3,
            QuizKind::TrueFalse,
            Difficulty::Easy,
            Language::Urdu,
            SubjectDescriptor::Topic("   ".to_string()),
        )
        .unwrap_err();
        assert!(matches!(err, QuizError::InvalidParameterSelection(_)));
    }

    #[test]
    fn rejects_mismatched_taxonomy_pairs() {
        let err = QuizParameters::new(
            3,
            QuizKind::MultipleChoice,
            Difficulty::Hard,
            Language::English,
            SubjectDescriptor::Taxonomy {
                subject: "Statistics".to_string(),
                subfield: "Calculus".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, QuizError::InvalidParameterSelection(_)));
    }

    #[test]
    fn empty_document_text_is_a_valid_subject() {
        let params = QuizParameters::new(
            1,
            QuizKind::TrueFalse,
            Difficulty::Easy,
            Language::English,
            SubjectDescriptor::DocumentText(String::new()),
        );
        assert!(params.is_ok());
    }

    #[test]
    fn parameter_labels_parse_back() {
        assert_eq!("Multiple-Choice".parse(), Ok(QuizKind::MultipleChoice));
        assert_eq!("true-false".parse(), Ok(QuizKind::TrueFalse));
        assert_eq!("Medium".parse(), Ok(Difficulty::Medium));
        assert_eq!("urdu".parse(), Ok(Language::Urdu));
        assert!("Select.....".parse::<Difficulty>().is_err());
    }

    #[test]
    fn true_false_answer_text_matches_wire_form() {
        let item = QuizItem::TrueFalse {
            question: "The sky is green.".to_string(),
            answer: false,
            explanation: "It scatters blue light.".to_string(),
        };
        assert_eq!(item.answer_text(), "False");
        assert!(item.options().is_none());
    }
}
