//! crates/quiz_core/src/prompt.rs
//!
//! Builds the natural-language instruction sent to the generation service.
//! Construction is pure and deterministic: the same parameters and history
//! always produce the same instruction string.

use std::fmt::Write;

use crate::domain::{QuizItem, QuizKind, QuizParameters, SubjectDescriptor};

/// The reply schema demanded for multiple-choice quizzes.
const MULTIPLE_CHOICE_SCHEMA: &str = r#"[
    {
        "question": "string",
        "options": ["option1", "option2", "option3", "option4"],
        "answer": "string",
        "explanation": "string"
    }
]"#;

/// The reply schema demanded for true/false quizzes.
const TRUE_FALSE_SCHEMA: &str = r#"[
    {
        "question": "string",
        "answer": "True/False",
        "explanation": "string"
    }
]"#;

/// Composes the full generation instruction for one request: the quiz
/// parameters, the subject matter, the exact reply schema, and the list of
/// questions already asked in this session.
pub fn build_generation_prompt(params: &QuizParameters, history: &[QuizItem]) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "Using the JSON schema below, generate unique quiz questions based on the \
         selected parameters:\n",
    );
    if let SubjectDescriptor::Taxonomy { subject, subfield } = params.subject() {
        let _ = writeln!(prompt, "- Subject: {}", subject);
        let _ = writeln!(prompt, "- Sub-field: {}", subfield);
    }
    let _ = writeln!(prompt, "- Number of Questions: {}", params.count());
    let _ = writeln!(prompt, "- Type of Quiz: {}", params.kind());
    let _ = writeln!(prompt, "- Difficulty Level: {}", params.difficulty());
    let _ = writeln!(prompt, "- Language: {}", params.language());
    prompt.push('\n');

    match params.subject() {
        SubjectDescriptor::DocumentText(text) => {
            prompt.push_str(
                "The questions should be well-structured and cover a range of topics \
                 within the following content:\n\n",
            );
            prompt.push_str(text);
            prompt.push('\n');
        }
        SubjectDescriptor::Taxonomy { subfield, .. } => {
            let _ = writeln!(
                prompt,
                "The questions should be well-structured and cover a range of topics \
                 within {}.",
                subfield
            );
        }
        SubjectDescriptor::Topic(topic) => {
            let _ = writeln!(
                prompt,
                "The questions should be well-structured and cover a range of topics \
                 within {}.",
                topic
            );
        }
    }
    prompt.push('\n');

    match params.kind() {
        QuizKind::MultipleChoice => {
            prompt.push_str(
                "Each question must have four possible answer options, exactly one \
                 correct answer that matches one of the options, and an explanation \
                 for the correct answer.\n\n\
                 Provide the questions as a JSON array in exactly this format:\n\n",
            );
            prompt.push_str(MULTIPLE_CHOICE_SCHEMA);
        }
        QuizKind::TrueFalse => {
            prompt.push_str(
                "Each question must be a true/false statement with the correct answer \
                 given as \"True\" or \"False\", and an explanation for the correct \
                 answer.\n\n\
                 Provide the questions as a JSON array in exactly this format:\n\n",
            );
            prompt.push_str(TRUE_FALSE_SCHEMA);
        }
    }
    prompt.push('\n');

    if !history.is_empty() {
        prompt.push_str(
            "\nThe following questions have already been asked in this session. \
             Do not repeat or closely paraphrase any of them:\n",
        );
        for (i, item) in history.iter().enumerate() {
            let _ = writeln!(prompt, "{}. {}", i + 1, item.question());
        }
    }

    prompt.push_str(
        "\nThe explanations should be clear and concise, providing context or \
         additional information about the correct answer. Respond with the JSON \
         array only, with no surrounding prose or code fences.",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Difficulty, Language, QuizParameters};

    fn params(subject: SubjectDescriptor, kind: QuizKind) -> QuizParameters {
        QuizParameters::new(3, kind, Difficulty::Medium, Language::English, subject).unwrap()
    }

    fn history_item(question: &str) -> QuizItem {
        QuizItem::TrueFalse {
            question: question.to_string(),
            answer: true,
            explanation: "x".to_string(),
        }
    }

    #[test]
    fn embeds_every_parameter() {
        let prompt = build_generation_prompt(
            &params(
                SubjectDescriptor::Topic("Rust lifetimes".to_string()),
                QuizKind::MultipleChoice,
            ),
            &[],
        );
        assert!(prompt.contains("Number of Questions: 3"));
        assert!(prompt.contains("Type of Quiz: Multiple-Choice"));
        assert!(prompt.contains("Difficulty Level: Medium"));
        assert!(prompt.contains("Language: English"));
        assert!(prompt.contains("Rust lifetimes"));
    }

    #[test]
    fn taxonomy_subject_lists_subject_and_subfield() {
        let prompt = build_generation_prompt(
            &params(
                SubjectDescriptor::Taxonomy {
                    subject: "Statistics".to_string(),
                    subfield: "Probability".to_string(),
                },
                QuizKind::TrueFalse,
            ),
            &[],
        );
        assert!(prompt.contains("Subject: Statistics"));
        assert!(prompt.contains("Sub-field: Probability"));
        assert!(prompt.contains("within Probability."));
    }

    #[test]
    fn document_subject_embeds_the_extracted_text() {
        let prompt = build_generation_prompt(
            &params(
                SubjectDescriptor::DocumentText("Photosynthesis converts light.".to_string()),
                QuizKind::TrueFalse,
            ),
            &[],
        );
        assert!(prompt.contains("Photosynthesis converts light."));
    }

    #[test]
    fn schema_block_follows_the_requested_kind() {
        let mc = build_generation_prompt(
            &params(
                SubjectDescriptor::Topic("Calculus".to_string()),
                QuizKind::MultipleChoice,
            ),
            &[],
        );
        assert!(mc.contains("\"options\""));

        let tf = build_generation_prompt(
            &params(
                SubjectDescriptor::Topic("Calculus".to_string()),
                QuizKind::TrueFalse,
            ),
            &[],
        );
        assert!(tf.contains("True/False"));
        assert!(!tf.contains("\"options\""));
    }

    #[test]
    fn history_questions_are_listed_for_exclusion() {
        let history = vec![history_item("Is water wet?"), history_item("Is fire hot?")];
        let prompt = build_generation_prompt(
            &params(
                SubjectDescriptor::Topic("Chemistry".to_string()),
                QuizKind::TrueFalse,
            ),
            &history,
        );
        assert!(prompt.contains("already been asked"));
        assert!(prompt.contains("1. Is water wet?"));
        assert!(prompt.contains("2. Is fire hot?"));
    }

    #[test]
    fn empty_history_omits_the_exclusion_section() {
        let prompt = build_generation_prompt(
            &params(
                SubjectDescriptor::Topic("Chemistry".to_string()),
                QuizKind::TrueFalse,
            ),
            &[],
        );
        assert!(!prompt.contains("already been asked"));
    }

    #[test]
    fn construction_is_deterministic() {
        let p = params(
            SubjectDescriptor::Topic("Linear Algebra".to_string()),
            QuizKind::MultipleChoice,
        );
        let history = vec![history_item("Is a matrix square?")];
        assert_eq!(
            build_generation_prompt(&p, &history),
            build_generation_prompt(&p, &history)
        );
    }
}
