//! crates/quiz_core/src/taxonomy.rs
//!
//! The fixed two-level subject catalog offered alongside document upload
//! and free-topic input as a source of quiz material.

/// Subject names paired with their selectable sub-fields.
const CATALOG: &[(&str, &[&str])] = &[
    (
        "Machine Learning",
        &[
            "Supervised Learning",
            "Unsupervised Learning",
            "Semi-Supervised Learning",
            "Reinforcement Learning",
        ],
    ),
    (
        "Deep Learning",
        &[
            "Artificial Neural Networks (ANNs)",
            "Convolutional Neural Networks (CNNs)",
            "Recurrent Neural Networks (RNNs)",
        ],
    ),
    (
        "Mathematics",
        &["Linear Algebra", "Calculus", "Matrices", "Vectors"],
    ),
    (
        "Statistics",
        &["Descriptive", "Probability", "Inferential"],
    ),
];

/// Returns every selectable subject, in catalog order.
pub fn subjects() -> Vec<&'static str> {
    CATALOG.iter().map(|(subject, _)| *subject).collect()
}

/// Returns the sub-fields of `subject`, or `None` for an unknown subject.
pub fn subfields(subject: &str) -> Option<&'static [&'static str]> {
    CATALOG
        .iter()
        .find(|(name, _)| *name == subject)
        .map(|(_, subfields)| *subfields)
}

/// Checks that `subfield` is a valid selection under `subject`.
pub fn is_valid_pair(subject: &str, subfield: &str) -> bool {
    subfields(subject)
        .map(|fields| fields.contains(&subfield))
        .unwrap_or(false)
}
