//! services/api/src/adapters/extractor.rs
//!
//! This module contains the adapter for document text extraction.
//! It implements the `DocumentTextExtractor` port from the `core` crate.

use async_trait::async_trait;
use quiz_core::ports::{DocumentTextExtractor, PortError, PortResult};
use tracing::info;

/// An adapter that resolves uploaded documents as UTF-8 plain text.
///
/// Empty documents extract to an empty string, which the core treats as a
/// valid (empty) subject.
#[derive(Clone, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentTextExtractor for PlainTextExtractor {
    async fn extract_text(&self, file_name: &str, data: &[u8]) -> PortResult<String> {
        let text = String::from_utf8(data.to_vec()).map_err(|e| {
            PortError::Unexpected(format!(
                "Document '{}' is not valid UTF-8 text: {}",
                file_name, e
            ))
        })?;
        info!(
            "Extracted {} characters of text from '{}'.",
            text.chars().count(),
            file_name
        );
        Ok(text)
    }
}
