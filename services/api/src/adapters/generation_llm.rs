//! services/api/src/adapters/generation_llm.rs
//!
//! This module contains the adapter for the quiz-generating LLM.
//! It implements the `QuizGenerationService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use quiz_core::ports::{PortError, PortResult, QuizGenerationService};
use regex::Regex;

const SYSTEM_INSTRUCTIONS: &str = "You are a quiz generation assistant. You follow the \
    requested question count, type, difficulty, and language exactly, and you reply with \
    nothing but the requested JSON array.";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `QuizGenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiQuizGenerator {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiQuizGenerator {
    /// Creates a new `OpenAiQuizGenerator`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Unwraps a reply the model wrapped in a markdown code fence despite
    /// instructions. The reply content itself is left untouched.
    fn strip_code_fences(text: &str) -> String {
        let fence = Regex::new(r"(?s)^\s*```(?:json)?\s*(.*?)\s*```\s*$").unwrap();
        match fence.captures(text) {
            Some(caps) => caps[1].to_string(),
            None => text.trim().to_string(),
        }
    }
}

//=========================================================================================
// `QuizGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl QuizGenerationService for OpenAiQuizGenerator {
    /// Sends the prepared generation instruction and returns the raw textual
    /// reply. Parsing and validation of the reply belong to the caller.
    async fn generate(&self, prompt: &str) -> PortResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unavailable(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        if let Some(choice) = response.choices.into_iter().next() {
            if let Some(content) = choice.message.content {
                Ok(Self::strip_code_fences(&content))
            } else {
                Err(PortError::Unexpected(
                    "Generation LLM response contained no text content.".to_string(),
                ))
            }
        } else {
            Err(PortError::Unexpected(
                "Generation LLM returned no choices in its response.".to_string(),
            ))
        }
    }
}
