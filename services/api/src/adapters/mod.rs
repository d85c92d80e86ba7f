pub mod extractor;
pub mod generation_llm;
pub mod session_store;

pub use extractor::PlainTextExtractor;
pub use generation_llm::OpenAiQuizGenerator;
pub use session_store::InMemorySessionStore;
