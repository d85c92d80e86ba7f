pub mod dedup;
pub mod domain;
pub mod error;
pub mod parser;
pub mod prompt;
pub mod ports;
pub mod session;
pub mod taxonomy;

pub use dedup::filter_previously_seen;
pub use domain::{
    Difficulty, Language, QuizItem, QuizKind, QuizParameters, QuizReport, ScoredItem,
    SubjectDescriptor, MAX_QUESTION_COUNT,
};
pub use error::{QuizError, QuizResult};
pub use parser::parse_generated_items;
pub use ports::{
    DocumentTextExtractor, PortError, PortResult, QuizGenerationService, SessionStore,
};
pub use prompt::build_generation_prompt;
pub use session::{QuizSession, SessionPhase};
