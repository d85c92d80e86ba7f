pub mod quiz_task;
pub mod rest;
pub mod state;

pub use rest::{
    create_session_handler, generate_quiz_handler, get_session_handler, list_subjects_handler,
    record_answer_handler, submit_answers_handler, upload_document_handler,
};
