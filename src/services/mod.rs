pub mod attempt_store;
pub mod llm_service;
pub mod pdf_service;
pub mod quiz_service;
pub mod quiz_store;

pub use attempt_store::AttemptStore;
pub use llm_service::LlmService;
pub use pdf_service::{extract_document, ExtractedDocument, PdfTextExtractor, TextExtractor};
pub use quiz_service::{GeneratedQuiz, QuizRequest, QuizService};
pub use quiz_store::{QuizStore, QuizSummary, StoredQuiz};
