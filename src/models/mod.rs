pub mod attempt;
pub mod content;
pub mod question;
pub mod quiz;
pub mod subject;

pub use attempt::{NewAttempt, QuizAttempt, UserStats};
pub use content::{
    AnalyzedContent, CauseEffectRecord, ComparisonRecord, DefinitionRecord, Entity, EntityKind,
    FactualRecord, ProcessRecord,
};
pub use question::{BloomLevel, Category, Difficulty, Question, QuestionDraft};
pub use quiz::{DifficultyCounts, GenerationSource, Quiz, QuizMetadata};
pub use subject::SubjectArea;
