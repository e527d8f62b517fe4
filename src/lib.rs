pub mod aggregator;
pub mod answerer;
pub mod config;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod relevance;
pub mod sanitizer;
pub mod sentinels;
pub mod source;

pub use aggregator::{ResultSet, aggregate};
pub use answerer::{EvidenceAnswerer, EvidenceAnswererBuilder};
pub use config::Config;
pub use llm::{LanguageModel, OllamaClient, OllamaClientBuilder};
pub use models::{Answer, Note, NoteBuilder, NoteId, QaResult, Verdict};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineInput, PipelineReport, PipelineRequest};
pub use relevance::{RelevanceClassifier, RelevanceClassifierBuilder};
pub use sanitizer::{sanitize, sanitize_notes};
pub use source::{MonthRange, NoteQuery, RowSource, SampleSource, SqliteSource};
