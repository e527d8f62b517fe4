/// LLM capability used by the relevance and Q&A stages.
///
/// `LanguageModel` is the seam: stages only see prompts going in and a
/// tagged `Completion` coming out. `OllamaClient` is the HTTP-backed
/// implementation; tests plug in scripted mocks.
mod client;
mod completion;

pub use client::{OllamaClient, OllamaClientBuilder, retry_with_backoff};
pub use completion::{Completion, CompletionRequest, LanguageModel, LlmError, invoke};
