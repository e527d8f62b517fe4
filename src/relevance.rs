//! Relevance filtering of notes against a project description.
//!
//! Each note gets one short yes/no question to the language model. Any
//! failure keeps the note: a transient outage must never silently drop data.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::llm::{Completion, CompletionRequest, LanguageModel, LlmError, invoke};
use crate::models::Note;
use crate::sanitizer::sanitize_notes;

/// Token budget for a bare "Yes"/"No" reply.
pub const DEFAULT_MAX_TOKENS: u32 = 10;

/// Prompt template for the relevance decision.
const PROMPT_TEMPLATE: &str = r#"System Instruction:
You are given a project description and the subject and plain-text content of a customer note. Determine whether the note is relevant to the project description. A note is relevant if it contains information about the same product, feature, customer need, or context that could directly inform or influence the project. If entirely unrelated, it is not relevant.
Respond with only:
"Yes" or "No"

User Input:
Project description:
{project}

Customer note subject:
{subject}

Customer note content:
{content}"#;

/// Builder for constructing `RelevanceClassifier` instances.
#[derive(Default)]
pub struct RelevanceClassifierBuilder {
    client: Option<Arc<dyn LanguageModel>>,
    max_tokens: Option<u32>,
}

impl RelevanceClassifierBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the language model to ask.
    pub fn client(mut self, client: Arc<dyn LanguageModel>) -> Self {
        self.client = Some(client);
        self
    }

    /// Overrides the output token budget (default 10).
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Builds the `RelevanceClassifier`.
    ///
    /// # Panics
    ///
    /// Panics if `client()` was not called.
    #[must_use]
    pub fn build(self) -> RelevanceClassifier {
        RelevanceClassifier {
            client: self.client.expect("client must be set via client() method"),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        }
    }
}

/// Keeps the notes a language model judges relevant to a project.
pub struct RelevanceClassifier {
    client: Arc<dyn LanguageModel>,
    max_tokens: u32,
}

impl RelevanceClassifier {
    /// Creates a classifier with the default token budget.
    #[must_use]
    pub fn new(client: Arc<dyn LanguageModel>) -> Self {
        Self {
            client,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Returns the sanitized notes judged relevant, in input order.
    ///
    /// A note is kept when the reply contains the literal `Yes` anywhere
    /// (so "Yes, partially" counts). Failed or empty replies keep the note.
    /// If the stage cannot start at all, every note is returned sanitized
    /// and unfiltered.
    pub fn filter_relevant(&self, notes: &[Note], project_description: &str) -> Vec<Note> {
        match self.try_filter(notes, project_description) {
            Ok(kept) => {
                info!(total = notes.len(), kept = kept.len(), "relevance filtering finished");
                kept
            }
            Err(e) => {
                warn!(error = %e, "relevance filtering unavailable, returning all notes");
                sanitize_notes(notes.to_vec())
            }
        }
    }

    fn try_filter(&self, notes: &[Note], project_description: &str) -> Result<Vec<Note>, LlmError> {
        self.client.ensure_ready()?;

        let kept = sanitize_notes(notes.to_vec())
            .into_iter()
            .filter(|note| self.is_relevant(note, project_description))
            .collect();
        Ok(kept)
    }

    fn is_relevant(&self, note: &Note, project_description: &str) -> bool {
        let request = CompletionRequest::deterministic(
            build_prompt(note, project_description),
            self.max_tokens,
        );
        let completion = invoke(self.client.as_ref(), &request);

        match &completion {
            Completion::Text(text) => {
                debug!(note_id = %note.id, response = %text, "relevance decision");
            }
            Completion::Empty => {
                warn!(note_id = %note.id, "no relevance response, keeping note");
            }
            Completion::Failure(reason) => {
                warn!(note_id = %note.id, error = %reason, "relevance call failed, keeping note");
            }
        }

        retains(&completion)
    }
}

/// Decision rule: keep on a literal `Yes`, and on anything that is not text.
pub fn retains(completion: &Completion) -> bool {
    match completion {
        Completion::Text(text) => text.contains("Yes"),
        Completion::Empty | Completion::Failure(_) => true,
    }
}

fn build_prompt(note: &Note, project_description: &str) -> String {
    PROMPT_TEMPLATE
        .replace("{project}", project_description)
        .replace("{subject}", &note.subject)
        .replace("{content}", &note.clean_content)
}
