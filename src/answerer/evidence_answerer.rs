//! Per-note, per-question evidence extraction.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::parse::parse_answer;
use crate::llm::{Completion, CompletionRequest, LanguageModel, LlmError, invoke};
use crate::models::{Answer, Note, QaResult};

/// Token budget for a verdict plus several quotes.
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Prompt template demanding a strict JSON verdict with verbatim quotes.
const PROMPT_TEMPLATE: &str = r#"System Instruction:
You are given a customer note's subject and its plain-text content. You will be asked ONE question about the note.

EVIDENCE RULES:
- Quote the note directly. Never paraphrase or interpret when a quote is available.
- Every quote must be an exact substring of the note content.
- Prefer fewer, clearly relevant quotes over many tangential ones.

Decision framework for "answer":
- "Yes": the note clearly supports yes. Evidence is REQUIRED.
- "No": the note clearly supports no. Evidence is optional but preferred.
- "Maybe": the note hints at an answer but is ambiguous or indirect. Evidence is REQUIRED.
- "-": the question does not apply to this note. Evidence MUST be [].

Output strictly one JSON object with keys "answer" and "evidence" and no commentary before or after it.

User Input:
Customer note subject:
{subject}

Customer note content:
{content}

Question:
{question}

Expected Output (JSON only):
{
  "answer": "Yes" | "No" | "Maybe" | "-",
  "evidence": [
    "Exact quote 1 from note",
    "Exact quote 2 from note"
  ]
}"#;

/// Builder for constructing `EvidenceAnswerer` instances.
#[derive(Default)]
pub struct EvidenceAnswererBuilder {
    client: Option<Arc<dyn LanguageModel>>,
    max_tokens: Option<u32>,
}

impl EvidenceAnswererBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the language model to ask.
    pub fn client(mut self, client: Arc<dyn LanguageModel>) -> Self {
        self.client = Some(client);
        self
    }

    /// Overrides the output token budget (default 500).
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Builds the `EvidenceAnswerer`.
    ///
    /// # Panics
    ///
    /// Panics if `client()` was not called.
    #[must_use]
    pub fn build(self) -> EvidenceAnswerer {
        EvidenceAnswerer {
            client: self.client.expect("client must be set via client() method"),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        }
    }
}

/// Answers yes/no/maybe questions about notes with supporting quotes.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use noteqa::answerer::EvidenceAnswerer;
/// use noteqa::llm::{CompletionRequest, LanguageModel, LlmError};
/// use noteqa::{NoteBuilder, Verdict};
///
/// struct AlwaysYes;
///
/// impl LanguageModel for AlwaysYes {
///     fn complete(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
///         Ok(r#"{"answer":"Yes","evidence":["pilot approved"]}"#.to_string())
///     }
/// }
///
/// let answerer = EvidenceAnswerer::new(Arc::new(AlwaysYes));
/// let note = NoteBuilder::new().id("n1").clean_content("pilot approved").build();
///
/// let results = answerer.answer_questions(&[note], &["Did they request a pilot?"]);
/// assert_eq!(results[0].answers[0].verdict, Verdict::Yes);
/// ```
pub struct EvidenceAnswerer {
    client: Arc<dyn LanguageModel>,
    max_tokens: u32,
}

impl EvidenceAnswerer {
    /// Creates an answerer with the default token budget.
    #[must_use]
    pub fn new(client: Arc<dyn LanguageModel>) -> Self {
        Self {
            client,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Returns one `QaResult` per note, each with one answer per question in order.
    ///
    /// A failed call only affects its own (note, question) pair. If the
    /// stage cannot start, every answer is a placeholder.
    pub fn answer_questions<Q: AsRef<str>>(&self, notes: &[Note], questions: &[Q]) -> Vec<QaResult> {
        match self.try_answer(notes, questions) {
            Ok(results) => {
                info!(
                    notes = notes.len(),
                    questions = questions.len(),
                    "question answering finished"
                );
                results
            }
            Err(e) => {
                warn!(error = %e, "question answering unavailable, returning placeholders");
                notes
                    .iter()
                    .map(|note| QaResult::placeholder(note, questions.len()))
                    .collect()
            }
        }
    }

    fn try_answer<Q: AsRef<str>>(
        &self,
        notes: &[Note],
        questions: &[Q],
    ) -> Result<Vec<QaResult>, LlmError> {
        self.client.ensure_ready()?;

        let results = notes
            .iter()
            .map(|note| {
                let answers = questions
                    .iter()
                    .map(|question| self.answer_one(note, question.as_ref()))
                    .collect();
                QaResult::new(note, answers)
            })
            .collect();
        Ok(results)
    }

    fn answer_one(&self, note: &Note, question: &str) -> Answer {
        let request =
            CompletionRequest::deterministic(build_prompt(note, question), self.max_tokens);
        let completion = invoke(self.client.as_ref(), &request);

        match &completion {
            Completion::Text(text) => {
                debug!(note_id = %note.id, question, response = %text, "answer response");
            }
            Completion::Empty => {
                warn!(note_id = %note.id, question, "no answer response");
            }
            Completion::Failure(reason) => {
                warn!(note_id = %note.id, question, error = %reason, "answer call failed");
            }
        }

        parse_answer(&completion)
    }
}

fn build_prompt(note: &Note, question: &str) -> String {
    PROMPT_TEMPLATE
        .replace("{subject}", &note.subject)
        .replace("{content}", &note.clean_content)
        .replace("{question}", question)
}
