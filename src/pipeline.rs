//! Sequencing of retrieval, sanitization, relevance filtering and Q&A.
//!
//! Every stage is callable on its own; `run` chains whichever stages the
//! request asks for. Stages never fail: degraded inputs give degraded
//! (placeholder or unfiltered) outputs.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::aggregator::{ResultSet, aggregate};
use crate::answerer::EvidenceAnswerer;
use crate::llm::LanguageModel;
use crate::models::{Note, QaResult};
use crate::relevance::RelevanceClassifier;
use crate::sanitizer::sanitize_notes;
use crate::source::{NoteQuery, RowSource, SampleSource};
use crate::{answerer, relevance};

/// Where the notes of a run come from.
#[derive(Debug, Clone)]
pub enum PipelineInput {
    /// Retrieve from the configured sources.
    Query(NoteQuery),
    /// Use caller-supplied notes, bypassing retrieval.
    Notes(Vec<Note>),
}

/// One end-to-end request.
///
/// Relevance filtering runs only with a non-blank project description;
/// question answering runs only when questions are given.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub input: PipelineInput,
    pub project_description: Option<String>,
    pub questions: Vec<String>,
}

/// Output of `Pipeline::run`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    /// Notes available before relevance filtering.
    pub retrieved: usize,
    /// Sanitized notes that survived filtering.
    pub notes: Vec<Note>,
    pub results: Vec<QaResult>,
}

/// Builder for constructing `Pipeline` instances.
pub struct PipelineBuilder {
    sources: Vec<Box<dyn RowSource>>,
    client: Option<Arc<dyn LanguageModel>>,
    relevance_max_tokens: u32,
    qa_max_tokens: u32,
    sample_fallback: bool,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            client: None,
            relevance_max_tokens: relevance::DEFAULT_MAX_TOKENS,
            qa_max_tokens: answerer::DEFAULT_MAX_TOKENS,
            sample_fallback: false,
        }
    }
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a row source. Sources are queried in the order added.
    pub fn source(mut self, source: Box<dyn RowSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Sets the language model used by the relevance and Q&A stages.
    pub fn client(mut self, client: Arc<dyn LanguageModel>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn relevance_max_tokens(mut self, max_tokens: u32) -> Self {
        self.relevance_max_tokens = max_tokens;
        self
    }

    pub fn qa_max_tokens(mut self, max_tokens: u32) -> Self {
        self.qa_max_tokens = max_tokens;
        self
    }

    /// Serve the built-in demo notes when retrieval comes back empty.
    pub fn sample_fallback(mut self, enabled: bool) -> Self {
        self.sample_fallback = enabled;
        self
    }

    #[must_use]
    pub fn build(self) -> Pipeline {
        let classifier = self.client.as_ref().map(|client| {
            relevance::RelevanceClassifierBuilder::new()
                .client(Arc::clone(client))
                .max_tokens(self.relevance_max_tokens)
                .build()
        });
        let answerer = self.client.as_ref().map(|client| {
            answerer::EvidenceAnswererBuilder::new()
                .client(Arc::clone(client))
                .max_tokens(self.qa_max_tokens)
                .build()
        });

        Pipeline {
            sources: self.sources,
            classifier,
            answerer,
            sample_fallback: self.sample_fallback,
        }
    }
}

/// The note-processing pipeline.
pub struct Pipeline {
    sources: Vec<Box<dyn RowSource>>,
    classifier: Option<RelevanceClassifier>,
    answerer: Option<EvidenceAnswerer>,
    sample_fallback: bool,
}

impl Pipeline {
    /// Queries every source and merges the rows into unique, date-sorted notes.
    ///
    /// A failing source contributes nothing. Missing authors are filled from
    /// the query's author pattern. Sample notes are served only when at
    /// least one source answered and none had matching rows.
    pub fn retrieve(&self, query: &NoteQuery) -> Vec<Note> {
        let mut any_succeeded = false;
        let sets = self
            .sources
            .iter()
            .filter_map(|source| {
                let set = fetch_result_set(source.as_ref(), query)?;
                any_succeeded = true;
                Some(set)
            })
            .collect();
        let notes = aggregate(sets);

        if notes.is_empty() && any_succeeded && self.sample_fallback {
            info!(
                author = %query.author_pattern,
                start = %query.months.first_day(),
                end = %query.months.last_day(),
                "no notes found, serving sample notes"
            );
            return aggregate(fetch_result_set(&SampleSource, query).into_iter().collect());
        }

        info!(count = notes.len(), "retrieved notes");
        notes
    }

    /// Regenerates clean content for every note.
    pub fn sanitize(&self, notes: Vec<Note>) -> Vec<Note> {
        sanitize_notes(notes)
    }

    /// Keeps sanitized notes relevant to the project; without a model, keeps all.
    pub fn filter_relevant(&self, notes: &[Note], project_description: &str) -> Vec<Note> {
        match &self.classifier {
            Some(classifier) => classifier.filter_relevant(notes, project_description),
            None => {
                warn!("no language model configured, skipping relevance filtering");
                sanitize_notes(notes.to_vec())
            }
        }
    }

    /// Answers every question for every note; without a model, all placeholders.
    pub fn answer_questions<Q: AsRef<str>>(&self, notes: &[Note], questions: &[Q]) -> Vec<QaResult> {
        match &self.answerer {
            Some(answerer) => answerer.answer_questions(notes, questions),
            None => {
                warn!("no language model configured, returning placeholder answers");
                notes
                    .iter()
                    .map(|note| QaResult::placeholder(note, questions.len()))
                    .collect()
            }
        }
    }

    /// Runs the requested stages in order: retrieve, sanitize, filter, answer.
    pub fn run(&self, request: &PipelineRequest) -> PipelineReport {
        let notes = match &request.input {
            PipelineInput::Query(query) => self.retrieve(query),
            PipelineInput::Notes(notes) => notes.clone(),
        };
        let retrieved = notes.len();
        let notes = self.sanitize(notes);

        let notes = match request
            .project_description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
        {
            Some(project) => self.filter_relevant(&notes, project),
            None => notes,
        };

        let results = if request.questions.is_empty() {
            Vec::new()
        } else {
            self.answer_questions(&notes, &request.questions)
        };

        PipelineReport {
            retrieved,
            notes,
            results,
        }
    }
}

/// Fetches one source's rows, or `None` (logged) when the source fails.
fn fetch_result_set(source: &dyn RowSource, query: &NoteQuery) -> Option<ResultSet> {
    match source.fetch(query) {
        Ok(rows) => Some(ResultSet::new(
            source.key(),
            rows.into_iter()
                .map(|row| row.with_default_author(&query.author_pattern))
                .collect(),
        )),
        Err(e) => {
            warn!(source = source.key(), error = %e, "row source failed, skipping");
            None
        }
    }
}
