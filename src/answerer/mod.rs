//! Evidence-based question answering using LLMs.
//!
//! This module provides the `EvidenceAnswerer`, which asks an LLM one
//! question per (note, question) pair and demands a strict JSON verdict with
//! verbatim quotes, plus the two-pass parser that interprets the reply.

mod evidence_answerer;
mod parse;

pub use evidence_answerer::{DEFAULT_MAX_TOKENS, EvidenceAnswerer, EvidenceAnswererBuilder};
pub use parse::{parse_answer, parse_lenient, parse_strict};
