//! Turns a model reply into an `Answer`.
//!
//! Strict pass first: the reply, minus an optional code fence, must be a
//! JSON object. Only when that fails does the lenient keyword scan run.

use crate::llm::Completion;
use crate::models::{Answer, Verdict};

/// Interprets a completion. Failures and empty replies yield the placeholder.
pub fn parse_answer(completion: &Completion) -> Answer {
    match completion {
        Completion::Text(text) => parse_strict(text).unwrap_or_else(|| parse_lenient(text)),
        Completion::Empty | Completion::Failure(_) => Answer::placeholder(),
    }
}

/// Parses `{"answer": ..., "evidence": [...]}`, or `None` if the body is not a JSON object.
///
/// Unknown or missing `answer` values become not-applicable; a missing
/// `evidence` key becomes an empty list and non-string items are skipped.
pub fn parse_strict(text: &str) -> Option<Answer> {
    let body = strip_code_fence(text);
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let obj = value.as_object()?;

    let verdict = obj
        .get("answer")
        .and_then(|v| v.as_str())
        .and_then(Verdict::parse)
        .unwrap_or(Verdict::NotApplicable);

    let evidence = match obj.get("evidence") {
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(str::to_string)
            .collect(),
        Some(serde_json::Value::String(single)) if !single.is_empty() => vec![single.clone()],
        _ => Vec::new(),
    };

    Some(Answer::new(verdict, evidence))
}

/// Keyword scan used when the reply is not valid JSON.
///
/// Looks for `Yes`, then `No`, then `Maybe`; first hit wins. Evidence is
/// always empty because quotes cannot be trusted without structure.
pub fn parse_lenient(text: &str) -> Answer {
    let verdict = [Verdict::Yes, Verdict::No, Verdict::Maybe]
        .into_iter()
        .find(|v| text.contains(v.as_str()))
        .unwrap_or(Verdict::NotApplicable);

    Answer::new(verdict, Vec::new())
}

/// Removes a leading ```` ```lang ```` line and a trailing ```` ``` ````, then trims.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();

    let body = match trimmed.strip_prefix("```") {
        Some(rest) => match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        },
        None => trimmed,
    };

    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}
