use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Note, NoteId};
use crate::sentinels::NOT_APPLICABLE;

/// Verdict for one (note, question) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Yes,
    No,
    Maybe,
    /// The question does not apply, or no usable answer was obtained.
    NotApplicable,
}

impl Verdict {
    /// Parses one of the four wire literals. Anything else is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Yes" => Some(Self::Yes),
            "No" => Some(Self::No),
            "Maybe" => Some(Self::Maybe),
            NOT_APPLICABLE => Some(Self::NotApplicable),
            _ => None,
        }
    }

    /// Returns the wire literal.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Maybe => "Maybe",
            Self::NotApplicable => NOT_APPLICABLE,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw).unwrap_or(Self::NotApplicable))
    }
}

/// A verdict with its supporting quotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AnswerRecord")]
pub struct Answer {
    #[serde(rename = "answer")]
    pub verdict: Verdict,
    /// Verbatim substrings claimed to appear in the note's clean content.
    pub evidence: Vec<String>,
}

/// Wire shape of an answer; converted through `Answer::new`.
#[derive(Deserialize)]
struct AnswerRecord {
    answer: Verdict,
    #[serde(default)]
    evidence: Vec<String>,
}

impl From<AnswerRecord> for Answer {
    fn from(record: AnswerRecord) -> Self {
        Answer::new(record.answer, record.evidence)
    }
}

impl Answer {
    pub fn new(verdict: Verdict, evidence: Vec<String>) -> Self {
        // Not-applicable answers never carry evidence.
        let evidence = if verdict == Verdict::NotApplicable {
            Vec::new()
        } else {
            evidence
        };
        Self { verdict, evidence }
    }

    /// The `{"-", []}` answer used whenever nothing usable came back.
    pub fn placeholder() -> Self {
        Self {
            verdict: Verdict::NotApplicable,
            evidence: Vec::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.verdict == Verdict::NotApplicable && self.evidence.is_empty()
    }
}

/// All answers for one note, in the order the questions were submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaResult {
    pub note_id: NoteId,
    pub customer_name: String,
    pub date: String,
    pub answers: Vec<Answer>,
}

impl QaResult {
    pub fn new(note: &Note, answers: Vec<Answer>) -> Self {
        Self {
            note_id: note.id.clone(),
            customer_name: note.customer_name.clone(),
            date: note.date.clone(),
            answers,
        }
    }

    /// A result whose every answer is a placeholder.
    pub fn placeholder(note: &Note, question_count: usize) -> Self {
        Self::new(note, vec![Answer::placeholder(); question_count])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteBuilder;

    #[test]
    fn verdict_parse_accepts_only_wire_literals() {
        assert_eq!(Verdict::parse("Yes"), Some(Verdict::Yes));
        assert_eq!(Verdict::parse("No"), Some(Verdict::No));
        assert_eq!(Verdict::parse("Maybe"), Some(Verdict::Maybe));
        assert_eq!(Verdict::parse("-"), Some(Verdict::NotApplicable));
        assert_eq!(Verdict::parse("yes"), None);
        assert_eq!(Verdict::parse("Probably"), None);
    }

    #[test]
    fn not_applicable_drops_evidence() {
        let answer = Answer::new(Verdict::NotApplicable, vec!["stray".to_string()]);
        assert!(answer.evidence.is_empty());
        assert!(answer.is_placeholder());
    }

    #[test]
    fn answer_serializes_verdict_as_literal() {
        let answer = Answer::new(Verdict::Yes, vec!["quote A".to_string()]);
        let json = serde_json::to_string(&answer).unwrap();
        assert_eq!(json, r#"{"answer":"Yes","evidence":["quote A"]}"#);

        let json = serde_json::to_string(&Answer::placeholder()).unwrap();
        assert_eq!(json, r#"{"answer":"-","evidence":[]}"#);
    }

    #[test]
    fn deserialized_not_applicable_answer_has_no_evidence() {
        let answer: Answer =
            serde_json::from_str(r#"{"answer":"-","evidence":["stray"]}"#).unwrap();
        assert!(answer.is_placeholder());

        let answer: Answer = serde_json::from_str(r#"{"answer":"No"}"#).unwrap();
        assert_eq!(answer.verdict, Verdict::No);
        assert!(answer.evidence.is_empty());
    }

    #[test]
    fn qa_result_uses_camel_case_keys() {
        let note = NoteBuilder::new()
            .id("n1")
            .customer_name("Nike")
            .date("2024-01-15")
            .build();
        let result = QaResult::placeholder(&note, 2);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["noteId"], "n1");
        assert_eq!(json["customerName"], "Nike");
        assert_eq!(json["answers"].as_array().unwrap().len(), 2);
    }
}
