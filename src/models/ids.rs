use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a customer note.
///
/// Source systems hand out string ids (CRM record ids, fixture names), so no
/// numeric interpretation is attempted. Used as the dedup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Creates a new note ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parses an optional raw column value, rejecting missing or blank ids.
    pub fn from_column(raw: Option<&str>) -> Option<Self> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Returns the underlying ID value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
