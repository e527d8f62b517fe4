use serde::{Deserialize, Serialize};

use super::NoteId;
use crate::sentinels::{UNKNOWN_AUTHOR, UNKNOWN_CUSTOMER};

/// One customer-interaction record.
///
/// Created at the row-source boundary (or deserialized from a fixture) and
/// read-only afterwards, except for `clean_content`, which the sanitizer
/// regenerates from `raw_content` as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Stable identifier, unique within a retrieval batch.
    #[serde(rename = "NoteID")]
    pub id: NoteId,
    /// Display name of the customer account.
    #[serde(rename = "CustomerName")]
    pub customer_name: String,
    /// Display name of the person who wrote the note.
    #[serde(rename = "ProductManagerName")]
    pub author_name: String,
    /// ISO calendar date (`YYYY-MM-DD`); only compared as a string.
    #[serde(rename = "Date")]
    pub date: String,
    /// Short subject line.
    #[serde(rename = "Subject")]
    pub subject: String,
    /// HTML-bearing body as stored at the source.
    #[serde(rename = "NoteContent")]
    pub raw_content: String,
    /// Plain-text derivative of `raw_content`; empty until sanitized.
    #[serde(rename = "CleanedNoteContent", default)]
    pub clean_content: String,
}

impl Note {
    /// Returns true once the sanitizer has populated `clean_content`.
    pub fn is_sanitized(&self) -> bool {
        !self.clean_content.is_empty()
    }
}

/// Builder for constructing `Note` instances with optional fields.
///
/// # Examples
///
/// ```
/// use noteqa::NoteBuilder;
///
/// let note = NoteBuilder::new()
///     .id("sample_001")
///     .raw_content("<p>Pilot approved</p>")
///     .build();
///
/// assert_eq!(note.id.as_str(), "sample_001");
/// assert_eq!(note.customer_name, "Unknown Customer");
/// assert!(note.clean_content.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct NoteBuilder {
    id: Option<NoteId>,
    customer_name: Option<String>,
    author_name: Option<String>,
    date: Option<String>,
    subject: Option<String>,
    raw_content: Option<String>,
    clean_content: Option<String>,
}

impl NoteBuilder {
    /// Creates a new `NoteBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the note ID.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(NoteId::new(id));
        self
    }

    /// Sets the customer name.
    pub fn customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    /// Sets the author name.
    pub fn author_name(mut self, name: impl Into<String>) -> Self {
        self.author_name = Some(name.into());
        self
    }

    /// Sets the ISO date string.
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Sets the subject line.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the raw HTML content.
    pub fn raw_content(mut self, content: impl Into<String>) -> Self {
        self.raw_content = Some(content.into());
        self
    }

    /// Sets the clean content directly (fixtures that were sanitized upstream).
    pub fn clean_content(mut self, content: impl Into<String>) -> Self {
        self.clean_content = Some(content.into());
        self
    }

    /// Builds the `Note`, substituting sentinels for missing display fields.
    ///
    /// # Panics
    ///
    /// Panics if `id` has not been set.
    pub fn build(self) -> Note {
        Note {
            id: self.id.expect("id is required"),
            customer_name: self
                .customer_name
                .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string()),
            author_name: self.author_name.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            date: self.date.unwrap_or_default(),
            subject: self.subject.unwrap_or_default(),
            raw_content: self.raw_content.unwrap_or_default(),
            clean_content: self.clean_content.unwrap_or_default(),
        }
    }
}
