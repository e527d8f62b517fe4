use crate::models::{Note, NoteId};
use crate::sentinels::{UNKNOWN_AUTHOR, UNKNOWN_CUSTOMER};

/// One raw row as returned by a source, every column nullable.
///
/// Column order is fixed: author, note id, date, customer, subject, content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRow {
    pub author_name: Option<String>,
    pub note_id: Option<String>,
    pub date: Option<String>,
    pub customer_name: Option<String>,
    pub subject: Option<String>,
    pub content: Option<String>,
}

impl SourceRow {
    /// Maps positional columns onto fields. Missing trailing columns stay `None`.
    pub fn from_columns(columns: Vec<Option<String>>) -> Self {
        let mut columns = columns.into_iter();
        let mut next = || columns.next().flatten();

        Self {
            author_name: next(),
            note_id: next(),
            date: next(),
            customer_name: next(),
            subject: next(),
            content: next(),
        }
    }

    /// Fills a missing or blank author with `author`.
    pub fn with_default_author(mut self, author: &str) -> Self {
        let missing = self
            .author_name
            .as_deref()
            .is_none_or(|name| name.trim().is_empty());
        if missing && !author.trim().is_empty() {
            self.author_name = Some(author.trim().to_string());
        }
        self
    }

    /// Converts the row into a `Note`, or `None` when it has no usable id.
    ///
    /// Null display columns become sentinels or empty strings.
    pub fn into_note(self) -> Option<Note> {
        let id = NoteId::from_column(self.note_id.as_deref())?;

        Some(Note {
            id,
            customer_name: self
                .customer_name
                .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string()),
            author_name: self
                .author_name
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            date: self.date.unwrap_or_default(),
            subject: self.subject.unwrap_or_default(),
            raw_content: self.content.unwrap_or_default(),
            clean_content: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn from_columns_maps_positionally() {
        let row = SourceRow::from_columns(vec![
            col("Ella Wang"),
            col("a01"),
            col("2024-01-15"),
            col("Nike"),
            col("Planning"),
            col("<p>Body</p>"),
        ]);

        assert_eq!(row.author_name.as_deref(), Some("Ella Wang"));
        assert_eq!(row.note_id.as_deref(), Some("a01"));
        assert_eq!(row.content.as_deref(), Some("<p>Body</p>"));
    }

    #[test]
    fn short_rows_leave_trailing_fields_empty() {
        let row = SourceRow::from_columns(vec![None, col("a01")]);
        assert_eq!(row.note_id.as_deref(), Some("a01"));
        assert_eq!(row.date, None);
        assert_eq!(row.content, None);
    }

    #[test]
    fn into_note_substitutes_sentinels() {
        let note = SourceRow::from_columns(vec![None, col("a01")])
            .into_note()
            .unwrap();

        assert_eq!(note.customer_name, UNKNOWN_CUSTOMER);
        assert_eq!(note.author_name, UNKNOWN_AUTHOR);
        assert_eq!(note.subject, "");
        assert_eq!(note.raw_content, "");
        assert_eq!(note.clean_content, "");
    }

    #[test]
    fn into_note_drops_rows_without_id() {
        assert!(SourceRow::default().into_note().is_none());

        let row = SourceRow {
            note_id: col("  "),
            ..SourceRow::default()
        };
        assert!(row.into_note().is_none());
    }

    #[test]
    fn default_author_only_fills_gaps() {
        let row = SourceRow::default().with_default_author("Ella");
        assert_eq!(row.author_name.as_deref(), Some("Ella"));

        let row = SourceRow {
            author_name: col("Ella Wang"),
            ..SourceRow::default()
        }
        .with_default_author("Ella");
        assert_eq!(row.author_name.as_deref(), Some("Ella Wang"));

        let row = SourceRow::default().with_default_author("  ");
        assert_eq!(row.author_name, None);
    }
}
