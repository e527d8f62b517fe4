use std::path::Path;

use rusqlite::{Connection, params};

use super::schema::INITIAL_SCHEMA;
use super::{NoteQuery, RowSource, SourceError, SourceRow};
use crate::models::Note;

const FETCH_SQL: &str = r#"
SELECT
    author_name,
    note_id,
    created_date,
    customer_name,
    subject,
    CASE WHEN description IS NULL THEN tldr ELSE tldr || ' ' || description END
FROM customer_notes
WHERE tldr IS NOT NULL
  AND author_name IS NOT NULL
  AND author_name LIKE '%' || ?1 || '%' ESCAPE '\'
  AND date(created_date) BETWEEN ?2 AND ?3
ORDER BY created_date DESC
"#;

/// Row source backed by a local SQLite file of customer notes.
pub struct SqliteSource {
    conn: Connection,
}

impl SqliteSource {
    /// Opens an in-memory store with the schema applied.
    pub fn in_memory() -> Result<Self, SourceError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    /// Opens (creating if needed) a file-based store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        Self::with_connection(Connection::open(path)?)
    }

    fn with_connection(conn: Connection) -> Result<Self, SourceError> {
        conn.execute_batch(INITIAL_SCHEMA)?;
        Ok(Self { conn })
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Loads notes into the store, replacing rows with the same id.
    ///
    /// The note body is stored as the TL;DR column. Returns the number of
    /// notes written.
    pub fn import(&mut self, notes: &[Note]) -> Result<usize, SourceError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO customer_notes
                 (note_id, author_name, created_date, customer_name, subject, tldr, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL)",
            )?;
            for note in notes {
                stmt.execute(params![
                    note.id.as_str(),
                    note.author_name,
                    note.date,
                    note.customer_name,
                    note.subject,
                    note.raw_content,
                ])?;
            }
        }
        tx.commit()?;
        Ok(notes.len())
    }
}

impl RowSource for SqliteSource {
    fn key(&self) -> &str {
        "sqlite"
    }

    fn fetch(&self, query: &NoteQuery) -> Result<Vec<SourceRow>, SourceError> {
        let mut stmt = self.conn.prepare(FETCH_SQL)?;
        let rows = stmt.query_map(
            params![
                escape_like(query.author_pattern.trim()),
                query.months.first_day(),
                query.months.last_day(),
            ],
            |row| {
                let columns = (0..6)
                    .map(|i| row.get::<_, Option<String>>(i))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SourceRow::from_columns(columns))
            },
        )?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}

/// Escapes LIKE wildcards so the pattern matches literally.
fn escape_like(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
