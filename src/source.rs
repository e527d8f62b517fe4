//! Row-source capability: where raw note rows come from.
//!
//! A `RowSource` turns a `NoteQuery` into positional `SourceRow`s. Rows are
//! converted into `Note`s at this boundary and nowhere else.

mod query;
mod row;
mod samples;
mod schema;
mod sqlite;

use thiserror::Error;

pub use query::{MonthRange, NoteQuery};
pub use row::SourceRow;
pub use samples::SampleSource;
pub use sqlite::SqliteSource;

/// Errors raised by row sources.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The underlying SQLite store failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The query could not be expressed (bad month, inverted range, ...).
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The source exists but cannot serve requests right now.
    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

/// A capability returning raw rows for a query.
pub trait RowSource {
    /// Short name used in logs and as the result-set key.
    fn key(&self) -> &str;

    /// Runs the query, returning rows in source order.
    fn fetch(&self, query: &NoteQuery) -> Result<Vec<SourceRow>, SourceError>;
}
