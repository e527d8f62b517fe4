//! Merges per-source result sets into one ordered, duplicate-free list.

use std::collections::HashSet;

use tracing::debug;

use crate::models::{Note, NoteId};
use crate::source::SourceRow;

/// Rows returned by one source for one query.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub source_key: String,
    pub rows: Vec<SourceRow>,
}

impl ResultSet {
    pub fn new(source_key: impl Into<String>, rows: Vec<SourceRow>) -> Self {
        Self {
            source_key: source_key.into(),
            rows,
        }
    }
}

/// Merges result sets into unique notes sorted by date, newest first.
///
/// Sets are walked in the order given and rows in source order; a note is
/// admitted the first time its id is seen. Rows without an id are dropped.
/// Dates compare as plain strings, so they must be fixed-width ISO
/// (`YYYY-MM-DD`) to sort chronologically. Equal dates keep admission order.
///
/// # Examples
///
/// ```
/// use noteqa::aggregator::{ResultSet, aggregate};
/// use noteqa::source::SourceRow;
///
/// let row = |id: &str, date: &str| SourceRow {
///     note_id: Some(id.to_string()),
///     date: Some(date.to_string()),
///     ..SourceRow::default()
/// };
///
/// let notes = aggregate(vec![
///     ResultSet::new("a", vec![row("1", "2024-01-01"), row("2", "2024-03-01")]),
///     ResultSet::new("b", vec![row("1", "2024-01-01")]),
/// ]);
///
/// let ids: Vec<_> = notes.iter().map(|n| n.id.as_str()).collect();
/// assert_eq!(ids, vec!["2", "1"]);
/// ```
pub fn aggregate(result_sets: Vec<ResultSet>) -> Vec<Note> {
    let mut seen: HashSet<NoteId> = HashSet::new();
    let mut admitted = Vec::new();

    for set in result_sets {
        let total = set.rows.len();
        let mut missing_id = 0usize;
        let mut duplicates = 0usize;

        for row in set.rows {
            let Some(note) = row.into_note() else {
                missing_id += 1;
                continue;
            };
            if seen.insert(note.id.clone()) {
                admitted.push(note);
            } else {
                duplicates += 1;
            }
        }

        debug!(
            source = %set.source_key,
            total,
            missing_id,
            duplicates,
            "merged result set"
        );
    }

    // Stable: ties stay in admission order.
    admitted.sort_by(|a, b| b.date.cmp(&a.date));
    admitted
}
