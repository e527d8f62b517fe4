/// Schema of the local customer-notes store.
///
/// Uses CREATE TABLE/INDEX IF NOT EXISTS for idempotent execution.
/// `note_id` is nullable on purpose: upstream exports occasionally carry
/// rows without an id, and those must be skipped at read time.
pub const INITIAL_SCHEMA: &str = r#"
-- One row per customer interaction note
CREATE TABLE IF NOT EXISTS customer_notes (
    note_id TEXT UNIQUE,
    author_name TEXT,
    created_date TEXT,
    customer_name TEXT,
    subject TEXT,
    tldr TEXT,
    description TEXT
);

-- Range scans by ISO date string
CREATE INDEX IF NOT EXISTS idx_customer_notes_date ON customer_notes(created_date);
"#;
