use anyhow::Result;
use noteqa::source::RowSource;
use noteqa::{MonthRange, NoteBuilder, NoteQuery, SqliteSource};
use tempfile::TempDir;

fn query(author: &str, start: &str, end: &str) -> Result<NoteQuery> {
    Ok(NoteQuery::new(author, MonthRange::parse(start, end)?))
}

#[test]
fn imported_notes_survive_reopening() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("notes.db");

    {
        let mut store = SqliteSource::open(&path)?;
        let note = NoteBuilder::new()
            .id("n-1")
            .customer_name("Nike")
            .author_name("Ella Park")
            .date("2024-03-31")
            .subject("Renewal")
            .raw_content("<p>Renewal confirmed.</p>")
            .build();
        assert_eq!(store.import(&[note])?, 1);
    }

    let store = SqliteSource::open(&path)?;
    let rows = store.fetch(&query("park", "2024-03", "2024-03")?)?;

    assert_eq!(rows.len(), 1);
    let note = rows.into_iter().next().and_then(|row| row.into_note());
    let note = note.expect("row should convert");
    assert_eq!(note.id.as_str(), "n-1");
    assert_eq!(note.customer_name, "Nike");
    assert_eq!(note.raw_content, "<p>Renewal confirmed.</p>");
    Ok(())
}

#[test]
fn reimporting_replaces_rows_with_same_id() -> Result<()> {
    let mut store = SqliteSource::in_memory()?;
    let first = NoteBuilder::new()
        .id("n-1")
        .author_name("Ella")
        .date("2024-01-05")
        .raw_content("first")
        .build();
    let second = NoteBuilder::new()
        .id("n-1")
        .author_name("Ella")
        .date("2024-01-05")
        .raw_content("second")
        .build();

    store.import(&[first])?;
    store.import(&[second])?;

    let rows = store.fetch(&query("Ella", "2024-01", "2024-01")?)?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].content.as_deref(), Some("second"));
    Ok(())
}

#[test]
fn wildcards_in_author_pattern_match_literally() -> Result<()> {
    let mut store = SqliteSource::in_memory()?;
    store.import(&[
        NoteBuilder::new()
            .id("a")
            .author_name("Ella Park")
            .date("2024-01-05")
            .raw_content("x")
            .build(),
        NoteBuilder::new()
            .id("b")
            .author_name("100% Ella")
            .date("2024-01-06")
            .raw_content("y")
            .build(),
    ])?;

    let rows = store.fetch(&query("%", "2024-01", "2024-01")?)?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].note_id.as_deref(), Some("b"));
    Ok(())
}

#[test]
fn range_includes_both_boundary_days() -> Result<()> {
    let mut store = SqliteSource::in_memory()?;
    store.import(&[
        NoteBuilder::new().id("first").author_name("Ella").date("2024-02-01").raw_content("x").build(),
        NoteBuilder::new().id("last").author_name("Ella").date("2024-02-29").raw_content("y").build(),
        NoteBuilder::new().id("after").author_name("Ella").date("2024-03-01").raw_content("z").build(),
    ])?;

    let rows = store.fetch(&query("Ella", "2024-02", "2024-02")?)?;
    let ids: Vec<_> = rows.iter().filter_map(|r| r.note_id.as_deref()).collect();
    assert_eq!(ids, vec!["last", "first"]);
    Ok(())
}

#[test]
fn timestamps_on_the_last_day_are_in_range() -> Result<()> {
    let mut store = SqliteSource::in_memory()?;
    store.import(&[
        NoteBuilder::new().id("late").author_name("Ella").date("2024-02-29T10:00").raw_content("x").build(),
        NoteBuilder::new().id("next").author_name("Ella").date("2024-03-01 00:05:00").raw_content("y").build(),
    ])?;

    let rows = store.fetch(&query("Ella", "2024-02", "2024-02")?)?;
    let ids: Vec<_> = rows.iter().filter_map(|r| r.note_id.as_deref()).collect();
    assert_eq!(ids, vec!["late"]);
    Ok(())
}
