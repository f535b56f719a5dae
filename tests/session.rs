use table_loader::ingestion::LoadOptions;
use table_loader::types::SINGLE_TABLE_KEY;
use table_loader::{LoadError, Session};

#[test]
fn summary_before_any_load_is_empty_selection() {
    let err = Session::new().summary().unwrap_err();
    assert!(matches!(err, LoadError::EmptySelection));
    assert_eq!(err.to_string(), "no data is loaded to summarize");
}

#[test]
fn load_selects_the_first_table_and_records_the_source() {
    let session = Session::new()
        .load("tests/fixtures/people.csv", &LoadOptions::default())
        .unwrap();

    assert_eq!(session.active_name(), Some(SINGLE_TABLE_KEY));
    assert_eq!(
        session.source().and_then(|p| p.to_str()),
        Some("tests/fixtures/people.csv")
    );
    assert_eq!(session.active_table().unwrap().row_count(), 2);

    let summary = session.summary().unwrap();
    let columns: Vec<&str> = summary.columns.iter().map(|c| c.column.as_str()).collect();
    assert_eq!(columns, vec!["id", "score"]);
}

#[test]
fn failed_load_keeps_the_previous_snapshot() {
    let before = Session::new()
        .load("tests/fixtures/people.csv", &LoadOptions::default())
        .unwrap();

    let err = before
        .load("tests/fixtures/ragged.csv", &LoadOptions::default())
        .unwrap_err();
    assert!(matches!(err, LoadError::ParseFailure { .. }));

    let err = before
        .load("tests/fixtures/notes.txt", &LoadOptions::default())
        .unwrap_err();
    assert!(matches!(err, LoadError::UnsupportedFormat { .. }));

    // The snapshot the caller holds is untouched and still usable.
    assert_eq!(before.active_table().unwrap().row_count(), 2);
    assert!(before.summary().is_ok());
}

#[test]
fn successful_reload_replaces_the_tables() {
    let first = Session::new()
        .load("tests/fixtures/people.csv", &LoadOptions::default())
        .unwrap();
    let second = first
        .load("tests/fixtures/people_semicolon.csv", &LoadOptions::default())
        .unwrap();

    assert_eq!(second.active_table().unwrap().row_count(), 3);
    assert_eq!(first.active_table().unwrap().row_count(), 2);
    assert_ne!(first, second);
}
