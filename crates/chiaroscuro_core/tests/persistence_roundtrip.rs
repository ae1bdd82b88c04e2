use chiaroscuro_core::db::{open_db, open_db_in_memory};
use chiaroscuro_core::{
    BlobStore, BoardConfig, BoardEvent, Column, Document, DocumentError, InteractionController,
    NotePart, PersistError, Position, SqliteBlobStore,
};
use rusqlite::Connection;
use serde_json::json;
use std::time::{Duration, Instant};

#[test]
fn board_survives_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let mut board = InteractionController::new(
            SqliteBlobStore::try_new(&conn).unwrap(),
            BoardConfig::default(),
        );
        let id = board
            .double_activate_column(Position::new(40.0, 60.0))
            .unwrap();
        board.edit_note_text(id, "the heist begins");
        board.press_anchor(id, Position::new(600.0, 60.0));
        board.pointer_move(Position::new(600.0, 85.0));
        board.pointer_release();
        board.activate_divider(Position::new(620.0, 10.0));
        board.confirm_label("Act I");
    }

    let conn = open_db(&path).unwrap();
    let board = InteractionController::open(
        SqliteBlobStore::try_new(&conn).unwrap(),
        BoardConfig::default(),
    );
    let notes = board.store().notes();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].column(), Column::Plot);
    assert_eq!(notes[0].text(), "the heist begins");
    assert_eq!(notes[0].position(), Position::new(40.0, 60.0));
    assert_eq!(notes[0].anchor_offset(), 85.0);
    assert_eq!(board.store().sections()[0].label(), "Act I");
    assert_eq!(board.store().sections()[0].offset(), 10.0);
}

#[test]
fn missing_blob_opens_as_empty_board() {
    let conn = open_db_in_memory().unwrap();
    let mut board = InteractionController::open(
        SqliteBlobStore::try_new(&conn).unwrap(),
        BoardConfig::default(),
    );
    assert!(board.store().is_empty());
    assert!(!board
        .drain_events()
        .iter()
        .any(|event| matches!(event, BoardEvent::ErrorReported(_))));
}

#[test]
fn corrupt_blob_is_reported_on_open() {
    let conn = open_db_in_memory().unwrap();
    let blobs = SqliteBlobStore::try_new(&conn).unwrap();
    blobs
        .save_blob("chiaroscuro-data", r#"{"notes": []}"#)
        .unwrap();

    let mut board = InteractionController::open(blobs, BoardConfig::default());
    assert!(board.store().is_empty());
    let events = board.drain_events();
    assert!(events.iter().any(
        |event| matches!(event, BoardEvent::ErrorReported(message) if message.contains("sections"))
    ));
}

#[test]
fn export_then_import_reproduces_semantic_fields() {
    let source_conn = open_db_in_memory().unwrap();
    let mut source = InteractionController::new(
        SqliteBlobStore::try_new(&source_conn).unwrap(),
        BoardConfig::default(),
    );
    let a = source
        .double_activate_column(Position::new(12.0, 30.0))
        .unwrap();
    source.edit_note_text(a, "plot beat");
    let b = source
        .double_activate_column(Position::new(700.0, 45.0))
        .unwrap();
    source.edit_note_text(b, "what she really wants");
    source.activate_divider(Position::new(620.0, 200.0));
    source.confirm_label("");

    let export = source.export_document().unwrap();
    assert_eq!(export.document.version, "1.0");
    assert!(!export.document.timestamp.is_empty());

    let target_conn = open_db_in_memory().unwrap();
    let mut target = InteractionController::new(
        SqliteBlobStore::try_new(&target_conn).unwrap(),
        BoardConfig::default(),
    );
    target.double_activate_column(Position::new(1.0, 1.0));
    target.import_document(&export.contents).unwrap();

    let before = source.store();
    let after = target.store();
    assert_eq!(after.notes().len(), before.notes().len());
    for (expected, actual) in before.notes().iter().zip(after.notes()) {
        assert_eq!(actual.column(), expected.column());
        assert_eq!(actual.text(), expected.text());
        assert_eq!(actual.position(), expected.position());
        assert_eq!(actual.anchor_offset(), expected.anchor_offset());
    }
    assert_eq!(after.sections()[0].label(), "Section");
    assert_eq!(after.sections()[0].offset(), 200.0);
    assert_eq!(target.focused_note(), None);
}

#[test]
fn import_without_sections_is_rejected_and_state_kept() {
    let conn = open_db_in_memory().unwrap();
    let mut board = InteractionController::new(
        SqliteBlobStore::try_new(&conn).unwrap(),
        BoardConfig::default(),
    );
    let id = board
        .double_activate_column(Position::new(5.0, 5.0))
        .unwrap();
    board.drain_events();

    let payload = json!({"notes": [{"column": "plot", "position": {"x": 0, "y": 0}, "anchorOffset": 0}]});
    let err = board.import_document(&payload.to_string()).unwrap_err();
    assert!(matches!(
        err,
        PersistError::Document(DocumentError::MissingField("sections"))
    ));
    assert_eq!(board.store().notes().len(), 1);
    assert_eq!(board.store().notes()[0].id(), id);
    assert_eq!(board.focused_note(), Some(id));
    assert!(board
        .drain_events()
        .iter()
        .any(|event| matches!(event, BoardEvent::ErrorReported(_))));
}

#[test]
fn import_accepts_legacy_browser_export() {
    let conn = open_db_in_memory().unwrap();
    let mut board = InteractionController::new(
        SqliteBlobStore::try_new(&conn).unwrap(),
        BoardConfig::default(),
    );
    let legacy = json!({
        "notes": [{
            "noteId": "note-1712345678901",
            "dotId": "dot-1712345678901",
            "lineId": "line-dot-1712345678901",
            "columnType": "plot",
            "text": "door creaks",
            "position": {"x": 80, "y": 140},
            "dotPosition": 170
        }],
        "sections": [{"id": "section-1712345678999", "position": 60, "label": "Cold open"}],
        "version": "1.0",
        "timestamp": "2024-04-05T19:21:18.901Z"
    });

    board.import_document(&legacy.to_string()).unwrap();
    let note = &board.store().notes()[0];
    assert_eq!(note.text(), "door creaks");
    assert_eq!(note.anchor_offset(), 170.0);
    assert_eq!(board.store().sections()[0].label(), "Cold open");

    let stored = SqliteBlobStore::try_new(&conn)
        .unwrap()
        .load_blob("chiaroscuro-data")
        .unwrap()
        .unwrap();
    let doc = Document::from_json(&stored).unwrap();
    assert_eq!(doc.notes[0].anchor_offset, 170.0);
}

fn reopen(conn: &Connection) -> InteractionController<SqliteBlobStore<'_>> {
    InteractionController::open(
        SqliteBlobStore::try_new(conn).unwrap(),
        BoardConfig::default(),
    )
}

#[test]
fn pointer_release_alone_persists_the_drag() {
    let conn = open_db_in_memory().unwrap();
    let mut board = reopen(&conn);
    let id = board
        .double_activate_column(Position::new(40.0, 60.0))
        .unwrap();
    assert!(reopen(&conn).store().is_empty());

    board.press_anchor(id, Position::new(600.0, 60.0));
    board.pointer_move(Position::new(600.0, 85.0));
    board.pointer_release();

    let reopened = reopen(&conn);
    assert_eq!(reopened.store().notes().len(), 1);
    assert_eq!(reopened.store().notes()[0].anchor_offset(), 85.0);
    assert_eq!(reopened.store().notes()[0].position(), Position::new(40.0, 60.0));
}

#[test]
fn deletion_is_persisted_immediately() {
    let conn = open_db_in_memory().unwrap();
    let mut board = reopen(&conn);
    let a = board
        .double_activate_column(Position::new(10.0, 10.0))
        .unwrap();
    let b = board
        .double_activate_column(Position::new(10.0, 300.0))
        .unwrap();
    board.edit_note_text(b, "kept");
    assert!(board.save());

    assert!(board.secondary_activate_note(a));

    let reopened = reopen(&conn);
    assert_eq!(reopened.store().notes().len(), 1);
    assert_eq!(reopened.store().notes()[0].text(), "kept");
}

#[test]
fn autosave_tick_writes_current_state() {
    let conn = open_db_in_memory().unwrap();
    let mut board = reopen(&conn);
    let start = Instant::now();
    assert!(!board.tick(start));

    board.double_activate_column(Position::new(700.0, 45.0));
    assert!(!board.tick(start + Duration::from_secs(10)));
    assert!(reopen(&conn).store().is_empty());

    assert!(board.tick(start + Duration::from_secs(30)));
    let reopened = reopen(&conn);
    assert_eq!(reopened.store().notes().len(), 1);
    assert_eq!(reopened.store().notes()[0].column(), Column::Subtext);
}

#[test]
fn non_finite_pointer_samples_never_reach_the_saved_board() {
    let conn = open_db_in_memory().unwrap();
    let mut board = reopen(&conn);
    let a = board
        .double_activate_column(Position::new(10.0, 10.0))
        .unwrap();
    board
        .double_activate_column(Position::new(10.0, 300.0))
        .unwrap();
    assert_eq!(board.double_activate_column(Position::new(f64::NAN, 10.0)), None);
    assert!(!board.press_anchor(a, Position::new(f64::INFINITY, 10.0)));

    assert!(board.press_note(a, Position::new(15.0, 15.0), NotePart::Body));
    board.pointer_move(Position::new(f64::INFINITY, 200.0));
    board.pointer_move(Position::new(f64::NAN, f64::NAN));
    board.pointer_move(Position::new(25.0, 35.0));
    board.pointer_release();
    assert_eq!(
        board.store().note(a).unwrap().position(),
        Position::new(20.0, 30.0)
    );

    let mut reopened = reopen(&conn);
    assert!(!reopened
        .drain_events()
        .iter()
        .any(|event| matches!(event, BoardEvent::ErrorReported(_))));
    assert_eq!(reopened.store().notes().len(), 2);
    assert!(reopened
        .store()
        .notes()
        .iter()
        .all(|note| note.position().is_finite()));
}
