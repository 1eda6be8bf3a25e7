// =====
// TESTS: 7
// =====
//
// History integration tests.
// Validates navigation, search and persistence driven through a session.

use lineedit_core::{Error, HistoryCommand, HistoryStore, LineBuffer, Point};
use pretty_assertions::assert_eq;

use crate::helpers::{SAMPLE, sample_session};

// --- Persistence ---

#[test]
fn save_then_load_restores_history() {
    let dir = tempfile::tempdir().unwrap();
    let session = sample_session(dir.path());
    session.save_history().unwrap();

    let mut fresh = sample_session(dir.path());
    fresh.history.clear();
    assert!(fresh.history.is_empty());
    fresh.load_history();
    let texts: Vec<&str> = fresh.history.entries().map(|e| e.text()).collect();
    assert_eq!(texts, SAMPLE.to_vec());
}

#[test]
fn retention_limit_bounds_saved_entries_but_not_memory() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = sample_session(dir.path());
    session.history.set_retention_limit(3);
    session.save_history().unwrap();
    assert_eq!(session.history.len(), 6);

    session.load_history();
    assert_eq!(session.history.len(), 3);
    assert_eq!(session.history.get(1).unwrap(), Some("akca"));
}

#[test]
fn append_is_capped_by_retention_limit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");
    let mut store = HistoryStore::with_retention_limit(2);
    for line in SAMPLE {
        store.add(line);
    }
    std::fs::write(&path, "seed\n").unwrap();
    store.append(5, &path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "seed\nbbb\nako\n");
}

#[test]
fn append_without_file_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let session = sample_session(dir.path());
    let err = session.history.append(1, session.history_file()).unwrap_err();
    assert!(matches!(err, Error::HistoryFileNotFound(_)));
}

// --- Editing flow ---

#[test]
fn browse_back_then_return_to_typed_line() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = sample_session(dir.path());
    let mut buf = LineBuffer::from_text("git sta");

    for expected in ["ako", "bbb", "akca"] {
        session.dispatch(&HistoryCommand::PreviousHistory, &mut buf);
        assert_eq!(buf.text(), expected);
        assert_eq!(buf.point(), expected.len());
    }
    session.dispatch(&HistoryCommand::EndOfHistory, &mut buf);
    assert_eq!(buf.text(), "git sta");

    buf.insert_str("tus");
    session.dispatch(&HistoryCommand::AddHistory, &mut buf);
    assert_eq!(session.history.len(), 7);
    assert_eq!(session.history.get(7).unwrap(), Some("git status"));
}

#[test]
fn search_then_edit_then_accept() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = sample_session(dir.path());
    let mut buf = LineBuffer::new();

    session.dispatch(&HistoryCommand::ReverseSearch("k".to_owned()), &mut buf);
    assert_eq!(buf.text(), "ako");
    session.dispatch(&HistoryCommand::ReverseSearch("k".to_owned()), &mut buf);
    assert_eq!(buf.text(), "akca");

    buf.set_point(Point::EndOfLine);
    buf.insert_char('!');
    session.dispatch(&HistoryCommand::AddHistory, &mut buf);
    assert_eq!(session.history.get(7).unwrap(), Some("akca!"));
    assert_eq!(session.history.cursor(), 7);
}

#[test]
fn forward_search_after_beginning() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = sample_session(dir.path());
    let mut buf = LineBuffer::new();
    session.dispatch(&HistoryCommand::BeginningOfHistory, &mut buf);
    for expected in ["aaaa", "aaba", "aaca"] {
        session.dispatch(&HistoryCommand::ForwardSearch("aa".to_owned()), &mut buf);
        assert_eq!(buf.text(), expected);
    }
}
