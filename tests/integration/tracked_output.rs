// =====
// TESTS: 6
// =====
//
// Tracked output integration tests.
// Validates markup, cursor arithmetic and scroll reporting end to end.

use lineedit_core::{
    AnsiState, AttributeStateMachine, Color, RecordingSink, TerminalSink, write_scrolling,
};
use pretty_assertions::assert_eq;

use crate::helpers::sample_session;

#[test]
fn prompt_redraw_position_survives_scroll() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = sample_session(dir.path());
    let mut sink = RecordingSink::new(20, 5).at(0, 4);
    session.set_prompt_origin((0, 4));

    let outcome = session.write(&mut sink, "\x01\x1b[1;32m\x02>>> \x01\x1b[0m\x02").unwrap();
    assert_eq!(outcome.scroll, 0);
    assert_eq!(outcome.cursor, (4, 4));

    sink.move_to(outcome.cursor.0, outcome.cursor.1);
    let outcome = session.write(&mut sink, &"x".repeat(36)).unwrap();
    assert_eq!(outcome.scroll, 2);
    assert_eq!(outcome.cursor, (0, 4));
    assert_eq!(session.prompt_origin(), Some((0, 2)));
}

#[test]
fn prompt_attributes_reach_the_sink() {
    let mut sink = RecordingSink::new(80, 24);
    let mut attrs = AttributeStateMachine::new(AnsiState::default());
    write_scrolling(&mut sink, "\x1b[1;32mok\x1b[0m done", &mut attrs).unwrap();
    let bright_green = AnsiState { bold: true, color: Color::Green, ..AnsiState::default() };
    assert_eq!(
        sink.records(),
        &[(bright_green.to_word(), "ok".to_owned()), (0x0007, " done".to_owned())]
    );
}

#[test]
fn exact_row_of_text_ends_on_next_row() {
    let mut sink = RecordingSink::new(12, 4);
    let mut attrs = AttributeStateMachine::new(AnsiState::default());
    let outcome = write_scrolling(&mut sink, &"=".repeat(12), &mut attrs).unwrap();
    assert_eq!(outcome.cursor, (0, 1));
    assert_eq!(outcome.scroll, 0);
}

#[test]
fn whole_screen_of_text_scrolls_once() {
    let mut sink = RecordingSink::new(12, 4);
    let mut attrs = AttributeStateMachine::new(AnsiState::default());
    let outcome = write_scrolling(&mut sink, &"=".repeat(48), &mut attrs).unwrap();
    assert_eq!(outcome.cursor, (0, 3));
    assert_eq!(outcome.scroll, 1);
}

#[test]
fn tabs_and_backspaces_mix_with_text() {
    let mut sink = RecordingSink::new(20, 4);
    let mut attrs = AttributeStateMachine::new(AnsiState::default());
    let outcome = write_scrolling(&mut sink, "ab\tcd\x08\x08\r\n\x07", &mut attrs).unwrap();
    assert_eq!(outcome.cursor, (0, 1));
    assert_eq!(sink.text(), "ab\tcd\x08\x08\r\n\x07");
}

#[test]
fn sink_reports_its_own_geometry() {
    let mut sink = RecordingSink::new(7, 3).at(6, 2);
    assert_eq!(sink.size().unwrap(), (7, 3));
    let mut attrs = AttributeStateMachine::new(AnsiState::default());
    let outcome = write_scrolling(&mut sink, "z", &mut attrs).unwrap();
    assert_eq!(outcome.cursor, (0, 2));
    assert_eq!(outcome.scroll, 1);
}
