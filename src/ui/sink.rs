// lineedit-core - Command history, color markup and cursor tracking for line editors
// Copyright (C) 2025  lineedit-core contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use super::attr::{AnsiState, Color};
use crossterm::QueueableCommand;
use crossterm::style::{
    self, Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use std::io::{self, Write};

/// Longest chunk handed to [`TerminalSink::write`] in one call.
pub const MAX_WRITE_CHARS: usize = 1000;

/// Where attributed text ends up.
///
/// Attributes arrive as packed console words; a sink that speaks another
/// format translates here, at the boundary.
pub trait TerminalSink {
    fn set_attribute(&mut self, word: u16) -> io::Result<()>;

    /// Write `text` at the cursor and return the number of characters written.
    fn write(&mut self, text: &str) -> io::Result<usize>;

    /// Cursor position as `(column, row)`.
    fn cursor_position(&mut self) -> io::Result<(u16, u16)>;

    /// Viewport size as `(columns, rows)`.
    fn size(&mut self) -> io::Result<(u16, u16)>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Set `word` then write `text` in chunks of at most [`MAX_WRITE_CHARS`].
pub(crate) fn write_attributed<S: TerminalSink + ?Sized>(
    sink: &mut S,
    word: u16,
    text: &str,
) -> io::Result<usize> {
    tracing::trace!(word, chunk = text, "sink write");
    sink.set_attribute(word)?;
    let mut written = 0;
    let mut rest = text;
    while !rest.is_empty() {
        let split = rest.char_indices().nth(MAX_WRITE_CHARS).map_or(rest.len(), |(i, _)| i);
        let (block, tail) = rest.split_at(split);
        written += sink.write(block)?;
        rest = tail;
    }
    Ok(written)
}

/// In-memory sink with a fixed viewport. Records every write with the
/// attribute it was made under.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    size: (u16, u16),
    cursor: (u16, u16),
    attribute: u16,
    records: Vec<(u16, String)>,
}

impl RecordingSink {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            size: (width, height),
            cursor: (0, 0),
            attribute: AnsiState::default().to_word(),
            records: Vec::new(),
        }
    }

    /// Same sink with the cursor placed at `(x, y)`.
    #[must_use]
    pub fn at(mut self, x: u16, y: u16) -> Self {
        self.cursor = (x, y);
        self
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cursor = (x, y);
    }

    #[must_use]
    pub fn records(&self) -> &[(u16, String)] {
        &self.records
    }

    /// Everything written, attributes dropped.
    #[must_use]
    pub fn text(&self) -> String {
        self.records.iter().map(|(_, text)| text.as_str()).collect()
    }
}

impl TerminalSink for RecordingSink {
    fn set_attribute(&mut self, word: u16) -> io::Result<()> {
        self.attribute = word;
        Ok(())
    }

    fn write(&mut self, text: &str) -> io::Result<usize> {
        self.records.push((self.attribute, text.to_owned()));
        Ok(text.chars().count())
    }

    fn cursor_position(&mut self) -> io::Result<(u16, u16)> {
        Ok(self.cursor)
    }

    fn size(&mut self) -> io::Result<(u16, u16)> {
        Ok(self.size)
    }
}

/// Sink writing SGR sequences through crossterm. Cursor and size come from
/// the controlling terminal.
#[derive(Debug)]
pub struct CrosstermSink<W: Write> {
    out: W,
}

impl<W: Write> CrosstermSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl CrosstermSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSink for CrosstermSink<W> {
    fn set_attribute(&mut self, word: u16) -> io::Result<()> {
        let state = AnsiState::from_word(word);
        self.out
            .queue(SetAttribute(Attribute::Reset))?
            .queue(SetForegroundColor(terminal_color(state.color, state.bold)))?
            .queue(SetBackgroundColor(terminal_color(state.background, state.background_bold)))?;
        if state.inverse {
            self.out.queue(SetAttribute(Attribute::Reverse))?;
        }
        Ok(())
    }

    fn write(&mut self, text: &str) -> io::Result<usize> {
        self.out.queue(Print(text))?;
        Ok(text.chars().count())
    }

    fn cursor_position(&mut self) -> io::Result<(u16, u16)> {
        self.out.flush()?;
        crossterm::cursor::position()
    }

    fn size(&mut self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.queue(SetAttribute(Attribute::Reset))?;
        self.out.flush()
    }
}

/// Console color plus intensity bit to the nearest 16-color terminal color.
pub fn terminal_color(color: Color, intense: bool) -> style::Color {
    match (color, intense) {
        (Color::Black, false) => style::Color::Black,
        (Color::Black, true) => style::Color::DarkGrey,
        (Color::Red, false) => style::Color::DarkRed,
        (Color::Red, true) => style::Color::Red,
        (Color::Green, false) => style::Color::DarkGreen,
        (Color::Green, true) => style::Color::Green,
        (Color::Yellow, false) => style::Color::DarkYellow,
        (Color::Yellow, true) => style::Color::Yellow,
        (Color::Blue, false) => style::Color::DarkBlue,
        (Color::Blue, true) => style::Color::Blue,
        (Color::Magenta, false) => style::Color::DarkMagenta,
        (Color::Magenta, true) => style::Color::Magenta,
        (Color::Cyan, false) => style::Color::DarkCyan,
        (Color::Cyan, true) => style::Color::Cyan,
        (Color::White, false) => style::Color::Grey,
        (Color::White, true) => style::Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn long_text_is_written_in_blocks() {
        let mut sink = RecordingSink::new(80, 24);
        let text = "x".repeat(2500);
        let written = write_attributed(&mut sink, 0x0007, &text).unwrap();
        assert_eq!(written, 2500);
        let lens: Vec<usize> = sink.records().iter().map(|(_, t)| t.len()).collect();
        assert_eq!(lens, vec![1000, 1000, 500]);
    }

    #[test]
    fn blocks_split_on_char_boundaries() {
        let mut sink = RecordingSink::new(80, 24);
        let text = "\u{4F60}".repeat(1001);
        write_attributed(&mut sink, 0x0007, &text).unwrap();
        let counts: Vec<usize> = sink.records().iter().map(|(_, t)| t.chars().count()).collect();
        assert_eq!(counts, vec![1000, 1]);
    }

    #[test]
    fn recording_sink_tags_writes_with_attribute() {
        let mut sink = RecordingSink::new(80, 24).at(3, 4);
        write_attributed(&mut sink, 0x0004, "red").unwrap();
        assert_eq!(sink.records(), &[(0x0004, "red".to_owned())]);
        assert_eq!(sink.cursor_position().unwrap(), (3, 4));
    }

    #[test]
    fn crossterm_sink_translates_word_to_sgr() {
        let mut sink = CrosstermSink::new(Vec::new());
        let word =
            AnsiState { bold: true, inverse: true, color: Color::Red, ..AnsiState::default() }
                .to_word();
        sink.set_attribute(word).unwrap();
        sink.write("hi").unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert!(out.contains("\x1b[7m"), "reverse video missing: {out:?}");
        assert!(out.ends_with("hi"));
    }

    #[test]
    fn intensity_selects_bright_variant() {
        assert_eq!(terminal_color(Color::White, false), style::Color::Grey);
        assert_eq!(terminal_color(Color::White, true), style::Color::White);
        assert_eq!(terminal_color(Color::Black, true), style::Color::DarkGrey);
    }
}
