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

//! Cursor and scroll tracking for text written to a bounded viewport.
//!
//! When the cursor sits on the last row, writing past it scrolls the buffer
//! and every remembered on-screen row (a prompt origin, say) moves up. The
//! tracker replays the cursor arithmetic of the terminal so callers learn how
//! many lines scrolled without asking the terminal.

use super::ansi::{AttributeStateMachine, ControlChar, Token, tokenize};
use super::sink::{TerminalSink, write_attributed};
use crate::error::{Error, Result};

const TAB_WIDTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
}

impl Viewport {
    /// Both dimensions must be non-zero.
    pub fn new(width: u16, height: u16) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyViewport { width, height });
        }
        Ok(Self { width, height })
    }

    #[must_use]
    pub fn width(self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(self) -> u16 {
        self.height
    }
}

/// What one tracked write did to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Lines the buffer scrolled.
    pub scroll: usize,
    /// Cursor after the write, `(column, row)`.
    pub cursor: (u16, u16),
    pub viewport: Viewport,
}

/// Logical cursor inside a viewport plus the scroll accumulated so far.
#[derive(Debug, Clone)]
pub struct CursorTracker {
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    scroll: usize,
}

impl CursorTracker {
    /// Start at `(x, y)`, clamped into the viewport.
    pub fn new(viewport: Viewport, (x, y): (u16, u16)) -> Self {
        let width = usize::from(viewport.width);
        let height = usize::from(viewport.height);
        Self {
            width,
            height,
            x: usize::from(x).min(width - 1),
            y: usize::from(y).min(height - 1),
            scroll: 0,
        }
    }

    #[must_use]
    pub fn position(&self) -> (u16, u16) {
        (to_u16(self.x), to_u16(self.y))
    }

    #[must_use]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Account for `n` printed characters.
    pub fn advance(&mut self, n: usize) {
        self.x += n;
        self.y += self.x / self.width;
        self.x %= self.width;
        self.settle();
    }

    pub fn control(&mut self, ctrl: ControlChar) {
        match ctrl {
            ControlChar::Newline => {
                self.x = 0;
                self.y += 1;
            }
            ControlChar::CarriageReturn => self.x = 0,
            ControlChar::Tab => {
                self.x = TAB_WIDTH * (self.x / TAB_WIDTH + 1);
                while self.x > self.width {
                    self.x -= self.width;
                    self.y += 1;
                }
            }
            ControlChar::Bell => {}
            ControlChar::Backspace => {
                if self.x > 0 {
                    self.x -= 1;
                } else if self.y > 0 {
                    self.x = self.width - 1;
                    self.y -= 1;
                }
            }
        }
        self.settle();
    }

    /// Track `text` without writing it anywhere. Escapes count as zero width.
    pub fn feed(&mut self, text: &str) {
        for token in tokenize(text) {
            match token {
                Token::Literal(chunk) => self.advance(chunk.chars().count()),
                Token::Control(ctrl) => self.control(ctrl),
                Token::Escape(_) => {}
            }
        }
    }

    /// Wrap at exactly the right edge and pin the bottom row, counting scroll.
    fn settle(&mut self) {
        if self.x == self.width {
            self.x = 0;
            self.y += 1;
        }
        if self.y >= self.height {
            self.scroll += self.y - self.height + 1;
            self.y = self.height - 1;
        }
    }

    fn outcome(&self, viewport: Viewport) -> WriteOutcome {
        WriteOutcome { scroll: self.scroll, cursor: self.position(), viewport }
    }
}

/// Write `text` to `sink` at its cursor, interpreting color escapes with
/// `attributes`, and report how far the buffer scrolled.
///
/// Size and start position are queried from the sink on every call.
pub fn write_scrolling<S: TerminalSink + ?Sized>(
    sink: &mut S,
    text: &str,
    attributes: &mut AttributeStateMachine,
) -> Result<WriteOutcome> {
    let (width, height) = sink.size().map_err(Error::Sink)?;
    let viewport = Viewport::new(width, height)?;
    let start = sink.cursor_position().map_err(Error::Sink)?;
    let mut tracker = CursorTracker::new(viewport, start);

    for token in tokenize(text) {
        match token {
            Token::Escape(params) => attributes.apply(params),
            Token::Literal(chunk) => {
                write_attributed(sink, attributes.state().to_word(), chunk).map_err(Error::Sink)?;
                tracker.advance(chunk.chars().count());
            }
            Token::Control(ctrl) => {
                write_attributed(sink, attributes.state().to_word(), ctrl.as_str())
                    .map_err(Error::Sink)?;
                tracker.control(ctrl);
            }
        }
    }
    sink.flush().map_err(Error::Sink)?;

    let outcome = tracker.outcome(viewport);
    tracing::debug!(?start, end = ?outcome.cursor, scroll = outcome.scroll, "tracked write");
    Ok(outcome)
}

fn to_u16(v: usize) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}
