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

//! Stateful core of an interactive line editor: command history with
//! incremental search, inline color markup folded into packed console
//! attributes, and cursor tracking that reports how far output scrolled.

pub mod app;
pub mod error;
pub mod ui;

pub use app::config::Config;
pub use app::history::{HistoryEntry, HistoryStore};
pub use app::input::{LineBuffer, Point};
pub use app::{HistoryCommand, Session};
pub use error::{Error, Result};
pub use ui::ansi::{AnsiRun, AttributeStateMachine, parse_color, write_color};
pub use ui::attr::{AnsiState, Color};
pub use ui::cursor::{CursorTracker, Viewport, WriteOutcome, write_scrolling};
pub use ui::sink::{CrosstermSink, RecordingSink, TerminalSink};
