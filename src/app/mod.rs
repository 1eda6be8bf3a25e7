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

pub mod config;
pub mod history;
pub mod input;
mod search;

use crate::error::Result;
use crate::ui::attr::AnsiState;
use crate::ui::cursor::{Viewport, WriteOutcome, write_scrolling};
use crate::ui::sink::TerminalSink;
use config::Config;
use history::HistoryStore;
use input::LineBuffer;
use std::path::{Path, PathBuf};

/// Logical history commands issued by a key dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryCommand {
    PreviousHistory,
    NextHistory,
    BeginningOfHistory,
    EndOfHistory,
    ReverseSearch(String),
    ForwardSearch(String),
    HistorySearchBackward,
    HistorySearchForward,
    /// Accept the buffer into history and clear it.
    AddHistory,
}

/// One interactive editing session.
///
/// Owns everything that would otherwise be process-global: the history with
/// its search state, the default attribute colored output resets to, the last
/// viewport seen and the remembered prompt origin.
#[derive(Debug)]
pub struct Session {
    pub history: HistoryStore,
    history_file: PathBuf,
    default_attribute: AnsiState,
    viewport: Option<Viewport>,
    prompt_origin: Option<(u16, u16)>,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            history: HistoryStore::with_retention_limit(config.history_length),
            history_file: config.history_file.clone(),
            default_attribute: config.default_attribute,
            viewport: None,
            prompt_origin: None,
        }
    }

    #[must_use]
    pub fn history_file(&self) -> &Path {
        &self.history_file
    }

    #[must_use]
    pub fn default_attribute(&self) -> AnsiState {
        self.default_attribute
    }

    /// Viewport reported by the sink on the last [`write`](Self::write).
    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    #[must_use]
    pub fn prompt_origin(&self) -> Option<(u16, u16)> {
        self.prompt_origin
    }

    pub fn set_prompt_origin(&mut self, origin: (u16, u16)) {
        self.prompt_origin = Some(origin);
    }

    /// Replace the history with the session's history file.
    pub fn load_history(&mut self) {
        self.history.read(&self.history_file);
    }

    pub fn save_history(&self) -> Result<()> {
        self.history.write(&self.history_file)
    }

    pub fn dispatch(&mut self, command: &HistoryCommand, buf: &mut LineBuffer) {
        tracing::debug!(?command, "dispatch");
        match command {
            HistoryCommand::PreviousHistory => self.history.previous(buf),
            HistoryCommand::NextHistory => self.history.next(buf),
            HistoryCommand::BeginningOfHistory => self.history.beginning(buf),
            HistoryCommand::EndOfHistory => self.history.end(buf),
            HistoryCommand::ReverseSearch(query) => {
                let found = self.history.reverse_search(query);
                buf.set_text(&found);
            }
            HistoryCommand::ForwardSearch(query) => {
                let found = self.history.forward_search(query);
                buf.set_text(&found);
            }
            HistoryCommand::HistorySearchBackward => {
                *buf = self.history.history_search_backward(buf);
            }
            HistoryCommand::HistorySearchForward => {
                *buf = self.history.history_search_forward(buf);
            }
            HistoryCommand::AddHistory => {
                self.history.add_buffer(buf);
                buf.clear();
            }
        }
    }

    /// Write `text` through `sink` and shift the remembered prompt row up by
    /// however far the buffer scrolled.
    pub fn write<S: TerminalSink + ?Sized>(
        &mut self,
        sink: &mut S,
        text: &str,
    ) -> Result<WriteOutcome> {
        let mut attributes = crate::ui::ansi::AttributeStateMachine::new(self.default_attribute);
        let outcome = write_scrolling(sink, text, &mut attributes)?;
        self.viewport = Some(outcome.viewport);
        if let Some((x, y)) = self.prompt_origin {
            let shifted = y.saturating_sub(u16::try_from(outcome.scroll).unwrap_or(u16::MAX));
            self.prompt_origin = Some((x, shifted));
        }
        Ok(outcome)
    }
}
