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

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use super::input::{LineBuffer, Point};
use super::search::SearchState;
use crate::error::{Error, Result};

/// Number of entries persisted when no limit is configured.
pub const DEFAULT_RETENTION_LIMIT: i64 = 100;

/// One accepted input line.
///
/// Equality and containment look at the text only; the remembered point is a
/// hint for where to put the cursor when the entry is loaded back.
#[derive(Debug, Clone, Eq)]
pub struct HistoryEntry {
    text: String,
    point: Option<usize>,
}

impl HistoryEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), point: None }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn point(&self) -> Option<usize> {
        self.point
    }

    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }

    #[must_use]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.text.starts_with(prefix)
    }
}

impl PartialEq for HistoryEntry {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl From<&LineBuffer> for HistoryEntry {
    fn from(buf: &LineBuffer) -> Self {
        Self { text: buf.text().to_owned(), point: Some(buf.point()) }
    }
}

/// Ordered log of accepted lines with a navigation cursor.
///
/// The cursor always lies in `0..=len()`; `len()` means "past the newest
/// entry", i.e. the line being typed. When `previous` first leaves that
/// position it stores the line being typed as a draft entry at the end so
/// `next`/`end` can return to it. The draft is dropped by the next `add`,
/// `clear` or `read` and is never persisted.
#[derive(Debug)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    retention_limit: Option<usize>,
    has_draft: bool,
    pub(super) search: SearchState,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::with_retention_limit(DEFAULT_RETENTION_LIMIT)
    }

    /// Store that persists at most `limit` entries; negative means unlimited.
    pub fn with_retention_limit(limit: i64) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            retention_limit: usize::try_from(limit).ok(),
            has_draft: false,
            search: SearchState::default(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor, clamped to `0..=len()`.
    pub fn set_cursor(&mut self, cursor: usize) {
        self.move_cursor(cursor.min(self.entries.len()));
    }

    /// `None` means every entry is persisted.
    #[must_use]
    pub fn retention_limit(&self) -> Option<usize> {
        self.retention_limit
    }

    pub fn set_retention_limit(&mut self, limit: i64) {
        tracing::debug!(old = ?self.retention_limit, new = limit, "set retention limit");
        self.retention_limit = usize::try_from(limit).ok();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.has_draft = false;
        self.cursor = 0;
    }

    /// Append an accepted line and move the cursor past it. Empty text is ignored.
    pub fn add(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.push_entry(HistoryEntry::new(text));
    }

    /// Like [`add`](Self::add) but keeps the buffer's point with the entry.
    pub fn add_buffer(&mut self, buf: &LineBuffer) {
        if buf.is_empty() {
            return;
        }
        self.push_entry(HistoryEntry::from(buf));
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        self.discard_draft();
        self.entries.push(entry);
        self.move_cursor(self.entries.len());
    }

    /// Add every `\n`-separated line of `text`, trailing whitespace trimmed.
    pub fn extend_from_str(&mut self, text: &str) {
        for line in text.split('\n') {
            self.add(line.trim_end());
        }
    }

    /// Entry text at the 1-based `index`. Index 0 is "no item" and yields `None`.
    pub fn get(&self, index: usize) -> Result<Option<&str>> {
        if index == 0 {
            return Ok(None);
        }
        let entry = self
            .entries
            .get(index - 1)
            .ok_or(Error::IndexOutOfRange { index, len: self.entries.len() })?;
        tracing::trace!(index, item = entry.text(), "get history item");
        Ok(Some(entry.text()))
    }

    /// Replace the entry at the 0-based `index`.
    pub fn replace(&mut self, index: usize, text: &str) -> Result<()> {
        let len = self.entries.len();
        let entry = self.entries.get_mut(index).ok_or(Error::IndexOutOfRange { index, len })?;
        *entry = HistoryEntry::new(text);
        Ok(())
    }

    /// Remove the entry at the 0-based `index`, keeping the cursor in bounds.
    pub fn remove(&mut self, index: usize) -> Result<HistoryEntry> {
        let len = self.entries.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        if self.has_draft && index == len - 1 {
            self.has_draft = false;
        }
        let removed = self.entries.remove(index);
        if self.cursor >= index {
            self.cursor = self.cursor.saturating_sub(1);
        }
        self.cursor = self.cursor.min(self.entries.len());
        Ok(removed)
    }

    /// Step to the older entry and load it into `buf`, point at end of line.
    pub fn previous(&mut self, buf: &mut LineBuffer) {
        if self.cursor == self.entries.len() {
            if self.has_draft {
                self.entries.pop();
            }
            self.entries.push(HistoryEntry::from(&*buf));
            self.has_draft = true;
            self.cursor = self.entries.len() - 1;
        }
        if self.cursor > 0 {
            self.move_cursor(self.cursor - 1);
            self.load(self.cursor, buf);
        }
    }

    /// Step to the newer entry and load it into `buf`.
    pub fn next(&mut self, buf: &mut LineBuffer) {
        if self.cursor + 1 < self.entries.len() {
            self.move_cursor(self.cursor + 1);
            self.load(self.cursor, buf);
        }
    }

    /// Jump to the oldest entry.
    pub fn beginning(&mut self, buf: &mut LineBuffer) {
        self.move_cursor(0);
        if !self.entries.is_empty() {
            self.load(0, buf);
        }
    }

    /// Jump past the newest entry, loading the newest one (the draft, if any).
    pub fn end(&mut self, buf: &mut LineBuffer) {
        self.move_cursor(self.entries.len());
        if let Some(last) = self.entries.len().checked_sub(1) {
            self.load(last, buf);
        }
    }

    /// Replace the history with the lines of `path`. Invalid UTF-8 is decoded
    /// lossily. A missing file or an I/O error leaves the history empty.
    pub fn read(&mut self, path: &Path) {
        self.clear();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                tracing::debug!("history file {} not loaded: {err}", path.display());
                return;
            }
        };
        let mut reader = BufReader::new(file);
        let mut raw = Vec::new();
        loop {
            raw.clear();
            match reader.read_until(b'\n', &mut raw) {
                Ok(0) => break,
                Ok(_) => {
                    // Undecodable bytes become U+FFFD rather than losing the file.
                    let line = String::from_utf8_lossy(&raw);
                    self.add(line.trim_end_matches(['\n', '\r']));
                }
                Err(err) => {
                    tracing::debug!("history file {} unreadable: {err}", path.display());
                    self.clear();
                    return;
                }
            }
        }
        tracing::debug!(entries = self.entries.len(), "loaded history from {}", path.display());
    }

    /// Overwrite `path` with the retained tail of the history.
    pub fn write(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        let lines = self.tail(self.retention_limit);
        write_lines(file, lines).map_err(|e| Error::io(path, e))?;
        tracing::debug!(entries = lines.len(), "wrote history to {}", path.display());
        Ok(())
    }

    /// Append the last `count` entries (capped by the retention limit) to an
    /// existing file.
    pub fn append(&self, count: usize, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(Error::HistoryFileNotFound(path.to_path_buf()));
        }
        let count = self.retention_limit.map_or(count, |limit| count.min(limit));
        let file = OpenOptions::new().append(true).open(path).map_err(|e| Error::io(path, e))?;
        let lines = self.tail(Some(count));
        write_lines(file, lines).map_err(|e| Error::io(path, e))?;
        tracing::debug!(entries = lines.len(), "appended history to {}", path.display());
        Ok(())
    }

    pub(super) fn entry(&self, index: usize) -> &HistoryEntry {
        &self.entries[index]
    }

    pub(super) fn move_cursor(&mut self, cursor: usize) {
        tracing::trace!(old = self.cursor, new = cursor, "history cursor");
        self.cursor = cursor;
    }

    fn load(&self, index: usize, buf: &mut LineBuffer) {
        buf.set_text_with_point(self.entries[index].text(), Point::EndOfLine);
    }

    fn discard_draft(&mut self) {
        if self.has_draft {
            self.entries.pop();
            self.has_draft = false;
        }
    }

    /// Last `limit` committed entries, the draft excluded.
    fn tail(&self, limit: Option<usize>) -> &[HistoryEntry] {
        let committed = if self.has_draft {
            &self.entries[..self.entries.len() - 1]
        } else {
            &self.entries[..]
        };
        let skip = limit.map_or(0, |limit| committed.len().saturating_sub(limit));
        &committed[skip..]
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn write_lines(file: File, entries: &[HistoryEntry]) -> std::io::Result<()> {
    let mut out = BufWriter::new(file);
    for entry in entries {
        out.write_all(entry.text().as_bytes())?;
        out.write_all(b"\n")?;
    }
    out.flush()
}
