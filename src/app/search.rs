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

//! Incremental and prefix search over a [`HistoryStore`].
//!
//! Incremental search (`reverse_search` / `forward_search`) looks for a
//! substring and, when called again with the same query, continues past the
//! previous match. Prefix search (`history_search_backward` /
//! `history_search_forward`) matches entries starting with the text before the
//! point and keeps its query while the caller keeps feeding back the buffer it
//! returned.

use super::history::HistoryStore;
use super::input::{LineBuffer, Point};

/// Search continuation state, owned by the store.
#[derive(Debug, Default)]
pub(super) struct SearchState {
    last_query: String,
    prefix: Option<PrefixSearch>,
}

#[derive(Debug)]
struct PrefixSearch {
    query: String,
    returned: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Backward,
    Forward,
}

impl HistoryStore {
    /// Search older entries for `query`, starting at the cursor.
    pub fn reverse_search(&mut self, query: &str) -> String {
        self.reverse_search_from(query, self.cursor())
    }

    /// Search entries `start, start-1, .., 1` for one containing `query`.
    /// Index 0 is never matched. Repeating the previous query continues one
    /// entry further back. Returns the entry under the new cursor.
    pub fn reverse_search_from(&mut self, query: &str, start: usize) -> String {
        let Some(last) = self.len().checked_sub(1) else {
            return self.finish_incremental(query, 0, None);
        };
        // A miss leaves the anchor at the unclamped start so that a repeated
        // query from past the newest entry continues at `len - 1`.
        let mut anchor = self.rfind_containing(query, start.min(last)).unwrap_or(start);
        if self.search.last_query == query && anchor > 0 {
            anchor -= 1;
            if let Some(idx) = self.rfind_containing(query, anchor.min(last)) {
                anchor = idx;
            }
        }
        self.finish_incremental(query, anchor.min(last), Some(start))
    }

    /// Search newer entries for `query`, starting at the cursor.
    pub fn forward_search(&mut self, query: &str) -> String {
        self.forward_search_from(query, self.cursor())
    }

    /// Search entries `start..len` for one containing `query`. Repeating the
    /// previous query continues one entry further forward.
    pub fn forward_search_from(&mut self, query: &str, start: usize) -> String {
        let Some(last) = self.len().checked_sub(1) else {
            return self.finish_incremental(query, 0, None);
        };
        let start = start.min(last);
        let mut anchor = self.find_containing(query, start).unwrap_or(start);
        if self.search.last_query == query && anchor < last {
            anchor += 1;
            if let Some(idx) = self.find_containing(query, anchor) {
                anchor = idx;
            }
        }
        self.finish_incremental(query, anchor, Some(start))
    }

    /// Search older entries for one starting with the text before the point.
    pub fn history_search_backward(&mut self, partial: &LineBuffer) -> LineBuffer {
        self.prefix_search(Direction::Backward, partial)
    }

    /// Search newer entries for one starting with the text before the point.
    pub fn history_search_forward(&mut self, partial: &LineBuffer) -> LineBuffer {
        self.prefix_search(Direction::Forward, partial)
    }

    fn rfind_containing(&self, query: &str, start: usize) -> Option<usize> {
        (1..=start).rev().find(|&idx| self.entry(idx).contains(query))
    }

    fn find_containing(&self, query: &str, start: usize) -> Option<usize> {
        (start..self.len()).find(|&idx| self.entry(idx).contains(query))
    }

    fn finish_incremental(&mut self, query: &str, anchor: usize, start: Option<usize>) -> String {
        self.move_cursor(anchor);
        query.clone_into(&mut self.search.last_query);
        let result =
            if self.is_empty() { String::new() } else { self.entry(anchor).text().to_owned() };
        tracing::debug!(?start, cursor = anchor, query, result = %result, "incremental search");
        result
    }

    fn prefix_search(&mut self, direction: Direction, partial: &LineBuffer) -> LineBuffer {
        let query = match &self.search.prefix {
            Some(prev) if prev.returned == partial.text() => prev.query.clone(),
            _ => partial.text_before_point().to_owned(),
        };
        let result = self.scan_prefix(direction, &query, partial);
        tracing::debug!(
            ?direction,
            query = %query,
            cursor = self.cursor(),
            result = result.text(),
            "prefix search"
        );
        self.search.prefix = Some(PrefixSearch { query, returned: result.text().to_owned() });
        result
    }

    fn scan_prefix(
        &mut self,
        direction: Direction,
        query: &str,
        partial: &LineBuffer,
    ) -> LineBuffer {
        let len = self.len();
        let origin = self.cursor();
        let mut candidate = match direction {
            Direction::Backward => origin.checked_sub(1),
            Direction::Forward => Some(origin + 1).filter(|&idx| idx < len),
        };

        while let Some(idx) = candidate {
            let entry = self.entry(idx);
            if query.is_empty() {
                let text = entry.text().to_owned();
                self.move_cursor(idx);
                return LineBuffer::with_point(&text, Point::EndOfLine);
            }
            if entry.starts_with(query) && entry.text() != partial.text() {
                let text = entry.text().to_owned();
                self.move_cursor(idx);
                return LineBuffer::with_point(&text, Point::At(partial.point()));
            }
            candidate = match direction {
                Direction::Backward => idx.checked_sub(1),
                Direction::Forward => Some(idx + 1).filter(|&next| next < len),
            };
        }

        if len == 0 {
            let point = query.chars().count().min(partial.point());
            return LineBuffer::with_point(query, Point::At(point));
        }
        if direction == Direction::Forward && query.is_empty() {
            self.move_cursor(len);
            return LineBuffer::new();
        }
        let fallback = self.entry(origin.min(len - 1));
        if !query.is_empty() && fallback.starts_with(query) {
            return LineBuffer::with_point(fallback.text(), Point::At(partial.point()));
        }
        partial.copy()
    }
}
