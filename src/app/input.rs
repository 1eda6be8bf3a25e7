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

/// Where to place the edit point. `EndOfLine` resolves against the text the
/// buffer holds at the time the point is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Point {
    At(usize),
    EndOfLine,
}

/// The line currently being edited.
///
/// This is the buffer history navigation and search commands read from and
/// load into. The point is a char index in `0..=len`.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    text: String,
    point: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self { text: String::new(), point: 0 }
    }

    /// Buffer holding `text` with the point at end of line.
    pub fn from_text(text: &str) -> Self {
        let mut buf = Self::new();
        buf.set_text(text);
        buf
    }

    /// Buffer holding `text` with the point at `point` (clamped).
    pub fn with_point(text: &str, point: Point) -> Self {
        let mut buf = Self::from_text(text);
        buf.set_point(point);
        buf
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn point(&self) -> usize {
        self.point
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Length in chars, the unit the point is measured in.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Text between the start of the line and the point.
    #[must_use]
    pub fn text_before_point(&self) -> &str {
        &self.text[..char_to_byte_index(&self.text, self.point)]
    }

    /// Independent copy with the same text and point.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self { text: self.text.clone(), point: self.point }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.point = 0;
    }

    /// Replace the text, placing the point at the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = strip_line_breaks(text);
        self.point = self.char_len();
    }

    /// Replace the text and place the point explicitly.
    pub fn set_text_with_point(&mut self, text: &str, point: Point) {
        self.set_text(text);
        self.set_point(point);
    }

    pub fn set_point(&mut self, point: Point) {
        let len = self.char_len();
        self.point = match point {
            Point::At(p) => p.min(len),
            Point::EndOfLine => len,
        };
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' || c == '\r' {
            return;
        }
        let byte_idx = char_to_byte_index(&self.text, self.point);
        self.text.insert(byte_idx, c);
        self.point += 1;
    }

    /// Insert at the point. Line breaks are dropped: a history entry is a single line.
    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            self.insert_char(c);
        }
    }

    pub fn delete_char_before(&mut self) {
        if self.point > 0 {
            self.point -= 1;
            let byte_idx = char_to_byte_index(&self.text, self.point);
            self.text.remove(byte_idx);
        }
    }

    pub fn delete_char_after(&mut self) {
        if self.point < self.char_len() {
            let byte_idx = char_to_byte_index(&self.text, self.point);
            self.text.remove(byte_idx);
        }
    }

    pub fn move_left(&mut self) {
        if self.point > 0 {
            self.point -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.point < self.char_len() {
            self.point += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.point = 0;
    }

    pub fn move_end(&mut self) {
        self.point = self.char_len();
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a character index to a byte index within a string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

fn strip_line_breaks(s: &str) -> String {
    s.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

#[cfg(test)]
mod tests {
    // =====
    // TESTS: 24
    // =====

    use super::*;
    use pretty_assertions::assert_eq;

    // char_to_byte_index

    #[test]
    fn char_to_byte_index_ascii() {
        assert_eq!(char_to_byte_index("hello", 0), 0);
        assert_eq!(char_to_byte_index("hello", 2), 2);
        assert_eq!(char_to_byte_index("hello", 5), 5); // past end
    }

    #[test]
    fn char_to_byte_index_emoji() {
        let s = "\u{1F600}hello"; // grinning face (4 bytes) + "hello"
        assert_eq!(char_to_byte_index(s, 0), 0);
        assert_eq!(char_to_byte_index(s, 1), 4);
    }

    #[test]
    fn char_to_byte_index_empty_string() {
        assert_eq!(char_to_byte_index("", 0), 0);
        assert_eq!(char_to_byte_index("", 5), 0);
    }

    // construction

    #[test]
    fn new_creates_empty_buffer() {
        let buf = LineBuffer::new();
        assert_eq!(buf.text(), "");
        assert_eq!(buf.point(), 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn from_text_places_point_at_end() {
        let buf = LineBuffer::from_text("abc");
        assert_eq!(buf.point(), 3);
    }

    #[test]
    fn with_point_clamps() {
        let buf = LineBuffer::with_point("abc", Point::At(10));
        assert_eq!(buf.point(), 3);
        let buf = LineBuffer::with_point("abc", Point::At(1));
        assert_eq!(buf.point(), 1);
    }

    // set_text / set_point

    #[test]
    fn set_text_moves_point_to_end() {
        let mut buf = LineBuffer::with_point("old text", Point::At(2));
        buf.set_text("hello");
        assert_eq!(buf.text(), "hello");
        assert_eq!(buf.point(), 5);
    }

    #[test]
    fn set_text_drops_line_breaks() {
        let mut buf = LineBuffer::new();
        buf.set_text("a\nb\r\nc");
        assert_eq!(buf.text(), "abc");
    }

    #[test]
    fn set_point_end_of_line_sentinel() {
        let mut buf = LineBuffer::from_text("\u{4F60}\u{597D}");
        buf.move_home();
        buf.set_point(Point::EndOfLine);
        assert_eq!(buf.point(), 2);
    }

    #[test]
    fn set_text_with_point_keeps_requested_point() {
        let mut buf = LineBuffer::new();
        buf.set_text_with_point("history", Point::At(2));
        assert_eq!(buf.text(), "history");
        assert_eq!(buf.point(), 2);
    }

    // insert

    #[test]
    fn insert_char_mid_line() {
        let mut buf = LineBuffer::from_text("ac");
        buf.move_left();
        buf.insert_char('b');
        assert_eq!(buf.text(), "abc");
        assert_eq!(buf.point(), 2);
    }

    #[test]
    fn insert_char_cjk_counts_chars() {
        let mut buf = LineBuffer::new();
        buf.insert_char('\u{4F60}');
        buf.insert_char('\u{597D}');
        assert_eq!(buf.point(), 2);
        assert_eq!(buf.char_len(), 2);
    }

    #[test]
    fn insert_str_skips_newlines() {
        let mut buf = LineBuffer::new();
        buf.insert_str("ls\n-la");
        assert_eq!(buf.text(), "ls-la");
        assert_eq!(buf.point(), 5);
    }

    #[test]
    fn insert_str_empty_is_noop() {
        let mut buf = LineBuffer::with_point("ab", Point::At(1));
        buf.insert_str("");
        assert_eq!(buf.text(), "ab");
        assert_eq!(buf.point(), 1);
    }

    // delete

    #[test]
    fn backspace_mid_line() {
        let mut buf = LineBuffer::from_text("abc");
        buf.delete_char_before();
        assert_eq!(buf.text(), "ab");
        assert_eq!(buf.point(), 2);
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut buf = LineBuffer::from_text("abc");
        buf.move_home();
        buf.delete_char_before();
        assert_eq!(buf.text(), "abc");
        assert_eq!(buf.point(), 0);
    }

    #[test]
    fn delete_after_point() {
        let mut buf = LineBuffer::from_text("abc");
        buf.move_home();
        buf.delete_char_after();
        assert_eq!(buf.text(), "bc");
        assert_eq!(buf.point(), 0);
    }

    #[test]
    fn delete_after_at_end_is_noop() {
        let mut buf = LineBuffer::from_text("abc");
        buf.delete_char_after();
        assert_eq!(buf.text(), "abc");
    }

    // movement

    #[test]
    fn move_left_right_stop_at_bounds() {
        let mut buf = LineBuffer::from_text("ab");
        buf.move_right();
        assert_eq!(buf.point(), 2);
        buf.move_left();
        buf.move_left();
        buf.move_left();
        assert_eq!(buf.point(), 0);
    }

    #[test]
    fn move_home_end() {
        let mut buf = LineBuffer::from_text("hello");
        buf.move_home();
        assert_eq!(buf.point(), 0);
        buf.move_end();
        assert_eq!(buf.point(), 5);
    }

    // text_before_point / copy / clear

    #[test]
    fn text_before_point_slices_on_char_boundary() {
        let mut buf = LineBuffer::from_text("\u{1F600}ab");
        buf.move_left();
        assert_eq!(buf.text_before_point(), "\u{1F600}a");
    }

    #[test]
    fn copy_is_independent() {
        let buf = LineBuffer::from_text("abc");
        let mut other = buf.copy();
        other.insert_char('d');
        assert_eq!(buf.text(), "abc");
        assert_eq!(other.text(), "abcd");
    }

    #[test]
    fn clear_resets_text_and_point() {
        let mut buf = LineBuffer::from_text("abc");
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.point(), 0);
    }

    #[test]
    fn default_equals_new() {
        let a = LineBuffer::new();
        let b = LineBuffer::default();
        assert_eq!(a.text(), b.text());
        assert_eq!(a.point(), b.point());
    }
}
