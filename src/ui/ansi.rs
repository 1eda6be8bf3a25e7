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

//! Inline color markup.
//!
//! Markup is `ESC '[' <params> 'm'` where params are `;`-separated decimals,
//! optionally wrapped in the zero-width markers `\x01` .. `\x02` that prompt
//! strings use. [`Tokens`] splits text into literals, escapes and cursor-motion
//! control characters; [`AttributeStateMachine`] folds escapes into a running
//! [`AnsiState`] and tags each literal chunk with it.

use super::attr::{AnsiState, Color};

const ESC: u8 = 0x1b;
const MARKER_START: u8 = 0x01;
const MARKER_END: u8 = 0x02;

/// Characters that move the cursor differently from a printed character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlChar {
    Newline,
    CarriageReturn,
    Tab,
    Bell,
    Backspace,
}

impl ControlChar {
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'\n' => Some(Self::Newline),
            b'\r' => Some(Self::CarriageReturn),
            b'\t' => Some(Self::Tab),
            0x07 => Some(Self::Bell),
            0x08 => Some(Self::Backspace),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newline => "\n",
            Self::CarriageReturn => "\r",
            Self::Tab => "\t",
            Self::Bell => "\u{7}",
            Self::Backspace => "\u{8}",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Literal(&'a str),
    /// A color escape; holds the raw parameter list, e.g. `"1;31"`.
    Escape(&'a str),
    Control(ControlChar),
}

/// Iterator over the [`Token`]s of a string. Literals are never empty.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    text: &'a str,
    pos: usize,
    controls: bool,
}

/// Split into literals, escapes and control characters.
pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens { text, pos: 0, controls: true }
}

/// Split on escapes only; control characters stay inside literals.
pub fn tokenize_escapes(text: &str) -> Tokens<'_> {
    Tokens { text, pos: 0, controls: false }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let bytes = self.text.as_bytes();
        if self.pos >= bytes.len() {
            return None;
        }
        if let Some((params, end)) = match_escape(bytes, self.pos) {
            self.pos = end;
            return Some(Token::Escape(&self.text[params.0..params.1]));
        }
        if self.controls
            && let Some(ctrl) = ControlChar::from_byte(bytes[self.pos])
        {
            self.pos += 1;
            return Some(Token::Control(ctrl));
        }
        let start = self.pos;
        let mut end = start + 1;
        while end < bytes.len() && !self.starts_token(bytes, end) {
            end += 1;
        }
        self.pos = end;
        Some(Token::Literal(&self.text[start..end]))
    }
}

impl Tokens<'_> {
    fn starts_token(&self, bytes: &[u8], at: usize) -> bool {
        (self.controls && ControlChar::from_byte(bytes[at]).is_some())
            || match_escape(bytes, at).is_some()
    }
}

/// Match `\x01? ESC [ [0-9;]* m \x02?` at `at`. Returns the parameter byte
/// range and the end of the match. Every byte involved is ASCII, so both
/// offsets fall on char boundaries.
fn match_escape(bytes: &[u8], at: usize) -> Option<((usize, usize), usize)> {
    let mut i = at;
    if bytes.get(i) == Some(&MARKER_START) {
        i += 1;
    }
    if bytes.get(i) != Some(&ESC) || bytes.get(i + 1) != Some(&b'[') {
        return None;
    }
    let params_start = i + 2;
    let mut j = params_start;
    while j < bytes.len() && (bytes[j].is_ascii_digit() || bytes[j] == b';') {
        j += 1;
    }
    if bytes.get(j) != Some(&b'm') {
        return None;
    }
    let mut end = j + 1;
    if bytes.get(end) == Some(&MARKER_END) {
        end += 1;
    }
    Some(((params_start, j), end))
}

/// A literal chunk and the attribute it is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnsiRun<'a> {
    pub state: AnsiState,
    pub text: &'a str,
}

/// Result of parsing one string: literal char count plus the attributed runs.
/// Concatenating the run texts gives the input with escapes removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedText<'a> {
    pub count: usize,
    pub runs: Vec<AnsiRun<'a>>,
}

/// Running display attribute driven by color escapes.
///
/// `default` is what a reset (`0`) returns to; the running state starts from
/// a seed that is usually, but not necessarily, the same.
#[derive(Debug, Clone)]
pub struct AttributeStateMachine {
    default: AnsiState,
    state: AnsiState,
}

impl AttributeStateMachine {
    pub fn new(default: AnsiState) -> Self {
        Self { default, state: default }
    }

    pub fn seeded(default: AnsiState, seed: AnsiState) -> Self {
        Self { default, state: seed }
    }

    #[must_use]
    pub fn state(&self) -> AnsiState {
        self.state
    }

    #[must_use]
    pub fn default_state(&self) -> AnsiState {
        self.default
    }

    /// Apply one escape's parameter list. Unknown parameters are ignored.
    pub fn apply(&mut self, params: &str) {
        if params == "0" {
            self.state = self.default;
            return;
        }
        for part in params.split(';') {
            match part {
                "0" => self.state = AnsiState { bold: false, ..self.default },
                "1" => self.state.bold = true,
                "7" => self.state.inverse = true,
                _ => {
                    if let Some(color) = sgr_color(part, b'3') {
                        self.state.color = color;
                    } else if let Some(color) = sgr_color(part, b'4') {
                        self.state.background = color;
                    }
                }
            }
        }
        tracing::trace!(params, word = self.state.to_word(), "attribute escape");
    }

    /// Fold the escapes of `text` into the running state and return its literal
    /// runs. State carries over to the next call.
    pub fn parse<'a>(&mut self, text: &'a str) -> ParsedText<'a> {
        let mut parsed = ParsedText { count: 0, runs: Vec::new() };
        for token in tokenize_escapes(text) {
            match token {
                Token::Escape(params) => self.apply(params),
                Token::Literal(chunk) => {
                    parsed.count += chunk.chars().count();
                    parsed.runs.push(AnsiRun { state: self.state, text: chunk });
                }
                Token::Control(ctrl) => {
                    parsed.count += 1;
                    parsed.runs.push(AnsiRun { state: self.state, text: ctrl.as_str() });
                }
            }
        }
        parsed
    }
}

/// `"30"`..`"37"` (with `tens == b'3'`) or `"40"`..`"47"` (with `tens == b'4'`).
fn sgr_color(part: &str, tens: u8) -> Option<Color> {
    match part.as_bytes() {
        [t, digit @ b'0'..=b'7'] if *t == tens => Color::from_sgr_index(usize::from(digit - b'0')),
        _ => None,
    }
}

/// Parse `text` starting from `default`: literal count and attributed runs.
pub fn write_color(text: &str, default: AnsiState) -> ParsedText<'_> {
    AttributeStateMachine::new(default).parse(text)
}

/// Like [`write_color`] but reports the packed word of each run.
pub fn parse_color(text: &str, default: AnsiState) -> (usize, Vec<u16>) {
    let parsed = write_color(text, default);
    (parsed.count, parsed.runs.iter().map(|run| run.state.to_word()).collect())
}
