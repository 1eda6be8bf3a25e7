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

//! Display attributes and their packed 16-bit console form.
//!
//! Word layout: bits 0-2 foreground, bit 3 foreground intensity, bits 4-6
//! background, bit 7 background intensity, bit 14 reverse video. Color bits
//! are blue=1, green=2, red=4, which is not the SGR order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const FOREGROUND_MASK: u16 = 0x0007;
pub const FOREGROUND_INTENSITY: u16 = 0x0008;
pub const BACKGROUND_MASK: u16 = 0x0070;
pub const BACKGROUND_INTENSITY: u16 = 0x0080;
pub const REVERSE_VIDEO: u16 = 0x4000;
const BACKGROUND_SHIFT: u16 = 4;

/// Every bit an [`AnsiState`] can round-trip.
pub const DEFINED_BITS: u16 =
    FOREGROUND_MASK | FOREGROUND_INTENSITY | BACKGROUND_MASK | BACKGROUND_INTENSITY | REVERSE_VIDEO;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    /// In SGR order: index `n` is selected by code `30 + n` / `40 + n`.
    pub const ALL: [Self; 8] = [
        Self::Black,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
    ];

    pub const fn bits(self) -> u16 {
        match self {
            Self::Black => 0,
            Self::Blue => 1,
            Self::Green => 2,
            Self::Cyan => 3,
            Self::Red => 4,
            Self::Magenta => 5,
            Self::Yellow => 6,
            Self::White => 7,
        }
    }

    /// Inverse of [`bits`](Self::bits); only the low three bits are read.
    pub const fn from_bits(bits: u16) -> Self {
        match bits & FOREGROUND_MASK {
            0 => Self::Black,
            1 => Self::Blue,
            2 => Self::Green,
            3 => Self::Cyan,
            4 => Self::Red,
            5 => Self::Magenta,
            6 => Self::Yellow,
            _ => Self::White,
        }
    }

    pub fn from_sgr_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::White => "white",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color name: {0}")]
pub struct UnknownColor(String);

impl FromStr for Color {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownColor(s.to_owned()))
    }
}

/// Running text attribute: colors plus intensity and reverse flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnsiState {
    pub bold: bool,
    pub inverse: bool,
    pub color: Color,
    pub background: Color,
    pub background_bold: bool,
}

impl Default for AnsiState {
    fn default() -> Self {
        Self {
            bold: false,
            inverse: false,
            color: Color::White,
            background: Color::Black,
            background_bold: false,
        }
    }
}

impl AnsiState {
    pub const fn to_word(self) -> u16 {
        let mut word = self.color.bits() | (self.background.bits() << BACKGROUND_SHIFT);
        if self.bold {
            word |= FOREGROUND_INTENSITY;
        }
        if self.background_bold {
            word |= BACKGROUND_INTENSITY;
        }
        if self.inverse {
            word |= REVERSE_VIDEO;
        }
        word
    }

    /// Decode a packed word. Bits outside [`DEFINED_BITS`] are ignored.
    pub const fn from_word(word: u16) -> Self {
        Self {
            bold: word & FOREGROUND_INTENSITY != 0,
            inverse: word & REVERSE_VIDEO != 0,
            color: Color::from_bits(word),
            background: Color::from_bits((word & BACKGROUND_MASK) >> BACKGROUND_SHIFT),
            background_bold: word & BACKGROUND_INTENSITY != 0,
        }
    }
}

impl From<AnsiState> for u16 {
    fn from(state: AnsiState) -> Self {
        state.to_word()
    }
}

impl From<u16> for AnsiState {
    fn from(word: u16) -> Self {
        Self::from_word(word)
    }
}
