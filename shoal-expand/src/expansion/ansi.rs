// This file is part of shoal, a POSIX-compatible command-line shell.
// Copyright (C) 2025 the shoal authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! ANSI-C string decoding
//!
//! `$'…'` strings carry a larger escape alphabet than double quotes. The
//! parser has already classified each escape as an
//! [`EscapeUnit`](shoal_syntax::syntax::EscapeUnit); this module maps the
//! units to their character values.
//!
//! The byte-valued notations (`\NNN`, `\xHH`, `\cX`) decode to the Unicode
//! scalar of the byte value, so values above 0x7F come out as the
//! corresponding U+0080..U+00FF characters.

use shoal_syntax::parser::{SyntaxError, parse_escaped_string};
use shoal_syntax::syntax::{EscapeUnit, EscapedString};

/// Decodes an escaped string to its character values.
#[must_use]
pub fn decode(string: &EscapedString) -> String {
    use EscapeUnit::*;
    string
        .0
        .iter()
        .map(|unit| match unit {
            Literal(c) => *c,
            DoubleQuote => '"',
            SingleQuote => '\'',
            Backslash => '\\',
            Question => '?',
            Alert => '\u{7}',
            Backspace => '\u{8}',
            Escape => '\u{1B}',
            FormFeed => '\u{C}',
            Newline => '\n',
            CarriageReturn => '\r',
            Tab => '\t',
            VerticalTab => '\u{B}',
            Control(value) | Octal(value) | Hex(value) => char::from(*value),
            Unicode(c) => *c,
        })
        .collect()
}

/// Parses and decodes raw `$'…'` content in one step.
///
/// This is the path `${P@E}` takes to re-read a variable's value as an
/// ANSI-C string.
pub fn decode_str(raw: &str) -> Result<String, SyntaxError> {
    Ok(decode(&parse_escaped_string(raw)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_escapes() {
        assert_eq!(decode_str(r"\a\b\e\f\n\r\t\v").unwrap(), "\u{7}\u{8}\u{1B}\u{C}\n\r\t\u{B}");
        assert_eq!(decode_str(r#"\'\"\?\\"#).unwrap(), "'\"?\\");
    }

    #[test]
    fn numeric_escapes() {
        assert_eq!(decode_str(r"\101\x42").unwrap(), "AB");
        assert_eq!(decode_str(r"あ").unwrap(), "あ");
        assert_eq!(decode_str(r"\U0001F980").unwrap(), "🦀");
    }

    #[test]
    fn control_escapes() {
        assert_eq!(decode_str(r"\ca").unwrap(), "\u{1}");
        assert_eq!(decode_str(r"\cM").unwrap(), "\r");
    }

    #[test]
    fn nul_terminates() {
        assert_eq!(decode_str(r"ab\0cd").unwrap(), "ab");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(decode_str("hello").unwrap(), "hello");
    }
}
