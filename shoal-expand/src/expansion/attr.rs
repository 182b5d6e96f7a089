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

//! Intermediate expansion results
//!
//! An [`AttrChar`] is a character with attributes describing how it was
//! derived in the initial expansion. The attributes decide how the later
//! steps treat the character: only unquoted characters of
//! [`SoftExpansion`](Origin::SoftExpansion) origin are subject to field
//! splitting, quoted characters never act as patterns in pathname
//! expansion, and quoting characters disappear in quote removal.
//!
//! An [`AttrField`] is a string of `AttrChar`s together with the location
//! of the originating word.

use shoal_env::semantics::Field;
use shoal_syntax::source::Location;

/// Origin of a character produced in the initial expansion
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Origin {
    /// The character appeared literally in the original word.
    Literal,

    /// The character originates from a tilde expansion or brace expansion.
    ///
    /// This kind of character is treated literally in the pathname
    /// expansion and is not subject to field splitting.
    HardExpansion,

    /// The character originates from a parameter expansion, command
    /// substitution, or arithmetic expansion.
    ///
    /// This kind of character is subject to field splitting where
    /// applicable.
    SoftExpansion,
}

/// Character with attributes describing its origin
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AttrChar {
    /// Character value
    pub value: char,
    /// Character origin
    pub origin: Origin,
    /// Whether this character is quoted by another character
    pub is_quoted: bool,
    /// Whether this is a quotation character that quotes other characters
    ///
    /// A character can be both quoting and quoted: in the word `"\$"`, the
    /// backslash quotes the dollar and is itself quoted by the
    /// double-quotes.
    pub is_quoting: bool,
}

/// String of `AttrChar`s with the location of the originating word
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttrField {
    /// Value of the field
    pub chars: Vec<AttrChar>,
    /// Location of the word this field resulted from
    pub origin: Location,
}

impl AttrField {
    /// Convenience function performing [quote
    /// removal](super::quote_removal) and [attribute
    /// stripping](super::attr_strip) at once.
    pub fn remove_quotes_and_strip(self) -> Field {
        use super::attr_strip::Strip;
        use super::quote_removal::skip_quotes;
        let value = skip_quotes(self.chars).strip().collect();
        let origin = self.origin;
        Field { value, origin }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_quotes_and_strip() {
        let quote = AttrChar {
            value: '"',
            origin: Origin::Literal,
            is_quoted: false,
            is_quoting: true,
        };
        let a = AttrChar {
            value: 'a',
            origin: Origin::Literal,
            is_quoted: true,
            is_quoting: false,
        };
        let field = AttrField {
            chars: vec![quote, a, quote],
            origin: Location::dummy("\"a\""),
        };
        let field = field.remove_quotes_and_strip();
        assert_eq!(field.value, "a");
    }
}
