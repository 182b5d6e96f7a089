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

//! Quote removal
//!
//! The quote removal deletes quoting characters whose duty has been
//! discharged: the surviving characters already carry their quoted-ness in
//! their attributes, so the quotes themselves can go. Running it on a word
//! that contains no quoting characters is the identity.
//!
//! There are two implementations: [`skip_quotes`] wraps an iterator of
//! `AttrChar`s with one that drops quoting characters, and
//! [`remove_quotes`] filters a mutable vector in place.
//!
//! ```
//! # use shoal_expand::expansion::attr::{AttrChar, Origin};
//! # use shoal_expand::expansion::quote_removal::skip_quotes;
//! let backslash = AttrChar {
//!     value: '\\',
//!     origin: Origin::Literal,
//!     is_quoted: false,
//!     is_quoting: true,
//! };
//! let x = AttrChar {
//!     value: 'X',
//!     origin: Origin::Literal,
//!     is_quoted: true,
//!     is_quoting: false,
//! };
//! let output: Vec<_> = skip_quotes([backslash, x]).collect();
//! assert_eq!(output, [x]);
//! ```

use super::attr::AttrChar;

/// Performs quote removal on an iterator.
///
/// This function returns an iterator that skips over quoting characters
/// from the original iterator.
pub fn skip_quotes<I>(iter: I) -> impl Iterator<Item = AttrChar>
where
    I: IntoIterator<Item = AttrChar>,
{
    iter.into_iter().filter(|c| !c.is_quoting)
}

/// Performs quote removal on a mutable vector of `AttrChar`s.
pub fn remove_quotes(chars: &mut Vec<AttrChar>) {
    chars.retain(|c| !c.is_quoting)
}

#[cfg(test)]
mod tests {
    use super::super::attr::Origin;
    use super::*;

    fn chars() -> [AttrChar; 4] {
        let a = AttrChar {
            value: 'a',
            origin: Origin::Literal,
            is_quoted: false,
            is_quoting: false,
        };
        let b = AttrChar {
            value: 'b',
            is_quoting: true,
            ..a
        };
        let c = AttrChar {
            value: 'c',
            is_quoted: true,
            ..a
        };
        let d = AttrChar {
            value: 'd',
            is_quoted: true,
            is_quoting: true,
            ..a
        };
        [a, b, c, d]
    }

    #[test]
    fn skipping_quotes() {
        let [a, b, c, d] = chars();
        let output: Vec<_> = skip_quotes([a, b, c, d]).collect();
        assert_eq!(output, [a, c]);
    }

    #[test]
    fn removing_quotes() {
        let [a, b, c, d] = chars();
        let mut chars = vec![a, b, c, d];
        remove_quotes(&mut chars);
        assert_eq!(chars, [a, c]);
    }

    #[test]
    fn quote_removal_is_idempotent() {
        let [a, _, c, _] = chars();
        let once: Vec<_> = skip_quotes([a, c]).collect();
        assert_eq!(once, [a, c]);
    }
}
