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

//! Source location tracking
//!
//! The expansion core receives single words, so a location is a range into
//! the raw text of the word it came from. Mapping word positions back to
//! script lines is the front end's business.

use std::ops::Range;
use std::rc::Rc;

/// Position of a syntactic element in the raw word text
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Location {
    /// Raw text of the word containing the element
    pub code: Rc<str>,
    /// Byte range of the element within `code`
    pub range: Range<usize>,
}

impl Location {
    /// Creates a location covering the whole of the given text.
    ///
    /// Convenient for tests and synthesized words.
    #[must_use]
    pub fn dummy<S: Into<Rc<str>>>(code: S) -> Self {
        fn inner(code: Rc<str>) -> Location {
            let range = 0..code.len();
            Location { code, range }
        }
        inner(code.into())
    }

    /// Returns the text the location refers to.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.code[self.range.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_covers_whole_code() {
        let location = Location::dummy("echo $foo");
        assert_eq!(&*location.code, "echo $foo");
        assert_eq!(location.range, 0..9);
        assert_eq!(location.token(), "echo $foo");
    }

    #[test]
    fn token_is_a_subrange() {
        let location = Location {
            code: "a${b}c".into(),
            range: 1..5,
        };
        assert_eq!(location.token(), "${b}");
    }
}
