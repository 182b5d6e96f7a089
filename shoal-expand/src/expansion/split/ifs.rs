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

//! IFS parser
//!
//! Field splitting partitions the separator characters of `$IFS` into
//! whitespace and non-whitespace classes, which behave differently at
//! field boundaries. The [`Ifs`] type caches that partition.

use std::borrow::Cow;

/// Type of characters with respect to field splitting
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Class {
    /// Character that is not a separator
    NonIfs,
    /// Whitespace separator
    IfsWhitespace,
    /// Separator that is not whitespace
    IfsNonWhitespace,
}

/// Extracts a subsequence of the given string containing non-whitespace
/// characters only.
fn non_whitespaces(s: &str) -> Cow<'_, str> {
    match s.find(|c: char| !c.is_whitespace()) {
        None => Cow::Borrowed(&s[0..0]),
        Some(start) => {
            let from_start = &s[start..];
            match from_start.find(char::is_whitespace) {
                None => Cow::Borrowed(from_start),
                Some(len) => {
                    let mut result = String::with_capacity(from_start.len());
                    result.push_str(&from_start[..len]);
                    result.extend(from_start[len..].chars().filter(|c| !c.is_whitespace()));
                    Cow::Owned(result)
                }
            }
        }
    }
}

/// Collection of input field separator characters
#[derive(Clone, Debug, Eq)]
pub struct Ifs<'a> {
    chars: &'a str,
    non_whitespaces: Cow<'a, str>,
}

impl<'a> Ifs<'a> {
    /// String containing the default separators: space, tab, newline.
    pub const DEFAULT: &'static str = " \t\n";

    /// Creates a new IFS consisting of the given separator characters.
    pub fn new(chars: &'a str) -> Self {
        Ifs {
            chars,
            non_whitespaces: non_whitespaces(chars),
        }
    }

    /// Creates a new IFS containing no separators.
    pub fn empty() -> Self {
        Self::new("")
    }
}

/// The default IFS contains a space, tab, and newline.
impl Default for Ifs<'_> {
    fn default() -> Self {
        Self::new(Ifs::DEFAULT)
    }
}

/// The `==` operator compares the separator strings, so two `Ifs`
/// instances containing the same separators in different orders do not
/// compare equal.
impl PartialEq for Ifs<'_> {
    #[inline]
    fn eq(&self, other: &Ifs) -> bool {
        self.chars == other.chars
    }
}

impl std::hash::Hash for Ifs<'_> {
    fn hash<H: std::hash::Hasher>(&self, hasher: &mut H) {
        self.chars.hash(hasher)
    }
}

impl Ifs<'_> {
    /// Returns the separator characters this IFS was created from.
    #[inline]
    #[must_use]
    pub fn chars(&self) -> &str {
        self.chars
    }

    /// Tests if the given character is a separator.
    #[inline]
    #[must_use]
    pub fn is_ifs(&self, c: char) -> bool {
        self.chars.contains(c)
    }

    /// Tests if the given character is a non-whitespace separator.
    #[inline]
    #[must_use]
    pub fn is_ifs_non_whitespace(&self, c: char) -> bool {
        self.non_whitespaces.contains(c)
    }

    /// Returns the splitting class of the character.
    #[must_use]
    pub fn classify(&self, c: char) -> Class {
        if self.is_ifs(c) {
            if self.is_ifs_non_whitespace(c) {
                Class::IfsNonWhitespace
            } else {
                Class::IfsWhitespace
            }
        } else {
            Class::NonIfs
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ifs() {
        let ifs = Ifs::empty();
        assert_eq!(ifs.classify(' '), Class::NonIfs);
        assert_eq!(ifs.classify('a'), Class::NonIfs);
    }

    #[test]
    fn default_ifs() {
        let ifs = Ifs::default();
        assert_eq!(ifs.classify(' '), Class::IfsWhitespace);
        assert_eq!(ifs.classify('\t'), Class::IfsWhitespace);
        assert_eq!(ifs.classify('\n'), Class::IfsWhitespace);
        assert_eq!(ifs.classify('\r'), Class::NonIfs);
        assert_eq!(ifs.classify('a'), Class::NonIfs);
    }

    #[test]
    fn mixed_ifs() {
        let ifs = Ifs::new(" :a");
        assert_eq!(ifs.classify(' '), Class::IfsWhitespace);
        assert_eq!(ifs.classify(':'), Class::IfsNonWhitespace);
        assert_eq!(ifs.classify('a'), Class::IfsNonWhitespace);
        assert_eq!(ifs.classify('b'), Class::NonIfs);
    }

    #[test]
    fn non_whitespace_extraction() {
        assert_eq!(non_whitespaces(""), "");
        assert_eq!(non_whitespaces("  \t"), "");
        assert_eq!(non_whitespaces(":;"), ":;");
        assert_eq!(non_whitespaces(" : ; "), ":;");
        assert_eq!(non_whitespaces(": :"), "::");
    }

    #[test]
    fn equality_is_order_sensitive() {
        assert_eq!(Ifs::new(" :"), Ifs::new(" :"));
        assert_ne!(Ifs::new(" :"), Ifs::new(": "));
    }
}
