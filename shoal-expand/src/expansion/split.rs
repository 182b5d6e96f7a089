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

//! Field splitting
//!
//! Field splitting divides a field into smaller fields at separator
//! characters. Only unquoted characters having a `SoftExpansion`
//! [origin](Origin) can separate; everything else is ordinary substance.
//!
//! A run of whitespace separators acts as a single delimiter, and a
//! non-whitespace separator is a single delimiter regardless of adjacent
//! whitespace. Adjacent non-whitespace separators delimit empty fields,
//! and a leading or trailing non-whitespace separator produces a leading
//! or trailing empty field, while leading and trailing whitespace is
//! simply ignored.
//!
//! As a side effect, splitting removes fields that contain no characters
//! at all. A field that came from a quoted expansion keeps its quoting
//! characters until quote removal and therefore survives; a field that
//! expands to nothing at all disappears.

pub(crate) mod ifs;

pub use ifs::{Class, Ifs};

use super::attr::{AttrChar, AttrField, Origin};

/// Splits a field into multiple fields.
pub fn split(field: AttrField, ifs: &Ifs) -> Vec<AttrField> {
    let origin = field.origin;
    split_chars(field.chars, ifs)
        .into_iter()
        .map(|chars| AttrField {
            chars,
            origin: origin.clone(),
        })
        .collect()
}

/// What delimiter the splitter has just passed
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Pending {
    None,
    Whitespace,
    NonWhitespace,
}

/// Splits a string of attributed characters.
fn split_chars(chars: Vec<AttrChar>, ifs: &Ifs) -> Vec<Vec<AttrChar>> {
    let mut fields = Vec::new();
    let mut current = Vec::new();
    let mut started = false;
    let mut pending = Pending::None;

    for c in chars {
        let class = if is_separator_candidate(c) {
            ifs.classify(c.value)
        } else {
            Class::NonIfs
        };
        match class {
            Class::NonIfs => {
                started = true;
                current.push(c);
            }
            Class::IfsWhitespace => {
                if started {
                    fields.push(std::mem::take(&mut current));
                    started = false;
                    pending = Pending::Whitespace;
                }
                // leading whitespace, or whitespace adjacent to another
                // delimiter: ignored
            }
            Class::IfsNonWhitespace => {
                if started {
                    fields.push(std::mem::take(&mut current));
                    started = false;
                } else if pending != Pending::Whitespace {
                    // leading separator or one adjacent to a previous
                    // non-whitespace separator: delimits an empty field
                    fields.push(Vec::new());
                }
                pending = Pending::NonWhitespace;
            }
        }
    }

    if started {
        fields.push(current);
    } else if pending == Pending::NonWhitespace {
        // a trailing non-whitespace separator delimits an empty field
        fields.push(Vec::new());
    }

    fields
}

/// Whether the character can act as a separator at all.
fn is_separator_candidate(c: AttrChar) -> bool {
    c.origin == Origin::SoftExpansion && !c.is_quoted && !c.is_quoting
}
