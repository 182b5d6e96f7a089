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

//! Conversion of attributed characters to pattern characters
//!
//! Parameter expansion modifiers and pathname expansion compile patterns
//! from expanded words. Quoting decides the pattern semantics: a quoted
//! character matches itself literally while an unquoted one keeps its
//! special meaning. These helpers bridge [`AttrChar`] strings to the
//! [`PatternChar`] input of the pattern engine.

use super::attr::AttrChar;
use shoal_env::option::{NoCaseMatch, On, OptionSet};
use shoal_fnmatch::{Config, PatternChar};

/// Converts unquoted backslashes to quoting characters.
///
/// Sets the `is_quoting` flag of unquoted backslashes and the `is_quoted`
/// flag of their following characters. Expanded pattern words keep their
/// backslashes as ordinary characters, so this pass runs before the
/// pattern is compiled.
pub fn apply_escapes(chars: &mut [AttrChar]) {
    for j in 1..chars.len() {
        let i = j - 1;
        if chars[i].value == '\\' && !chars[i].is_quoting && !chars[i].is_quoted {
            chars[i].is_quoting = true;
            chars[j].is_quoted = true;
        }
    }
}

/// Converts attributed characters to pattern characters.
///
/// Quoting characters disappear, quoted characters become literals, and
/// the rest stay normal pattern characters.
pub fn to_pattern_chars(chars: &[AttrChar]) -> impl Iterator<Item = PatternChar> + Clone + '_ {
    chars.iter().filter_map(|c| {
        if c.is_quoting {
            None
        } else if c.is_quoted {
            Some(PatternChar::Literal(c.value))
        } else {
            Some(PatternChar::Normal(c.value))
        }
    })
}

/// Builds the pattern configuration selected by the shell options.
///
/// This covers the options that affect matching everywhere (`extglob`,
/// `nocasematch`, `globasciiranges`); pathname expansion adds its own
/// period handling on top.
#[must_use]
pub fn config_from_options(options: &OptionSet) -> Config {
    let mut config = Config::default();
    config.case_insensitive = options.get(NoCaseMatch) == On;
    config.extglob = options.get(shoal_env::option::ExtGlob) == On;
    config.ascii_ranges = options.get(shoal_env::option::GlobAsciiRanges) == On;
    config
}
