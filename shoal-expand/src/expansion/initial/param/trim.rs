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

//! Parameter expansion trim semantics
//!
//! The trim pattern is itself expanded (through parameter expansion and
//! command substitution, but without field splitting) before it is
//! compiled. The lazy variants remove the shortest matching prefix or
//! suffix; the greedy variants remove the longest.

use super::super::super::Error;
use super::super::super::attr_fnmatch::{apply_escapes, config_from_options, to_pattern_chars};
use super::Env;
use super::Expand;
use shoal_env::variable::Value::{self, Array, Scalar};
use shoal_fnmatch::Pattern;
use shoal_syntax::syntax::Trim;
use shoal_syntax::syntax::TrimLength::{Longest, Shortest};
use shoal_syntax::syntax::TrimSide::{Prefix, Suffix};

/// Applies the trim modifier to the value.
pub fn apply(env: &mut Env<'_>, trim: &Trim, value: &mut Value) -> Result<(), Error> {
    let expansion = trim.pattern.units.expand(env)?;
    let mut pattern = expansion.ifs_join(&env.inner.variables);
    apply_escapes(&mut pattern);

    let config = config_from_options(&env.inner.options);
    let pattern = match Pattern::parse_with_config(to_pattern_chars(&pattern), config) {
        Ok(pattern) => pattern,
        // A broken pattern is treated as one that matches nothing.
        Err(_error) => return Ok(()),
    };

    let longest = trim.length == Longest;
    let trim_one = |value: &mut String| match trim.side {
        Prefix => {
            if let Some(n) = pattern.match_prefix(value, longest) {
                value.drain(..n);
            }
        }
        Suffix => {
            if let Some(n) = pattern.match_suffix(value, longest) {
                value.truncate(value.len() - n);
            }
        }
    };

    match value {
        Scalar(value) => trim_one(value),
        Array(array) => array.iter_mut().for_each(trim_one),
    }

    Ok(())
}
