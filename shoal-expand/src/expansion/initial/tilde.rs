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

//! Tilde expansion semantics

use super::super::attr::AttrChar;
use super::super::attr::Origin;
use shoal_env::Env;
use shoal_env::variable::HOME;
use std::borrow::Cow;

/// Computes the main result of tilde expansion.
fn expand_body<'e>(name: &str, env: &'e Env) -> Cow<'e, str> {
    if name.is_empty() {
        return Cow::Borrowed(env.variables.get_scalar(HOME).unwrap_or("~"));
    }
    match env.system.home_dir(name) {
        Some(path) => Cow::Owned(path),
        None => Cow::Owned(format!("~{name}")),
    }
}

/// Produces the final result of tilde expansion.
fn finish(mut chars: &str, followed_by_slash: bool) -> Vec<AttrChar> {
    if followed_by_slash {
        if let Some(stripped) = chars.strip_suffix('/') {
            chars = stripped;
        }
    }

    let mut attr_chars: Vec<AttrChar> = chars
        .chars()
        .map(|c| AttrChar {
            value: c,
            origin: Origin::HardExpansion,
            is_quoted: false,
            is_quoting: false,
        })
        .collect();

    if attr_chars.is_empty() {
        // a dummy quote keeps the result from removal in field splitting
        attr_chars.push(AttrChar {
            value: '"',
            origin: Origin::HardExpansion,
            is_quoted: false,
            is_quoting: true,
        });
    }

    attr_chars
}

/// Performs tilde expansion.
pub fn expand(name: &str, followed_by_slash: bool, env: &Env) -> Vec<AttrChar> {
    let chars = expand_body(name, env);
    finish(&chars, followed_by_slash)
}
