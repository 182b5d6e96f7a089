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

//! Initial expansion of texts and text units

use super::super::Error;
use super::super::attr::AttrChar;
use super::super::attr::Origin;
use super::Env;
use super::Expand;
use super::Phrase;
use super::param::ParamRef;
use shoal_syntax::syntax::Modifier;
use shoal_syntax::syntax::{BackquoteUnit, Text, TextUnit};

/// Expands the text unit.
///
/// - `Literal` expands to its character value.
/// - `Backslashed` expands to two characters: a quoting backslash (`\`)
///   followed by its quoted character value.
/// - `RawParam` and `BracedParam` perform parameter expansion; see the
///   [`param`](super::param) module.
/// - `CommandSubst` and `Backquote` perform command substitution: the
///   command runs in a subshell with its standard output captured, and the
///   substitution expands to the output with trailing newlines removed.
/// - `Arith` performs arithmetic expansion: the content text is expanded
///   and the resulting expression is handed to the arithmetic evaluator.
impl Expand for TextUnit {
    fn expand(&self, env: &mut Env<'_>) -> Result<Phrase, Error> {
        match self {
            &TextUnit::Literal(value) => Ok(Phrase::Char(AttrChar {
                value,
                origin: Origin::Literal,
                is_quoted: env.is_quoted,
                is_quoting: false,
            })),
            &TextUnit::Backslashed(value) => Ok(Phrase::Field(vec![
                AttrChar {
                    value: '\\',
                    origin: Origin::Literal,
                    is_quoted: env.is_quoted,
                    is_quoting: true,
                },
                AttrChar {
                    value,
                    origin: Origin::Literal,
                    is_quoted: true,
                    is_quoting: false,
                },
            ])),
            TextUnit::RawParam { param, location } => ParamRef {
                param,
                modifier: &Modifier::None,
                location,
            }
            .expand(env),
            TextUnit::BracedParam(braced) => ParamRef::from(braced).expand(env),
            TextUnit::CommandSubst { content, location } => {
                super::command_subst::expand(env, content, location)
            }
            TextUnit::Backquote { content, location } => {
                let command = backquote_command(content);
                super::command_subst::expand_backquoted(env, &command, location)
            }
            TextUnit::Arith { content, location } => super::arith::expand(env, content, location),
        }
    }
}

/// Reduces the backslash escapes of a backquoted substitution.
fn backquote_command(content: &[BackquoteUnit]) -> String {
    content
        .iter()
        .map(|unit| match unit {
            BackquoteUnit::Literal(c) => *c,
            BackquoteUnit::Backslashed(c) => *c,
        })
        .collect()
}

/// Expands a text by delegating to `[TextUnit] as Expand`.
impl Expand for Text {
    #[inline]
    fn expand(&self, env: &mut Env<'_>) -> Result<Phrase, Error> {
        self.0.expand(env)
    }
}
