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

//! Initial expansion
//!
//! The initial expansion is the single left-to-right pass that performs
//! tilde expansion, parameter expansion, command substitution and
//! arithmetic expansion over the parsed word, producing a [`Phrase`] of
//! attributed characters. Field splitting, pathname expansion and quote
//! removal operate on the phrase afterwards.

use super::Error;
use super::phrase::Phrase;
use shoal_env::semantics::ExitStatus;
use shoal_syntax::syntax::{Text, Word};
use std::ops::Deref;
use std::ops::DerefMut;

pub(crate) mod arith;
pub(crate) mod command_subst;
pub(crate) mod param;
pub(crate) mod text;
pub(crate) mod tilde;
pub(crate) mod word;

/// Environment in which the initial expansion is performed
///
/// This struct extends [`shoal_env::Env`] with state that only exists
/// while one word is being expanded.
#[derive(Debug)]
pub struct Env<'a> {
    /// Main part of the environment
    pub inner: &'a mut shoal_env::Env,

    /// Exit status of the last command substitution run during this
    /// expansion
    ///
    /// `None` until a command substitution actually runs.
    pub last_command_subst_exit_status: Option<ExitStatus>,

    /// Whether the expansion result will be subjected to field splitting
    ///
    /// This flag decides how `$*` joins its fields. It is temporarily
    /// cleared while expanding the interior of double quotes.
    pub will_split: bool,

    /// Whether the word is the value of a variable assignment being
    /// expanded with quote stripping
    ///
    /// In this mode, whitespace inside single quotes is converted to
    /// single spaces.
    pub in_assignment: bool,

    /// Whether the currently expanded part is double-quoted
    ///
    /// Rather than modifying this flag manually, call
    /// [`begin_quote`](Self::begin_quote) and let the [`QuoteGuard`]
    /// restore it.
    pub is_quoted: bool,
}

impl<'a> Env<'a> {
    /// Creates a new `Env` instance.
    pub fn new(inner: &'a mut shoal_env::Env) -> Self {
        Env {
            inner,
            last_command_subst_exit_status: None,
            will_split: true,
            in_assignment: false,
            is_quoted: false,
        }
    }

    /// Sets the `is_quoted` flag and returns a guard that will restore it.
    ///
    /// Functions that expand a double quote must call this function before
    /// expanding the contents of the quote.
    pub fn begin_quote<'b>(&'b mut self) -> QuoteGuard<'b, 'a> {
        let was_quoted = self.is_quoted;
        self.is_quoted = true;
        QuoteGuard {
            env: self,
            was_quoted,
        }
    }

    /// Restores the `Env::is_quoted` flag to the original value.
    pub fn end_quote(guard: QuoteGuard<'_, '_>) {
        drop(guard)
    }
}

/// RAII-style guard for restoring the value of `Env::is_quoted`
#[must_use]
pub struct QuoteGuard<'a, 'b> {
    env: &'a mut Env<'b>,
    was_quoted: bool,
}

impl Drop for QuoteGuard<'_, '_> {
    fn drop(&mut self) {
        self.env.is_quoted = self.was_quoted;
    }
}

impl<'a> Deref for QuoteGuard<'_, 'a> {
    type Target = Env<'a>;
    fn deref(&self) -> &Env<'a> {
        self.env
    }
}

impl<'a> DerefMut for QuoteGuard<'_, 'a> {
    fn deref_mut(&mut self) -> &mut Env<'a> {
        self.env
    }
}

/// Syntactic construct that can be subjected to the initial expansion
///
/// Syntactic elements like [`TextUnit`](shoal_syntax::syntax::TextUnit)
/// and [`Word`] implement this trait to expand themselves to a
/// [`Phrase`].
pub trait Expand {
    /// Performs the initial expansion.
    fn expand(&self, env: &mut Env<'_>) -> Result<Phrase, Error>;
}

/// Expands a slice by expanding each element and joining the results.
impl<T: Expand> Expand for [T] {
    fn expand(&self, env: &mut Env<'_>) -> Result<Phrase, Error> {
        let mut result = Phrase::one_empty_field();
        for unit in self {
            let mut phrase = unit.expand(env)?;
            result.append(&mut phrase);
        }
        Ok(result)
    }
}

/// Expands a word to a plain string, without field splitting.
///
/// Used for words embedded in parameter expansion modifiers. Multiple
/// fields (from `$@` and the like) are joined by the first IFS character,
/// and quoting characters are removed.
pub(crate) fn expand_to_string(env: &mut Env<'_>, word: &Word) -> Result<String, Error> {
    let will_split = std::mem::replace(&mut env.will_split, false);
    let result = word.units.expand(env);
    env.will_split = will_split;

    let chars = result?.ifs_join(&env.inner.variables);
    Ok(to_plain_string(chars))
}

/// Expands a text to a plain string.
///
/// Used for here-document bodies and arithmetic expression content.
pub(crate) fn expand_text_to_string(env: &mut Env<'_>, text: &Text) -> Result<String, Error> {
    let will_split = std::mem::replace(&mut env.will_split, false);
    let result = text.0.expand(env);
    env.will_split = will_split;

    let chars = result?.ifs_join(&env.inner.variables);
    Ok(to_plain_string(chars))
}

fn to_plain_string(chars: Vec<super::attr::AttrChar>) -> String {
    use super::attr_strip::Strip;
    use super::quote_removal::skip_quotes;
    skip_quotes(chars).strip().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reentrant_quotes() {
        let mut env = shoal_env::Env::new_virtual();
        let mut env = Env::new(&mut env);
        assert!(!env.is_quoted);
        {
            let mut first = env.begin_quote();
            assert!(first.is_quoted);
            let second = first.begin_quote();
            assert!(second.is_quoted);
            Env::end_quote(second);
            assert!(first.is_quoted);
        }
        assert!(!env.is_quoted);
    }

    #[test]
    fn expanding_to_string_strips_quotes() {
        let mut env = shoal_env::Env::new_virtual();
        let mut env = Env::new(&mut env);
        let word: Word = r#"a"b"'c'\d"#.parse().unwrap();
        let result = expand_to_string(&mut env, &word).unwrap();
        assert_eq!(result, "abcd");
    }
}
