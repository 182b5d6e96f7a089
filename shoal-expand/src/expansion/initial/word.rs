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

//! Initial expansion of words and word units

use super::super::Error;
use super::super::ansi;
use super::super::attr::AttrChar;
use super::super::attr::Origin;
use super::Env;
use super::Expand;
use super::Phrase;
use shoal_syntax::syntax::Word;
use shoal_syntax::syntax::WordUnit::{self, *};

const SINGLE_QUOTE: AttrChar = AttrChar {
    value: '\'',
    origin: Origin::Literal,
    is_quoted: false,
    is_quoting: true,
};

/// Adds single quotes around the string.
///
/// In assignment-with-stripping mode, whitespace inside the quotes is
/// converted to single spaces.
fn single_quote(value: &str, in_assignment: bool) -> Phrase {
    let mut field = Vec::with_capacity(value.chars().count() + 2);
    field.push(SINGLE_QUOTE);
    field.extend(value.chars().map(|c| AttrChar {
        value: if in_assignment && c.is_whitespace() {
            ' '
        } else {
            c
        },
        origin: Origin::Literal,
        is_quoted: true,
        is_quoting: false,
    }));
    field.push(SINGLE_QUOTE);
    Phrase::Field(field)
}

/// Adds dollar-single-quotes around the decoded string.
fn dollar_single_quote(value: &str) -> Phrase {
    const DOLLAR: AttrChar = AttrChar {
        value: '$',
        origin: Origin::Literal,
        is_quoted: false,
        is_quoting: true,
    };
    let mut field = Vec::with_capacity(value.chars().count() + 3);
    field.push(DOLLAR);
    field.push(SINGLE_QUOTE);
    field.extend(value.chars().map(|c| AttrChar {
        value: c,
        origin: Origin::Literal,
        is_quoted: true,
        is_quoting: false,
    }));
    field.push(SINGLE_QUOTE);
    Phrase::Field(field)
}

/// Adds double quotes around each field in the phrase.
///
/// This function sets the `is_quoted` flag of the characters in the
/// phrase.
fn double_quote(phrase: &mut Phrase) {
    const QUOTE: AttrChar = AttrChar {
        value: '"',
        origin: Origin::Literal,
        is_quoted: false,
        is_quoting: true,
    };

    fn quote_field(chars: &mut Vec<AttrChar>) {
        for c in chars.iter_mut() {
            c.is_quoted = true;
        }
        chars.reserve_exact(2);
        chars.insert(0, QUOTE);
        chars.push(QUOTE);
    }

    match phrase {
        Phrase::Char(c) => {
            let is_quoted = true;
            let c = AttrChar { is_quoted, ..*c };
            *phrase = Phrase::Field(vec![QUOTE, c, QUOTE]);
        }
        Phrase::Field(chars) => quote_field(chars),
        Phrase::Full(fields) => fields.iter_mut().for_each(quote_field),
    }
}

/// Expands the word unit.
///
/// # Quotations
///
/// `SingleQuote(value)` expands to `value` surrounded by `'`. A
/// double-quoted text expands in a non-splitting context and surrounds
/// each resulting field with `"`. `DollarSingleQuote` decodes its escapes
/// and quotes the result. `DollarDoubleQuote` expands like a plain
/// double-quoted text since no message catalog is consulted.
///
/// # Tilde
///
/// `Tilde` expands to the value of `HOME`, the named user's home
/// directory, or itself; see the [`tilde`](super::tilde) module. If the
/// result would be empty, a dummy quote takes its place so the field
/// survives splitting until quote removal.
impl Expand for WordUnit {
    fn expand(&self, env: &mut Env<'_>) -> Result<Phrase, Error> {
        match self {
            Unquoted(text_unit) => text_unit.expand(env),
            SingleQuote(value) => Ok(single_quote(value, env.in_assignment)),
            DoubleQuote(text) | DollarDoubleQuote(text) => {
                let will_split = std::mem::replace(&mut env.will_split, false);
                let result = {
                    let mut env = env.begin_quote();
                    text.expand(&mut env)
                };
                env.will_split = will_split;

                let mut phrase = result?;
                double_quote(&mut phrase);
                Ok(phrase)
            }
            DollarSingleQuote(value) => Ok(dollar_single_quote(&ansi::decode(value))),
            Tilde {
                name,
                followed_by_slash,
            } => Ok(Phrase::Field(super::tilde::expand(
                name,
                *followed_by_slash,
                env.inner,
            ))),
        }
    }
}

/// Expands a word by delegating to `[WordUnit] as Expand`.
impl Expand for Word {
    #[inline]
    fn expand(&self, env: &mut Env<'_>) -> Result<Phrase, Error> {
        self.units.expand(env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_quote_char() {
        let mut phrase = Phrase::Char(AttrChar {
            value: 'C',
            origin: Origin::SoftExpansion,
            is_quoted: false,
            is_quoting: false,
        });
        double_quote(&mut phrase);
        let quote = AttrChar {
            value: '"',
            origin: Origin::Literal,
            is_quoted: false,
            is_quoting: true,
        };
        let c = AttrChar {
            value: 'C',
            origin: Origin::SoftExpansion,
            is_quoted: true,
            is_quoting: false,
        };
        assert_eq!(phrase, Phrase::Field(vec![quote, c, quote]));
    }

    #[test]
    fn double_quote_full() {
        let a = AttrChar {
            value: 'a',
            origin: Origin::HardExpansion,
            is_quoted: false,
            is_quoting: false,
        };
        let b = AttrChar { value: 'b', ..a };
        let mut phrase = Phrase::Full(vec![vec![a], vec![b]]);
        double_quote(&mut phrase);
        let quote = AttrChar {
            value: '"',
            origin: Origin::Literal,
            is_quoted: false,
            is_quoting: true,
        };
        let is_quoted = true;
        let a = AttrChar { is_quoted, ..a };
        let b = AttrChar { is_quoted, ..b };
        assert_eq!(
            phrase,
            Phrase::Full(vec![vec![quote, a, quote], vec![quote, b, quote]])
        );
    }

    #[test]
    fn unquoted_unit() {
        let mut env = shoal_env::Env::new_virtual();
        let mut env = Env::new(&mut env);
        let word: Word = "x".parse().unwrap();
        let result = word.expand(&mut env).unwrap();

        let c = AttrChar {
            value: 'x',
            origin: Origin::Literal,
            is_quoted: false,
            is_quoting: false,
        };
        assert_eq!(result, Phrase::Char(c));
    }

    #[test]
    fn empty_single_quote() {
        let result = single_quote("", false);
        let q = SINGLE_QUOTE;
        assert_eq!(result, Phrase::Field(vec![q, q]));
    }

    #[test]
    fn non_empty_single_quote() {
        let result = single_quote("do", false);
        let q = SINGLE_QUOTE;
        let d = AttrChar {
            value: 'd',
            origin: Origin::Literal,
            is_quoted: true,
            is_quoting: false,
        };
        let o = AttrChar { value: 'o', ..d };
        assert_eq!(result, Phrase::Field(vec![q, d, o, q]));
    }

    #[test]
    fn single_quote_whitespace_conversion_in_assignment() {
        let result = single_quote("a\tb\nc", true);
        let values: String = match result {
            Phrase::Field(chars) => chars.iter().map(|c| c.value).collect(),
            _ => unreachable!(),
        };
        assert_eq!(values, "'a b c'");
    }

    #[test]
    fn expand_double_quote() {
        let mut env = shoal_env::Env::new_virtual();
        let mut env = Env::new(&mut env);
        let word: Word = "\"X\"".parse().unwrap();
        let result = word.expand(&mut env).unwrap();

        let quote = AttrChar {
            value: '"',
            origin: Origin::Literal,
            is_quoted: false,
            is_quoting: true,
        };
        let x = AttrChar {
            value: 'X',
            origin: Origin::Literal,
            is_quoted: true,
            is_quoting: false,
        };
        assert_eq!(result, Phrase::Field(vec![quote, x, quote]));
        assert!(env.will_split);
    }

    #[test]
    fn expand_dollar_single_quote() {
        let mut env = shoal_env::Env::new_virtual();
        let mut env = Env::new(&mut env);
        let word: Word = r"$'a\n'".parse().unwrap();
        let result = word.expand(&mut env).unwrap();

        let dollar = AttrChar {
            value: '$',
            origin: Origin::Literal,
            is_quoted: false,
            is_quoting: true,
        };
        let quote = AttrChar {
            value: '\'',
            ..dollar
        };
        let a = AttrChar {
            value: 'a',
            origin: Origin::Literal,
            is_quoted: true,
            is_quoting: false,
        };
        let newline = AttrChar { value: '\n', ..a };
        assert_eq!(result, Phrase::Field(vec![dollar, quote, a, newline, quote]));
    }
}
