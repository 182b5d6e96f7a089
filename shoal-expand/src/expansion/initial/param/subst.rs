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

//! Parameter expansion pattern substitution (`${P/pat/rep}`)
//!
//! The unanchored form replaces the leftmost-longest match, or every
//! non-overlapping match with `${P//pat/rep}`. The `/#` and `/%` forms
//! anchor the pattern to the beginning or end of the value. Pattern and
//! replacement are both expanded words.

use super::super::super::Error;
use super::super::super::attr_fnmatch::{apply_escapes, config_from_options, to_pattern_chars};
use super::Env;
use super::Expand;
use shoal_env::variable::Value::{self, Array, Scalar};
use shoal_fnmatch::Pattern;
use shoal_syntax::syntax::{Subst, SubstAnchor};

/// Applies the substitution modifier to the value.
pub fn apply(env: &mut Env<'_>, subst: &Subst, value: &mut Value) -> Result<(), Error> {
    let expansion = subst.pattern.units.expand(env)?;
    let mut pattern = expansion.ifs_join(&env.inner.variables);
    apply_escapes(&mut pattern);

    let config = config_from_options(&env.inner.options);
    let pattern = match Pattern::parse_with_config(to_pattern_chars(&pattern), config) {
        Ok(pattern) => pattern,
        // A broken pattern is treated as one that matches nothing.
        Err(_error) => return Ok(()),
    };

    let replacement = super::super::expand_to_string(env, &subst.replacement)?;

    let replace_one =
        |s: &mut String| *s = replace(s, &pattern, &replacement, subst.all, subst.anchor);
    match value {
        Scalar(s) => replace_one(s),
        Array(array) => array.iter_mut().for_each(replace_one),
    }
    Ok(())
}

fn replace(
    s: &str,
    pattern: &Pattern,
    replacement: &str,
    all: bool,
    anchor: SubstAnchor,
) -> String {
    match anchor {
        SubstAnchor::Prefix => match pattern.match_prefix(s, true) {
            Some(n) => format!("{replacement}{}", &s[n..]),
            None => s.to_string(),
        },
        SubstAnchor::Suffix => match pattern.match_suffix(s, true) {
            Some(n) => format!("{}{replacement}", &s[..s.len() - n]),
            None => s.to_string(),
        },
        SubstAnchor::Unanchored => {
            let mut result = String::with_capacity(s.len());
            let mut rest = s;
            loop {
                match pattern.match_prefix(rest, true) {
                    Some(n) => {
                        result.push_str(replacement);
                        rest = &rest[n..];
                        if !all {
                            result.push_str(rest);
                            return result;
                        }
                    }
                    None => match rest.chars().next() {
                        Some(c) => {
                            result.push(c);
                            rest = &rest[c.len_utf8()..];
                        }
                        None => return result,
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subst(source: &str) -> Subst {
        use shoal_syntax::syntax::{Modifier, TextUnit, WordUnit};
        let word: shoal_syntax::syntax::Word = source.parse().unwrap();
        match word.units.into_iter().next() {
            Some(WordUnit::Unquoted(TextUnit::BracedParam(braced))) => match braced.modifier {
                Modifier::Subst(subst) => subst,
                other => panic!("not a subst: {other:?}"),
            },
            other => panic!("not a braced param: {other:?}"),
        }
    }

    fn apply_to(value: &str, source: &str) -> String {
        let mut env = shoal_env::Env::new_virtual();
        let mut env = Env::new(&mut env);
        let mut value = Value::scalar(value);
        apply(&mut env, &subst(source), &mut value).unwrap();
        match value {
            Scalar(s) => s,
            other => panic!("unexpected value: {other:?}"),
        }
    }

    #[test]
    fn replace_first_match() {
        assert_eq!(apply_to("banana", "${x/an/AN}"), "bANana");
        assert_eq!(apply_to("banana", "${x/z/Z}"), "banana");
    }

    #[test]
    fn replace_is_leftmost_longest() {
        assert_eq!(apply_to("banana", "${x/a*n/-}"), "b-a");
    }

    #[test]
    fn replace_all_matches() {
        assert_eq!(apply_to("banana", "${x//an/AN}"), "bANANa");
        assert_eq!(apply_to("aaa", "${x//a/b}"), "bbb");
    }

    #[test]
    fn empty_replacement() {
        assert_eq!(apply_to("banana", "${x//an}"), "ba");
    }

    #[test]
    fn anchored_to_prefix() {
        assert_eq!(apply_to("banana", "${x/#ba/BA}"), "BAnana");
        assert_eq!(apply_to("banana", "${x/#na/NA}"), "banana");
    }

    #[test]
    fn anchored_to_suffix() {
        assert_eq!(apply_to("banana", "${x/%na/NA}"), "banaNA");
        assert_eq!(apply_to("banana", "${x/%ba/BA}"), "banana");
    }

    #[test]
    fn applies_to_each_array_element() {
        let mut env = shoal_env::Env::new_virtual();
        let mut env = Env::new(&mut env);
        let mut value = Value::array(["aa", "ab"]);
        apply(&mut env, &subst("${x/a/X}"), &mut value).unwrap();
        assert_eq!(value, Value::array(["Xa", "Xb"]));
    }
}
