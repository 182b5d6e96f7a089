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

//! Parameter expansion
//!
//! A parameter expansion names a parameter, resolves its value, and
//! optionally runs one modifier over it:
//!
//! 1. [`resolve`](resolve::resolve) maps the name to a value. Named
//!    variables come from the variable store; positional and special
//!    parameters come from the relevant parts of the environment;
//!    `${!prefix*}` resolves to the matching variable names.
//! 2. A [switch](switch) (`:-`, `:=`, `:?`, `:+` and the colon-less
//!    forms) may substitute, assign or reject the value depending on its
//!    state.
//! 3. A [trim](trim) (`#`, `##`, `%`, `%%`), [slice](slice) (`:o:l`),
//!    [substitution](subst) (`/pat/rep`) or [info](info) (`@Q` and
//!    friends) modifier transforms the value.
//!
//! The result becomes one field per value element. In a non-splitting
//! context, `$*` (and `${!prefix*}`) joins its fields with the first IFS
//! character.

use super::super::ErrorCause;
use super::super::Error;
use super::super::attr::AttrChar;
use super::super::attr::Origin;
use super::super::phrase::Phrase;
use super::Env;
use super::Expand;
use shoal_env::option::{Off, Unset};
use shoal_env::variable::Value;
use shoal_syntax::source::Location;
use shoal_syntax::syntax::{BracedParam, Modifier, Param, ParamType, SpecialParam};

pub(crate) mod info;
pub(crate) mod resolve;
pub(crate) mod slice;
pub(crate) mod subst;
pub(crate) mod switch;
pub(crate) mod trim;

pub use switch::{EmptyError, NonassignableError, ValueState};

/// Reference to a parameter expansion
pub struct ParamRef<'a> {
    pub param: &'a Param,
    pub modifier: &'a Modifier,
    pub location: &'a Location,
}

impl<'a> From<&'a BracedParam> for ParamRef<'a> {
    fn from(braced: &'a BracedParam) -> Self {
        ParamRef {
            param: &braced.param,
            modifier: &braced.modifier,
            location: &braced.location,
        }
    }
}

impl Expand for ParamRef<'_> {
    /// Performs parameter expansion.
    fn expand(&self, env: &mut Env<'_>) -> Result<Phrase, Error> {
        // Lookup //
        let mut value = resolve::resolve(self.param, env);

        // Switch //
        if let Modifier::Switch(switch) = self.modifier {
            if let Some(phrase) =
                switch::apply(env, switch, self.param, &mut value, self.location)?
            {
                return Ok(phrase);
            }
        } else if value.is_none() && env.inner.options.get(Unset) == Off {
            return Err(Error {
                cause: ErrorCause::UnsetParameter {
                    name: self.param.id.clone(),
                },
                location: self.location.clone(),
            });
        }

        // Other modifiers //
        match self.modifier {
            Modifier::None | Modifier::Switch(_) => (),

            Modifier::Length => match self.param.r#type {
                // ${#@} and ${#*} count the positional parameters.
                ParamType::Special(SpecialParam::At | SpecialParam::Asterisk) => {
                    let count = env.inner.variables.positional_params().count();
                    value = Some(Value::scalar(count.to_string()));
                }
                _ => match &mut value {
                    None => value = Some(Value::scalar("0")),
                    Some(Value::Scalar(v)) => to_length(v),
                    Some(Value::Array(vs)) => vs.iter_mut().for_each(to_length),
                },
            },

            Modifier::Trim(trim) => {
                if let Some(value) = &mut value {
                    trim::apply(env, trim, value)?
                }
            }

            Modifier::Slice(slice) => slice::apply(env, slice, &mut value)?,

            Modifier::Subst(subst) => {
                if let Some(value) = &mut value {
                    subst::apply(env, subst, value)?
                }
            }

            Modifier::Info(op) => value = info::apply(env, *op, self.param, value, self.location)?,
        }

        let mut phrase = into_phrase(value);
        if !env.will_split && joins_when_unsplit(self.param) {
            phrase = Phrase::Field(phrase.ifs_join(&env.inner.variables));
        }
        Ok(phrase)
    }
}

/// Whether this parameter joins its fields in a non-splitting context.
fn joins_when_unsplit(param: &Param) -> bool {
    match param.r#type {
        ParamType::Special(SpecialParam::Asterisk) => true,
        ParamType::NamePrefix { at } => !at,
        _ => false,
    }
}

/// Modifies a string to its length.
fn to_length(v: &mut String) {
    *v = v.chars().count().to_string()
}

/// Converts a value into a phrase.
fn into_phrase(value: Option<Value>) -> Phrase {
    match value {
        None => Phrase::one_empty_field(),
        Some(Value::Scalar(value)) => Phrase::Field(to_field(&value)),
        Some(Value::Array(values)) => {
            Phrase::Full(values.iter().map(|value| to_field(value)).collect())
        }
    }
}

/// Converts a string to a field of `SoftExpansion` characters.
fn to_field(value: &str) -> Vec<AttrChar> {
    value
        .chars()
        .map(|c| AttrChar {
            value: c,
            origin: Origin::SoftExpansion,
            is_quoted: false,
            is_quoting: false,
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use shoal_env::option::On;
    use shoal_env::variable::{IFS, Variable};
    use shoal_syntax::syntax::TextUnit;
    use shoal_syntax::syntax::WordUnit;

    pub fn env_with_positional_params_and_ifs() -> shoal_env::Env {
        let mut env = shoal_env::Env::new_virtual();
        env.variables.positional_params_mut().values = vec!["a".to_string(), "c".to_string()];
        env.variables.assign(IFS, Variable::new("&?!")).unwrap();
        env
    }

    pub fn braced_param(source: &str) -> BracedParam {
        let word: shoal_syntax::syntax::Word = source.parse().unwrap();
        match word.units.into_iter().next() {
            Some(WordUnit::Unquoted(TextUnit::BracedParam(braced))) => braced,
            other => panic!("not a braced param: {other:?}"),
        }
    }

    fn expand_in(env: &mut shoal_env::Env, source: &str) -> Result<Phrase, Error> {
        let braced = braced_param(source);
        let mut env = Env::new(env);
        ParamRef::from(&braced).expand(&mut env)
    }

    #[test]
    fn basic_expansion() {
        let mut env = shoal_env::Env::new_virtual();
        env.variables
            .assign("foo", Variable::new("a1\u{30A4}"))
            .unwrap();
        let phrase = expand_in(&mut env, "${foo}").unwrap();
        assert_eq!(phrase, Phrase::Field(to_field("a1\u{30A4}")));
    }

    #[test]
    fn unset_expands_to_empty_field() {
        let mut env = shoal_env::Env::new_virtual();
        let phrase = expand_in(&mut env, "${foo}").unwrap();
        assert_eq!(phrase, Phrase::one_empty_field());
    }

    #[test]
    fn nounset_rejects_unset() {
        let mut env = shoal_env::Env::new_virtual();
        env.options.set(Unset, Off);
        let e = expand_in(&mut env, "${foo}").unwrap_err();
        assert_matches::assert_matches!(
            e.cause,
            ErrorCause::UnsetParameter { name } if name == "foo"
        );
    }

    #[test]
    fn nounset_is_ignored_if_there_is_a_switch() {
        let mut env = shoal_env::Env::new_virtual();
        env.options.set(Unset, Off);
        let phrase = expand_in(&mut env, "${foo+x}").unwrap();
        assert_eq!(phrase, Phrase::one_empty_field());
    }

    #[test]
    fn length_of_scalar() {
        let mut env = shoal_env::Env::new_virtual();
        env.variables
            .assign("foo", Variable::new("a1\u{30A4}"))
            .unwrap();
        let phrase = expand_in(&mut env, "${#foo}").unwrap();
        assert_eq!(phrase, Phrase::Field(to_field("3")));
    }

    #[test]
    fn length_of_unset() {
        let mut env = shoal_env::Env::new_virtual();
        let phrase = expand_in(&mut env, "${#foo}").unwrap();
        assert_eq!(phrase, Phrase::Field(to_field("0")));
    }

    #[test]
    fn length_of_positional_params() {
        let mut env = env_with_positional_params_and_ifs();
        let phrase = expand_in(&mut env, "${#@}").unwrap();
        assert_eq!(phrase, Phrase::Field(to_field("2")));
        let phrase = expand_in(&mut env, "${#*}").unwrap();
        assert_eq!(phrase, Phrase::Field(to_field("2")));
    }

    #[test]
    fn at_expands_to_separate_fields() {
        let mut env = env_with_positional_params_and_ifs();
        let phrase = expand_in(&mut env, "${@}").unwrap();
        assert_eq!(phrase, Phrase::Full(vec![to_field("a"), to_field("c")]));
    }

    #[test]
    fn asterisk_joins_in_non_splitting_context() {
        let mut env = env_with_positional_params_and_ifs();
        let braced = braced_param("${*}");
        let mut env = Env::new(&mut env);
        env.will_split = false;
        let phrase = ParamRef::from(&braced).expand(&mut env).unwrap();
        assert_eq!(phrase, Phrase::Field(to_field("a&c")));
    }

    #[test]
    fn asterisk_does_not_join_in_splitting_context() {
        let mut env = env_with_positional_params_and_ifs();
        let phrase = expand_in(&mut env, "${*}").unwrap();
        assert_eq!(phrase, Phrase::Full(vec![to_field("a"), to_field("c")]));
    }

    #[test]
    fn name_prefix_expansion() {
        let mut env = shoal_env::Env::new_virtual();
        for name in ["PATH", "PWD", "PS1"] {
            env.variables.assign(name, Variable::new("")).unwrap();
        }
        let phrase = expand_in(&mut env, "${!P@}").unwrap();
        assert_eq!(
            phrase,
            Phrase::Full(vec![to_field("PATH"), to_field("PS1"), to_field("PWD")])
        );
    }

    #[test]
    fn exit_status_parameter() {
        let mut env = shoal_env::Env::new_virtual();
        env.exit_status = shoal_env::semantics::ExitStatus(42);
        let phrase = expand_in(&mut env, "${?}").unwrap();
        assert_eq!(phrase, Phrase::Field(to_field("42")));
    }

    #[test]
    fn stdin_parameter() {
        let mut env = shoal_env::Env::new_virtual();
        let system = shoal_env::system::VirtualSystem::new();
        system
            .state
            .borrow_mut()
            .stdin_lines
            .push_back("typed".to_string());
        env.system = Box::new(system);
        let phrase = expand_in(&mut env, "${<}").unwrap();
        assert_eq!(phrase, Phrase::Field(to_field("typed")));
    }

    #[test]
    fn trim_modifier() {
        let mut env = shoal_env::Env::new_virtual();
        env.variables.assign("x", Variable::new("/a/b/c")).unwrap();
        let phrase = expand_in(&mut env, "${x#*/}").unwrap();
        assert_eq!(phrase, Phrase::Field(to_field("a/b/c")));
        let phrase = expand_in(&mut env, "${x##*/}").unwrap();
        assert_eq!(phrase, Phrase::Field(to_field("c")));
    }

    #[test]
    fn trim_of_unset_value() {
        let mut env = shoal_env::Env::new_virtual();
        let phrase = expand_in(&mut env, "${x#a}").unwrap();
        assert_eq!(phrase, Phrase::one_empty_field());
    }

    #[test]
    fn nocasematch_applies_to_trims() {
        let mut env = shoal_env::Env::new_virtual();
        env.variables.assign("x", Variable::new("ABCD")).unwrap();
        env.options.set(shoal_env::option::NoCaseMatch, On);
        let phrase = expand_in(&mut env, "${x#ab}").unwrap();
        assert_eq!(phrase, Phrase::Field(to_field("CD")));
    }
}
