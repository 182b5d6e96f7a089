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

//! Parameter expansion switch semantics

use super::super::super::ErrorCause;
use super::super::super::attr::Origin;
use super::Env;
use super::Error;
use super::Expand;
use super::Phrase;
use shoal_env::variable::{Value, Variable};
use shoal_syntax::source::Location;
use shoal_syntax::syntax::{Param, ParamType, Switch, SwitchCondition, SwitchType, Word};
use thiserror::Error as ThisError;

/// Physical state of a [value](Value) that may be considered "not set"
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ValueState {
    /// The parameter is not set.
    Unset,
    /// The value is a scalar with no characters.
    EmptyScalar,
    /// The value is an array with no elements.
    ValuelessArray,
    /// The value is an array with one element containing no characters.
    EmptyValueArray,
}

impl ValueState {
    /// Computes the state of a value.
    ///
    /// Returns `None` if the value does not fall under any of the
    /// `ValueState` variants.
    #[must_use]
    pub fn of(value: &Option<Value>) -> Option<ValueState> {
        use ValueState::*;
        match value {
            None => Some(Unset),
            Some(Value::Scalar(scalar)) if scalar.is_empty() => Some(EmptyScalar),
            Some(Value::Array(array)) if array.is_empty() => Some(ValuelessArray),
            Some(Value::Array(array)) if array.len() == 1 && array[0].is_empty() => {
                Some(EmptyValueArray)
            }
            Some(_) => None,
        }
    }

    pub fn description(&self) -> &'static str {
        use ValueState::*;
        match self {
            Unset => "unset variable",
            EmptyScalar => "empty string",
            ValuelessArray => "empty array",
            EmptyValueArray => "array with empty string",
        }
    }
}

impl std::fmt::Display for ValueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.description().fmt(f)
    }
}

/// Error caused by an error switch (`${P:?w}`) on an empty value
#[derive(Clone, Debug, Eq, Hash, PartialEq, ThisError)]
#[error("{} ({})", self.message_or_default(), self.state)]
#[non_exhaustive]
pub struct EmptyError {
    /// State of the value that caused this error
    pub state: ValueState,
    /// Error message specified in the switch
    pub message: Option<String>,
}

impl EmptyError {
    /// Returns the message, or the default message if none was given.
    #[must_use]
    pub fn message_or_default(&self) -> &str {
        self.message.as_deref().unwrap_or("parameter not set")
    }
}

/// Error assigning to a parameter that is not a variable
///
/// `${P:=w}` may only assign to named variables, never to positional or
/// special parameters.
#[derive(Clone, Debug, Eq, Hash, PartialEq, ThisError)]
#[error("parameter `{name}` cannot be assigned by an expansion")]
#[non_exhaustive]
pub struct NonassignableError {
    /// Name of the offending parameter
    pub name: String,
}

/// Abstract state of a value that determines the effect of a switch
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
enum ValueCondition {
    Set,
    Unset(ValueState),
}

impl ValueCondition {
    fn with(cond: SwitchCondition, state: Option<ValueState>) -> Self {
        match (cond, state) {
            (_, None) => ValueCondition::Set,
            (SwitchCondition::UnsetOrEmpty, Some(state)) => ValueCondition::Unset(state),
            (_, Some(ValueState::Unset)) => ValueCondition::Unset(ValueState::Unset),
            (SwitchCondition::Unset, Some(_)) => ValueCondition::Set,
        }
    }
}

/// Modifies the origin of characters in the phrase to `SoftExpansion`.
///
/// The substitution produced by a switch is part of a parameter
/// expansion, so its characters must be subject to field splitting like
/// any parameter value.
fn attribute(mut phrase: Phrase) -> Phrase {
    phrase.for_each_char_mut(|c| match c.origin {
        Origin::Literal => c.origin = Origin::SoftExpansion,
        Origin::HardExpansion | Origin::SoftExpansion => (),
    });
    phrase
}

/// Assigns the expansion of `word` to the parameter.
fn assign(
    env: &mut Env<'_>,
    param: &Param,
    word: &Word,
    location: &Location,
) -> Result<Phrase, Error> {
    if param.r#type != ParamType::Variable {
        return Err(Error {
            cause: ErrorCause::NonassignableParameter(NonassignableError {
                name: param.id.clone(),
            }),
            location: location.clone(),
        });
    }

    let value_phrase = attribute(word.units.expand(env)?);
    let value_chars = value_phrase.clone().ifs_join(&env.inner.variables);
    let value: String = {
        use super::super::super::attr_strip::Strip;
        use super::super::super::quote_removal::skip_quotes;
        skip_quotes(value_chars).strip().collect()
    };
    let variable = Variable::new(value).set_assigned_location(location.clone());
    env.inner
        .variables
        .assign(param.id.clone(), variable)
        .map_err(|e| Error {
            cause: ErrorCause::AssignReadOnly(e),
            location: location.clone(),
        })?;
    Ok(value_phrase)
}

/// Expands a word to be used as an empty expansion error message.
fn empty_expansion_error_message(
    env: &mut Env<'_>,
    message_word: &Word,
) -> Result<Option<String>, Error> {
    if message_word.units.is_empty() {
        return Ok(None);
    }
    super::super::expand_to_string(env, message_word).map(Some)
}

/// Constructs an empty expansion error.
fn empty_expansion_error(
    env: &mut Env<'_>,
    state: ValueState,
    message_word: &Word,
    location: &Location,
) -> Error {
    let message = match empty_expansion_error_message(env, message_word) {
        Ok(message) => message,
        Err(error) => return error,
    };
    let cause = ErrorCause::EmptyExpansion(EmptyError { state, message });
    Error {
        cause,
        location: location.clone(),
    }
}

/// Applies a switch.
///
/// If this function returns `Ok(Some(_))`, that is the result of the whole
/// parameter expansion containing the switch. On `Ok(None)` the expansion
/// continues with the current value.
pub fn apply(
    env: &mut Env<'_>,
    switch: &Switch,
    param: &Param,
    value: &mut Option<Value>,
    location: &Location,
) -> Result<Option<Phrase>, Error> {
    use SwitchType::*;
    use ValueCondition::*;
    let cond = ValueCondition::with(switch.condition, ValueState::of(value));
    match (switch.r#type, cond) {
        (Alter, Unset(_)) | (Default, Set) | (Assign, Set) | (Error, Set) => Ok(None),
        (Alter, Set) | (Default, Unset(_)) => {
            let phrase = switch.word.units.expand(env)?;
            Ok(Some(attribute(phrase)))
        }
        (Assign, Unset(_)) => assign(env, param, &switch.word, location).map(Some),
        (Error, Unset(state)) => {
            Err(empty_expansion_error(env, state, &switch.word, location))
        }
    }
}
