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

//! Parameter expansion info operators (`${P@Q}`, `${P@E}`, `${P@P}`,
//! `${P@A}`)

use super::super::super::Error;
use super::super::super::ErrorCause;
use super::super::super::ansi;
use super::Env;
use shoal_env::variable::Value::{self, Array, Scalar};
use shoal_quote::quoted;
use shoal_syntax::source::Location;
use shoal_syntax::syntax::{InfoOp, Param};

/// Applies an info operator to the value.
///
/// An unset parameter stays unset; every operator expands it to an empty
/// result.
pub fn apply(
    env: &mut Env<'_>,
    op: InfoOp,
    param: &Param,
    value: Option<Value>,
    location: &Location,
) -> Result<Option<Value>, Error> {
    let Some(value) = value else {
        return Ok(None);
    };

    let value = match op {
        InfoOp::Quote => map_scalars(value, |s| quoted(s).into_owned()),

        InfoOp::Escape => try_map_scalars(value, |s| {
            ansi::decode_str(s).map_err(|e| Error {
                cause: ErrorCause::Syntax(e),
                location: location.clone(),
            })
        })?,

        InfoOp::Prompt => {
            let prompt = &mut env.inner.prompt;
            match value {
                Scalar(s) => Scalar(prompt.evaluate(&s)),
                Array(values) => {
                    Array(values.iter().map(|s| prompt.evaluate(s)).collect())
                }
            }
        }

        InfoOp::Assign => Scalar(assignment_statement(param, &value)),
    };
    Ok(Some(value))
}

fn map_scalars<F: Fn(&str) -> String>(value: Value, f: F) -> Value {
    match value {
        Scalar(s) => Scalar(f(&s)),
        Array(values) => Array(values.iter().map(|s| f(s)).collect()),
    }
}

fn try_map_scalars<F>(value: Value, f: F) -> Result<Value, Error>
where
    F: Fn(&str) -> Result<String, Error>,
{
    match value {
        Scalar(s) => Ok(Scalar(f(&s)?)),
        Array(values) => Ok(Array(
            values.iter().map(|s| f(s)).collect::<Result<_, _>>()?,
        )),
    }
}

/// Builds an assignment statement that re-creates the parameter.
fn assignment_statement(param: &Param, value: &Value) -> String {
    match value {
        Scalar(s) => format!("{}={}", param.id, quoted(s)),
        Array(values) => {
            let mut statement = format!("{}=(", param.id);
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    statement.push(' ');
                }
                statement.push_str(&quoted(value));
            }
            statement.push(')');
            statement
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_simple(op: InfoOp, value: &str) -> String {
        let mut env = shoal_env::Env::new_virtual();
        let mut env = Env::new(&mut env);
        let param = Param::from_id("x");
        let location = Location::dummy("");
        let result = apply(&mut env, op, &param, Some(Value::scalar(value)), &location)
            .unwrap()
            .unwrap();
        match result {
            Scalar(s) => s,
            other => panic!("unexpected value: {other:?}"),
        }
    }

    #[test]
    fn quote_operator() {
        assert_eq!(apply_simple(InfoOp::Quote, "plain"), "plain");
        assert_eq!(apply_simple(InfoOp::Quote, "a b"), "'a b'");
        assert_eq!(apply_simple(InfoOp::Quote, "a\nb"), r"$'a\nb'");
    }

    #[test]
    fn escape_operator() {
        assert_eq!(apply_simple(InfoOp::Escape, r"a\tb"), "a\tb");
        assert_eq!(apply_simple(InfoOp::Escape, "plain"), "plain");
    }

    #[test]
    fn prompt_operator_goes_through_the_evaluator() {
        #[derive(Debug)]
        struct Upper;
        impl shoal_env::prompt::PromptEvaluator for Upper {
            fn evaluate(&mut self, prompt: &str) -> String {
                prompt.to_uppercase()
            }
        }

        let mut env = shoal_env::Env::new_virtual();
        env.prompt = Box::new(Upper);
        let mut env = Env::new(&mut env);
        let param = Param::from_id("PS1");
        let location = Location::dummy("");
        let result = apply(
            &mut env,
            InfoOp::Prompt,
            &param,
            Some(Value::scalar("ps> ")),
            &location,
        )
        .unwrap();
        assert_eq!(result, Some(Value::scalar("PS> ")));
    }

    #[test]
    fn assign_operator() {
        assert_eq!(apply_simple(InfoOp::Assign, "a b"), "x='a b'");
    }

    #[test]
    fn assign_operator_with_array() {
        let mut env = shoal_env::Env::new_virtual();
        let mut env = Env::new(&mut env);
        let param = Param::from_id("arr");
        let location = Location::dummy("");
        let result = apply(
            &mut env,
            InfoOp::Assign,
            &param,
            Some(Value::array(["a", "b c"])),
            &location,
        )
        .unwrap();
        assert_eq!(result, Some(Value::scalar("arr=(a 'b c')")));
    }

    #[test]
    fn unset_value_stays_unset() {
        let mut env = shoal_env::Env::new_virtual();
        let mut env = Env::new(&mut env);
        let param = Param::from_id("x");
        let location = Location::dummy("");
        let result = apply(&mut env, InfoOp::Quote, &param, None, &location).unwrap();
        assert_eq!(result, None);
    }
}
