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

//! Arithmetic expansion
//!
//! The content text of `$((…))` is first expanded like a here-document
//! body (parameter expansion, command substitution, nested arithmetic;
//! no field splitting). The resulting expression string goes to the
//! [`ArithEvaluator`](shoal_env::arith::ArithEvaluator) collaborator,
//! which may read and assign variables, and the evaluated value is
//! spliced into the word.

use super::super::Error;
use super::super::ErrorCause;
use super::super::attr::AttrChar;
use super::super::attr::Origin;
use super::super::phrase::Phrase;
use super::Env;
use shoal_syntax::source::Location;
use shoal_syntax::syntax::Text;

/// Performs arithmetic expansion.
pub fn expand(env: &mut Env<'_>, content: &Text, location: &Location) -> Result<Phrase, Error> {
    let expression = super::expand_text_to_string(env, content)?;

    let inner = &mut *env.inner;
    let result = inner.arith.eval(&expression, &mut inner.variables);

    match result {
        Ok(value) => {
            let chars = value
                .chars()
                .map(|c| AttrChar {
                    value: c,
                    origin: Origin::SoftExpansion,
                    is_quoted: false,
                    is_quoting: false,
                })
                .collect();
            Ok(Phrase::Field(chars))
        }
        Err(error) => Err(Error {
            cause: ErrorCause::ArithError(error),
            location: location.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shoal_env::arith::{ArithError, ArithEvaluator};
    use shoal_env::variable::{Value, VariableSet};

    /// Test evaluator handling decimal constants and `a+b` sums.
    #[derive(Debug)]
    struct SumEvaluator;

    impl ArithEvaluator for SumEvaluator {
        fn eval(
            &mut self,
            expression: &str,
            _variables: &mut VariableSet,
        ) -> Result<String, ArithError> {
            expression
                .split('+')
                .map(|term| term.trim().parse::<i64>())
                .sum::<Result<i64, _>>()
                .map(|sum| sum.to_string())
                .map_err(|e| ArithError(e.to_string()))
        }
    }

    fn env_with_sum() -> shoal_env::Env {
        let mut env = shoal_env::Env::new_virtual();
        env.arith = Box::new(SumEvaluator);
        env
    }

    #[test]
    fn evaluating_a_constant() {
        let mut env = env_with_sum();
        let mut env = Env::new(&mut env);
        let content: Text = "1 + 2".parse().unwrap();
        let result = expand(&mut env, &content, &Location::dummy("")).unwrap();
        assert_matches!(result, Phrase::Field(chars) => {
            let value: String = chars.iter().map(|c| c.value).collect();
            assert_eq!(value, "3");
            assert_eq!(chars[0].origin, Origin::SoftExpansion);
        });
    }

    #[test]
    fn content_is_expanded_before_evaluation() {
        let mut env = env_with_sum();
        env.variables
            .assign("n", shoal_env::variable::Variable::new("40"))
            .unwrap();
        let mut env = Env::new(&mut env);
        let content: Text = "$n + 2".parse().unwrap();
        let result = expand(&mut env, &content, &Location::dummy("")).unwrap();
        assert_matches!(result, Phrase::Field(chars) => {
            let value: String = chars.iter().map(|c| c.value).collect();
            assert_eq!(value, "42");
        });
    }

    #[test]
    fn evaluator_may_assign_variables() {
        #[derive(Debug)]
        struct Assigning;
        impl ArithEvaluator for Assigning {
            fn eval(
                &mut self,
                _expression: &str,
                variables: &mut VariableSet,
            ) -> Result<String, ArithError> {
                variables
                    .assign("x", shoal_env::variable::Variable::new("5"))
                    .unwrap();
                Ok("5".to_string())
            }
        }

        let mut env = shoal_env::Env::new_virtual();
        env.arith = Box::new(Assigning);
        let mut ienv = Env::new(&mut env);
        let content: Text = "x = 5".parse().unwrap();
        expand(&mut ienv, &content, &Location::dummy("")).unwrap();
        assert_eq!(env.variables.get("x").map(|v| &v.value), Some(&Value::scalar("5")));
    }

    #[test]
    fn evaluation_errors_propagate() {
        let mut env = env_with_sum();
        let mut env = Env::new(&mut env);
        let content: Text = "oops".parse().unwrap();
        let location = Location::dummy("$((oops))");
        let e = expand(&mut env, &content, &location).unwrap_err();
        assert_matches!(e.cause, ErrorCause::ArithError(_));
        assert_eq!(e.location, location);
    }
}
