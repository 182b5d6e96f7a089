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

//! Arithmetic evaluation seam
//!
//! The arithmetic evaluator is a collaborator of the expansion core, not
//! part of it. The expansion first runs parameter expansion, command
//! substitution and quote handling over the content of `$((…))`, then
//! hands the resulting expression string to the [`ArithEvaluator`]. The
//! evaluator may read and assign variables (for `x = 5` and `x++` forms)
//! through the store it is given.

use crate::variable::VariableSet;
use thiserror::Error;

/// Error in arithmetic evaluation
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{0}")]
pub struct ArithError(pub String);

/// Evaluates arithmetic expressions.
pub trait ArithEvaluator: std::fmt::Debug {
    /// Evaluates the expression and returns its value in decimal form.
    fn eval(
        &mut self,
        expression: &str,
        variables: &mut VariableSet,
    ) -> Result<String, ArithError>;
}

/// Evaluator that rejects every expression
///
/// This is the evaluator of a freshly created virtual environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullArithEvaluator;

impl ArithEvaluator for NullArithEvaluator {
    fn eval(
        &mut self,
        _expression: &str,
        _variables: &mut VariableSet,
    ) -> Result<String, ArithError> {
        Err(ArithError(
            "arithmetic evaluation is not supported in this environment".to_string(),
        ))
    }
}
