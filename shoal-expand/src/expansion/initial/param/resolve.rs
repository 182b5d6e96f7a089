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

//! Resolution of parameter names to values
//!
//! An unset parameter and a set-but-empty parameter behave differently in
//! several expansion forms, so resolution distinguishes them by returning
//! `Option<Value>`.

use super::Env;
use shoal_env::variable::Value;
use shoal_syntax::syntax::{Param, ParamType, SpecialParam};

/// Resolves a parameter to its current value.
pub fn resolve(param: &Param, env: &mut Env<'_>) -> Option<Value> {
    match param.r#type {
        ParamType::Variable => env
            .inner
            .variables
            .get(&param.id)
            .map(|variable| variable.value.clone()),

        ParamType::Positional(index) => env
            .inner
            .variables
            .positional_params()
            .get(index)
            .map(Value::scalar),

        ParamType::NamePrefix { .. } => {
            let names = env.inner.variables.names_with_prefix(&param.id);
            Some(Value::array(names))
        }

        ParamType::Special(special) => resolve_special(special, env),
    }
}

fn resolve_special(special: SpecialParam, env: &mut Env<'_>) -> Option<Value> {
    use SpecialParam::*;
    match special {
        At | Asterisk => Some(Value::Array(
            env.inner.variables.positional_params().values.clone(),
        )),
        Number => Some(Value::scalar(
            env.inner.variables.positional_params().count().to_string(),
        )),
        Question => Some(Value::scalar(env.inner.exit_status.to_string())),
        Hyphen => Some(Value::scalar(env.inner.options.short_flags())),
        Dollar => Some(Value::scalar(env.inner.main_pid.to_string())),
        Exclamation => env
            .inner
            .last_async_pid
            .map(|pid| Value::scalar(pid.to_string())),
        Zero => Some(Value::scalar(env.inner.arg0.clone())),
        Underscore => env
            .inner
            .variables
            .get("_")
            .map(|variable| variable.value.clone()),
        Stdin => env.inner.system.read_stdin_line().map(Value::scalar),
    }
}
