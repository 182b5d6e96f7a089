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

//! Shell execution environment as seen by the expansion core.
//!
//! The [`Env`] struct bundles everything the expansion depends on: the
//! [variable store](variable), the [option set](option), shared process
//! state such as the exit status and PIDs, and the boxed collaborators
//! that do work the core deliberately does not do itself - running
//! subshells ([`exec`]), touching the OS ([`system`]), evaluating
//! arithmetic ([`arith`]) and prompts ([`prompt`]).

pub mod arith;
pub mod exec;
pub mod option;
pub mod prompt;
pub mod semantics;
pub mod system;
pub mod variable;

use self::arith::{ArithEvaluator, NullArithEvaluator};
use self::exec::{Executor, NullExecutor};
use self::option::OptionSet;
use self::prompt::{PlainPromptEvaluator, PromptEvaluator};
use self::semantics::{ExitStatus, Pid};
use self::system::{System, VirtualSystem};
use self::variable::VariableSet;

/// Whole shell execution environment
#[derive(Debug)]
pub struct Env {
    /// Shell variables and positional parameters
    pub variables: VariableSet,

    /// Shell options
    pub options: OptionSet,

    /// Exit status of the last executed command (`$?`)
    pub exit_status: ExitStatus,

    /// Process ID of the main shell process (`$$`)
    ///
    /// This value does not change in subshells.
    pub main_pid: Pid,

    /// Process ID of the last asynchronous command (`$!`), if any
    pub last_async_pid: Option<Pid>,

    /// Name of the shell or current script (`$0`)
    pub arg0: String,

    /// Interface to the operating system
    pub system: Box<dyn System>,

    /// Runner of command substitutions
    pub executor: Box<dyn Executor>,

    /// Evaluator of arithmetic expressions
    pub arith: Box<dyn ArithEvaluator>,

    /// Evaluator of prompt strings (for `${P@P}`)
    pub prompt: Box<dyn PromptEvaluator>,
}

impl Env {
    /// Creates an environment with the given system.
    ///
    /// The executor, arithmetic evaluator and prompt evaluator are the
    /// null implementations; replace them as needed.
    pub fn with_system(system: Box<dyn System>) -> Env {
        Env {
            variables: Default::default(),
            options: Default::default(),
            exit_status: ExitStatus::SUCCESS,
            main_pid: Pid(2),
            last_async_pid: None,
            arg0: "shoal".to_string(),
            system,
            executor: Box::new(NullExecutor),
            arith: Box::new(NullArithEvaluator),
            prompt: Box::new(PlainPromptEvaluator),
        }
    }

    /// Creates an environment backed by a [`VirtualSystem`].
    ///
    /// This is the standard constructor for tests.
    pub fn new_virtual() -> Env {
        Self::with_system(Box::new(VirtualSystem::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::Variable;

    #[test]
    fn virtual_env_defaults() {
        let env = Env::new_virtual();
        assert_eq!(env.exit_status, ExitStatus::SUCCESS);
        assert_eq!(env.last_async_pid, None);
        assert_eq!(env.arg0, "shoal");
        assert_eq!(env.variables.get("HOME"), None);
    }

    #[test]
    fn env_is_mutable_through_parts() {
        let mut env = Env::new_virtual();
        env.variables
            .assign("x", Variable::new("1"))
            .unwrap();
        env.exit_status = ExitStatus(3);
        assert_eq!(env.variables.get_scalar("x"), Some("1"));
        assert_eq!(env.exit_status, ExitStatus(3));
    }
}
