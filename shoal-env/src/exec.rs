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

//! Command execution for command substitution
//!
//! The expansion core does not fork processes. To expand `$(…)` it hands
//! the command text to the [`Executor`] collaborator, which runs it in a
//! subshell with its standard output captured, and blocks until the
//! subshell finishes.
//!
//! The executor contract, beyond the signature:
//!
//! - The subshell inherits exported variables, functions, the working
//!   directory, the umask and the shell options of the parent, except that
//!   `errexit` is reset unless `inheriterrexit` is on.
//! - The `DEBUG`, `RETURN` and `ERR` traps are reset in the subshell
//!   unless the `functrace`/`errtrace` options keep them.
//! - `$$` in the subshell is the parent's PID, not the subshell's own.
//! - If a signal interrupts the capturing read, the executor returns the
//!   output gathered so far together with the subshell's exit status.
//! - Producing no output is not an error; the output is simply empty.

use crate::semantics::ExitStatus;
use thiserror::Error;

/// Output and status of a captured command execution
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CaptureResult {
    /// Everything the command wrote to its standard output
    pub output: Vec<u8>,
    /// Exit status of the command
    pub exit_status: ExitStatus,
}

/// Error that prevented a command substitution from running at all
///
/// Failures of the command itself are not errors; they are reported
/// through [`CaptureResult::exit_status`]. This error means the subshell
/// could not even be started (no pipe, no process, …).
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("cannot run command substitution: {0}")]
pub struct ExecError(pub String);

/// Runs commands in a subshell, capturing their output.
pub trait Executor: std::fmt::Debug {
    /// Runs the command and returns its captured output and exit status.
    fn run_capturing(&mut self, command: &str) -> Result<CaptureResult, ExecError>;
}

/// Executor that cannot run anything
///
/// This is the executor of a freshly created virtual environment. Every
/// substitution fails with an [`ExecError`], like a system without
/// process support.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullExecutor;

impl Executor for NullExecutor {
    fn run_capturing(&mut self, _command: &str) -> Result<CaptureResult, ExecError> {
        Err(ExecError("not supported in this environment".to_string()))
    }
}

/// Executor backed by a function, for tests
///
/// The function receives the command text and returns the capture result.
pub struct FnExecutor(pub Box<dyn FnMut(&str) -> Result<CaptureResult, ExecError>>);

impl FnExecutor {
    /// Creates an executor that yields the given output and a zero exit
    /// status for every command.
    #[must_use]
    pub fn constant<O: Into<Vec<u8>>>(output: O) -> FnExecutor {
        let output = output.into();
        FnExecutor(Box::new(move |_| {
            Ok(CaptureResult {
                output: output.clone(),
                exit_status: ExitStatus::SUCCESS,
            })
        }))
    }
}

impl std::fmt::Debug for FnExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnExecutor").finish_non_exhaustive()
    }
}

impl Executor for FnExecutor {
    fn run_capturing(&mut self, command: &str) -> Result<CaptureResult, ExecError> {
        (self.0)(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_executor_always_fails() {
        let mut executor = NullExecutor;
        assert!(executor.run_capturing("echo hi").is_err());
    }

    #[test]
    fn fn_executor_sees_command_text() {
        let mut executor = FnExecutor(Box::new(|command| {
            Ok(CaptureResult {
                output: command.to_uppercase().into_bytes(),
                exit_status: ExitStatus(7),
            })
        }));
        let result = executor.run_capturing("echo hi").unwrap();
        assert_eq!(result.output, b"ECHO HI");
        assert_eq!(result.exit_status, ExitStatus(7));
    }

    #[test]
    fn constant_executor() {
        let mut executor = FnExecutor::constant("out\n");
        let result = executor.run_capturing("anything").unwrap();
        assert_eq!(result.output, b"out\n");
        assert_eq!(result.exit_status, ExitStatus::SUCCESS);
    }
}
