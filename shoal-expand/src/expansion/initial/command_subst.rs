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

//! Expansion of command substitution
//!
//! A command substitution normally runs its command in a subshell through
//! the [`Executor`](shoal_env::exec::Executor) collaborator and expands to
//! the captured output with all trailing newlines (and carriage returns)
//! removed. Two forms short-circuit without running anything:
//!
//! - `$(<file)` expands to the content of `file`, like `$(cat file)`
//!   without the subshell.
//! - `$(n<#)` expands to the current byte offset of file descriptor `n`.
//!
//! The command's exit status becomes the exit status of the expansion
//! (`$?` in the parent). Producing no output is not an error.

use super::super::Error;
use super::super::ErrorCause;
use super::super::attr::AttrChar;
use super::super::attr::Origin;
use super::super::phrase::Phrase;
use super::Env;
use shoal_env::exec::ExecError;
use shoal_env::semantics::ExitStatus;
use shoal_syntax::source::Location;

/// Performs command substitution for the `$(…)` form.
pub fn expand(env: &mut Env<'_>, content: &str, location: &Location) -> Result<Phrase, Error> {
    if let Some(path) = content.strip_prefix('<') {
        return expand_file(env, path.trim_start(), location);
    }
    if let Some(fd) = parse_fd_offset_form(content) {
        return expand_fd_offset(env, fd, location);
    }
    expand_backquoted(env, content, location)
}

/// Performs command substitution without the `$(…)`-only shortcuts.
pub fn expand_backquoted(
    env: &mut Env<'_>,
    command: &str,
    location: &Location,
) -> Result<Phrase, Error> {
    let result = env
        .inner
        .executor
        .run_capturing(command)
        .map_err(|e| Error {
            cause: ErrorCause::CommandSubstError(e),
            location: location.clone(),
        })?;

    env.last_command_subst_exit_status = Some(result.exit_status);
    Ok(output_phrase(result.output))
}

/// `$(<file)`: reads the file instead of forking.
fn expand_file(env: &mut Env<'_>, path: &str, location: &Location) -> Result<Phrase, Error> {
    if path.is_empty() {
        return Ok(Phrase::one_empty_field());
    }
    match env.inner.system.read_file(path) {
        Ok(content) => {
            env.last_command_subst_exit_status = Some(ExitStatus::SUCCESS);
            Ok(output_phrase(content))
        }
        Err(kind) => Err(Error {
            cause: ErrorCause::CommandSubstError(ExecError(format!("{path}: {kind}"))),
            location: location.clone(),
        }),
    }
}

/// Recognizes the `n<#` form and returns the file descriptor number.
fn parse_fd_offset_form(content: &str) -> Option<i32> {
    let digits_end = content.find(|c: char| !c.is_ascii_digit())?;
    if digits_end == 0 || &content[digits_end..] != "<#" {
        return None;
    }
    content[..digits_end].parse().ok()
}

/// `$(n<#)`: reports the byte offset of a file descriptor.
fn expand_fd_offset(env: &mut Env<'_>, fd: i32, location: &Location) -> Result<Phrase, Error> {
    match env.inner.system.fd_offset(fd) {
        Ok(offset) => {
            env.last_command_subst_exit_status = Some(ExitStatus::SUCCESS);
            Ok(output_phrase(offset.to_string().into_bytes()))
        }
        Err(kind) => Err(Error {
            cause: ErrorCause::CommandSubstError(ExecError(format!("{fd}<#: {kind}"))),
            location: location.clone(),
        }),
    }
}

/// Converts captured output to a phrase, trimming trailing newlines.
fn output_phrase(output: Vec<u8>) -> Phrase {
    let mut result = String::from_utf8(output)
        .unwrap_or_else(|e| String::from_utf8_lossy(&e.into_bytes()).into());

    // Remove trailing newlines (and carriage returns), but nothing else.
    let len = result.trim_end_matches(['\n', '\r']).len();
    result.truncate(len);

    let chars = result
        .chars()
        .map(|value| AttrChar {
            value,
            origin: Origin::SoftExpansion,
            is_quoted: false,
            is_quoting: false,
        })
        .collect();
    Phrase::Field(chars)
}
