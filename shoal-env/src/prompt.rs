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

//! Prompt evaluation seam
//!
//! Prompt-string expansion (the `\u`, `\w`, `\$` notation of `PS1`) lives
//! with the interactive front end. The expansion core only touches it for
//! `${P@P}`, which goes through this trait.

/// Expands prompt strings.
pub trait PromptEvaluator: std::fmt::Debug {
    /// Expands the given prompt string.
    fn evaluate(&mut self, prompt: &str) -> String;
}

/// Prompt evaluator that performs no expansion
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainPromptEvaluator;

impl PromptEvaluator for PlainPromptEvaluator {
    fn evaluate(&mut self, prompt: &str) -> String {
        prompt.to_string()
    }
}
