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

//! Internal structure of expandable shell words.
//!
//! The surrounding shell's lexer delivers a word as a raw string with all
//! quoting intact. This crate defines the abstract syntax of such words -
//! quotes, tilde prefixes, parameter expansions, command substitutions,
//! arithmetic expansions, dollar-quoted strings - and the parser that turns
//! the raw string into that syntax. The expansion semantics live in the
//! `shoal-expand` crate.

pub mod parser;
pub mod source;
pub mod syntax;
