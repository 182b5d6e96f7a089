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

//! Word expansion for a POSIX-compatible shell.
//!
//! This crate transforms a raw shell word into the fields delivered to a
//! command. The [`expansion`] module documents the pipeline; its
//! [`expand`](expansion::expand) function is the main entry point.

pub mod expansion;

pub use expansion::{ExpandFlag, ExpandFlags, expand, expand_value, expand_word, expand_words};
