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

//! Types shared between the expansion core and the rest of the shell

use shoal_syntax::source::Location;
use std::fmt::{Display, Formatter};

/// Resultant status of a command execution
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ExitStatus(pub i32);

impl ExitStatus {
    /// Exit status of a successful command
    pub const SUCCESS: ExitStatus = ExitStatus(0);
    /// Exit status of a generic failure
    pub const FAILURE: ExitStatus = ExitStatus(1);
}

impl Display for ExitStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i32> for ExitStatus {
    fn from(value: i32) -> ExitStatus {
        ExitStatus(value)
    }
}

/// Process ID
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Pid(pub i32);

impl Display for Pid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Word fully expanded and ready for consumption by a command
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Field {
    /// Value of the field
    pub value: String,
    /// Location of the word this field resulted from
    pub origin: Location,
}

impl Field {
    /// Creates a field with a dummy origin, mainly for tests.
    #[must_use]
    pub fn dummy<S: Into<String>>(value: S) -> Field {
        fn inner(value: String) -> Field {
            let origin = Location::dummy(value.clone());
            Field { value, origin }
        }
        inner(value.into())
    }

    /// Creates fields with dummy origins, mainly for tests.
    #[must_use]
    pub fn dummies<I, S>(values: I) -> Vec<Field>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        values.into_iter().map(Self::dummy).collect()
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.value.fmt(f)
    }
}
