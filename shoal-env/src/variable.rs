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

//! Variable store
//!
//! This module defines the variable store the expansion reads from and
//! writes to. The store presented here is a flat namespace; the function
//! call stack of local contexts belongs to the surrounding shell and is out
//! of scope for the expansion core, which only ever sees the effective
//! binding of each name.

use shoal_syntax::source::Location;
use std::collections::HashMap;
use thiserror::Error;

/// Name of the variable holding the user's home directory
pub const HOME: &str = "HOME";
/// Name of the variable holding the field separator characters
pub const IFS: &str = "IFS";
/// Name of the variable holding patterns excluded from pathname expansion
pub const GLOB_IGNORE: &str = "GLOBIGNORE";

/// Value of a variable
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    /// Single string value
    Scalar(String),
    /// Array of string values
    Array(Vec<String>),
}

pub use Value::*;

impl Value {
    /// Creates a scalar value.
    pub fn scalar<S: Into<String>>(value: S) -> Self {
        Scalar(value.into())
    }

    /// Creates an array value.
    pub fn array<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Array(values.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::scalar(value)
    }
}
impl From<String> for Value {
    fn from(value: String) -> Self {
        Scalar(value)
    }
}

/// Variable with its metadata
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Variable {
    /// Value of the variable
    pub value: Value,

    /// Whether the variable is exported to child processes
    pub is_exported: bool,

    /// Location where the variable was made read-only, if it is
    ///
    /// A read-only variable rejects assignment and unsetting.
    pub read_only_location: Option<Location>,

    /// Location of the assignment that gave the variable its value
    pub last_assigned_location: Option<Location>,
}

impl Variable {
    /// Creates a scalar variable that is not exported or read-only.
    pub fn new<S: Into<String>>(value: S) -> Variable {
        Variable {
            value: Value::scalar(value),
            is_exported: false,
            read_only_location: None,
            last_assigned_location: None,
        }
    }

    /// Creates a variable with the given value.
    pub fn with_value(value: Value) -> Variable {
        Variable {
            value,
            is_exported: false,
            read_only_location: None,
            last_assigned_location: None,
        }
    }

    /// Marks the variable exported.
    #[must_use]
    pub fn export(mut self) -> Variable {
        self.is_exported = true;
        self
    }

    /// Makes the variable read-only.
    #[must_use]
    pub fn make_read_only(mut self, location: Location) -> Variable {
        self.read_only_location = Some(location);
        self
    }

    /// Sets the location of the assignment producing this variable.
    #[must_use]
    pub fn set_assigned_location(mut self, location: Location) -> Variable {
        self.last_assigned_location = Some(location);
        self
    }

    /// Whether the variable is read-only.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only_location.is_some()
    }
}

/// Error assigning to a read-only variable
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("cannot assign to read-only variable `{name}`")]
pub struct AssignReadOnlyError {
    /// Name of the read-only variable
    pub name: String,
    /// Location where the variable was made read-only
    pub read_only_location: Location,
    /// Value that was about to be assigned
    pub new_value: Variable,
}

/// Error unsetting a read-only variable
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("cannot unset read-only variable `{name}`")]
pub struct UnsetReadOnlyError {
    /// Name of the read-only variable
    pub name: String,
    /// Location where the variable was made read-only
    pub read_only_location: Location,
}

/// Positional parameters (`$1`, `$2`, …)
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PositionalParams {
    /// Values of the parameters, `$1` first
    pub values: Vec<String>,
}

impl PositionalParams {
    /// Creates positional parameters from strings.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PositionalParams {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the value of the parameter with the given 1-based index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }

    /// Returns the number of positional parameters.
    #[must_use]
    pub fn count(&self) -> usize {
        self.values.len()
    }
}

/// Collection of variables and positional parameters
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VariableSet {
    all: HashMap<String, Variable>,
    positional: PositionalParams,
}

impl VariableSet {
    /// Creates an empty variable set.
    #[must_use]
    pub fn new() -> VariableSet {
        Default::default()
    }

    /// Returns the variable with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.all.get(name)
    }

    /// Returns the value of the given scalar variable.
    ///
    /// Returns `None` if the variable is unset or an array.
    #[must_use]
    pub fn get_scalar(&self, name: &str) -> Option<&str> {
        match &self.get(name)?.value {
            Scalar(value) => Some(value),
            Array(_) => None,
        }
    }

    /// Assigns a variable, replacing any previous value.
    ///
    /// Returns the replaced variable, or an error if the previous variable
    /// is read-only.
    pub fn assign<S: Into<String>>(
        &mut self,
        name: S,
        value: Variable,
    ) -> Result<Option<Variable>, AssignReadOnlyError> {
        fn inner(
            set: &mut VariableSet,
            name: String,
            value: Variable,
        ) -> Result<Option<Variable>, AssignReadOnlyError> {
            if let Some(current) = set.all.get(&name) {
                if let Some(location) = &current.read_only_location {
                    return Err(AssignReadOnlyError {
                        name,
                        read_only_location: location.clone(),
                        new_value: value,
                    });
                }
            }
            Ok(set.all.insert(name, value))
        }
        inner(self, name.into(), value)
    }

    /// Removes a variable.
    ///
    /// Returns the removed variable, or an error if it is read-only.
    pub fn unset(&mut self, name: &str) -> Result<Option<Variable>, UnsetReadOnlyError> {
        if let Some(current) = self.all.get(name) {
            if let Some(location) = &current.read_only_location {
                return Err(UnsetReadOnlyError {
                    name: name.to_string(),
                    read_only_location: location.clone(),
                });
            }
        }
        Ok(self.all.remove(name))
    }

    /// Whether the named variable is read-only.
    #[must_use]
    pub fn is_read_only(&self, name: &str) -> bool {
        self.get(name).is_some_and(Variable::is_read_only)
    }

    /// Returns the names of set variables starting with the prefix, sorted.
    #[must_use]
    pub fn names_with_prefix(&self, prefix: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .all
            .keys()
            .filter(|name| name.starts_with(prefix))
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }

    /// Returns the positional parameters.
    #[must_use]
    pub fn positional_params(&self) -> &PositionalParams {
        &self.positional
    }

    /// Returns the positional parameters, mutably.
    pub fn positional_params_mut(&mut self) -> &mut PositionalParams {
        &mut self.positional
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn assign_and_get() {
        let mut set = VariableSet::new();
        assert_eq!(set.get_scalar("foo"), None);

        let old = set.assign("foo", Variable::new("bar")).unwrap();
        assert_eq!(old, None);
        assert_eq!(set.get_scalar("foo"), Some("bar"));

        let old = set.assign("foo", Variable::new("baz")).unwrap();
        assert_eq!(old, Some(Variable::new("bar")));
        assert_eq!(set.get_scalar("foo"), Some("baz"));
    }

    #[test]
    fn get_scalar_of_array_variable() {
        let mut set = VariableSet::new();
        set.assign("a", Variable::with_value(Value::array(["x", "y"])))
            .unwrap();
        assert_eq!(set.get_scalar("a"), None);
        assert_matches!(&set.get("a").unwrap().value, Array(values) => {
            assert_eq!(values.as_slice(), ["x", "y"]);
        });
    }

    #[test]
    fn read_only_rejects_assignment() {
        let mut set = VariableSet::new();
        let read_only_location = Location::dummy("readonly foo");
        set.assign(
            "foo",
            Variable::new("bar").make_read_only(read_only_location.clone()),
        )
        .unwrap();

        let e = set.assign("foo", Variable::new("baz")).unwrap_err();
        assert_eq!(e.name, "foo");
        assert_eq!(e.read_only_location, read_only_location);
        assert_eq!(e.new_value, Variable::new("baz"));
        assert_eq!(set.get_scalar("foo"), Some("bar"));
    }

    #[test]
    fn read_only_rejects_unset() {
        let mut set = VariableSet::new();
        set.assign(
            "foo",
            Variable::new("bar").make_read_only(Location::dummy("")),
        )
        .unwrap();
        let e = set.unset("foo").unwrap_err();
        assert_eq!(e.name, "foo");
        assert_eq!(set.get_scalar("foo"), Some("bar"));
    }

    #[test]
    fn unset_returns_old_value() {
        let mut set = VariableSet::new();
        set.assign("foo", Variable::new("bar")).unwrap();
        assert_eq!(set.unset("foo"), Ok(Some(Variable::new("bar"))));
        assert_eq!(set.unset("foo"), Ok(None));
    }

    #[test]
    fn names_with_prefix_sorted() {
        let mut set = VariableSet::new();
        for name in ["PATH", "PA", "PWD", "Q", "PATTERN"] {
            set.assign(name, Variable::new("")).unwrap();
        }
        assert_eq!(set.names_with_prefix("PA"), ["PA", "PATH", "PATTERN"]);
        assert_eq!(set.names_with_prefix("X"), [] as [&str; 0]);
    }

    #[test]
    fn positional_params_access() {
        let mut set = VariableSet::new();
        set.positional_params_mut().values = vec!["a".to_string(), "b".to_string()];
        assert_eq!(set.positional_params().get(0), None);
        assert_eq!(set.positional_params().get(1), Some("a"));
        assert_eq!(set.positional_params().get(2), Some("b"));
        assert_eq!(set.positional_params().get(3), None);
        assert_eq!(set.positional_params().count(), 2);
    }
}
