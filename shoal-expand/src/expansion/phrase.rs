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

//! Array of fields as an intermediate expansion result
//!
//! This module defines [`Phrase`], the data type for intermediate
//! expansion results. A phrase is an array of (possibly zero) fields; a
//! field is a string of attributed characters ([`AttrChar`]).
//!
//! The most general form of a phrase is `Vec<Vec<AttrChar>>`, but most
//! expansions result in a single field, so `Phrase` has compact variants
//! holding one `Vec<AttrChar>` or one `AttrChar` to avoid allocations.
//!
//! Phrases are joined with [`append`](Phrase::append): the last field of
//! the first phrase and the first field of the second are concatenated
//! while the other fields remain intact, which is how `a"$@"b` attaches
//! `a` and `b` to the outer positional parameters.

use super::attr::AttrChar;
use super::attr::Origin;
use shoal_env::variable::{IFS, VariableSet};

/// Array of fields with optimized data structure
///
/// See the [module documentation](self).
#[derive(Clone, Debug, Eq)]
pub enum Phrase {
    /// Phrase having one field containing one character
    Char(AttrChar),
    /// Phrase made up of one field
    Field(Vec<AttrChar>),
    /// Phrase containing any number of fields
    Full(Vec<Vec<AttrChar>>),
}

use Phrase::*;

/// Compares phrases ignoring the data representation.
///
/// `Phrase::Char(c)` equals `Phrase::Field(vec![c])`, which in turn equals
/// `Phrase::Full(vec![vec![c]])`.
impl PartialEq for Phrase {
    #[must_use]
    fn eq(&self, other: &Phrase) -> bool {
        match (self, other) {
            (Char(left), Char(right)) => left == right,
            (Field(left), Field(right)) => left == right,
            (Full(left), Full(right)) => left == right,
            (Char(c), Field(f)) | (Field(f), Char(c)) => [*c].as_slice() == f.as_slice(),
            (Char(c), Full(v)) | (Full(v), Char(c)) => {
                matches!(v.as_slice(), [f] if [*c].as_slice() == f.as_slice())
            }
            (Field(f), Full(v)) | (Full(v), Field(f)) => {
                matches!(v.as_slice(), [fv] if f == fv)
            }
        }
    }
}

impl Phrase {
    /// Returns a phrase containing no fields.
    #[inline]
    #[must_use]
    pub fn zero_fields() -> Self {
        Full(Vec::new())
    }

    /// Returns a phrase containing one empty field.
    #[inline]
    #[must_use]
    pub fn one_empty_field() -> Self {
        Field(Vec::new())
    }

    /// Tests whether the phrase has no fields.
    #[must_use]
    pub fn is_zero_fields(&self) -> bool {
        matches!(self, Full(fields) if fields.is_empty())
    }

    /// Returns the number of fields in the phrase.
    #[must_use]
    pub fn field_count(&self) -> usize {
        match self {
            Char(_) | Field(_) => 1,
            Full(fields) => fields.len(),
        }
    }

    /// Converts the phrase into the general form.
    #[must_use]
    pub fn into_fields(self) -> Vec<Vec<AttrChar>> {
        match self {
            Char(c) => vec![vec![c]],
            Field(chars) => vec![chars],
            Full(fields) => fields,
        }
    }

    /// Applies a function to every character of the phrase.
    pub fn for_each_char_mut<F: FnMut(&mut AttrChar)>(&mut self, mut f: F) {
        match self {
            Char(c) => f(c),
            Field(chars) => chars.iter_mut().for_each(&mut f),
            Full(fields) => fields
                .iter_mut()
                .for_each(|chars| chars.iter_mut().for_each(&mut f)),
        }
    }

    /// Moves all fields of `other` into `self`, leaving `other` empty.
    ///
    /// This function joins two phrases into one, concatenating the last
    /// field of `self` with the first field of `other`. If either phrase
    /// is zero fields, the result is the other.
    pub fn append(&mut self, other: &mut Phrase) {
        match (&mut *self, &mut *other) {
            (Char(left), Char(right)) => {
                *self = Field(vec![*left, *right]);
                *other = Phrase::zero_fields();
            }
            (Char(left), Field(right)) => {
                right.insert(0, *left);
                *self = std::mem::replace(other, Phrase::zero_fields());
            }
            (Field(left), Char(right)) => {
                left.push(*right);
                *other = Phrase::zero_fields();
            }
            (Field(left), Field(right)) => {
                left.append(right);
                *other = Phrase::zero_fields();
            }
            (left, Full(right)) => {
                if let Some(right_first) = right.first_mut() {
                    match left {
                        Char(left) => {
                            right_first.insert(0, *left);
                            *self = std::mem::replace(other, Phrase::zero_fields());
                        }
                        Field(left) => {
                            left.append(right_first);
                            std::mem::swap(left, right_first);
                            *self = std::mem::replace(other, Phrase::zero_fields());
                        }
                        Full(left) => {
                            if let Some(left_last) = left.last_mut() {
                                left_last.append(right_first);
                                left.extend(right.drain(1..));
                                right.clear();
                            } else {
                                std::mem::swap(left, right);
                            }
                        }
                    }
                }
            }
            (Full(left), right) => {
                if let Some(left_last) = left.last_mut() {
                    match right {
                        Char(right) => left_last.push(*right),
                        Field(right) => left_last.append(right),
                        Full(_right) => unreachable!(),
                    }
                    *other = Phrase::zero_fields();
                } else {
                    std::mem::swap(self, other);
                }
            }
        }
    }

    /// Joins this phrase into a single field, separating the original
    /// fields by the first character of the `IFS` variable.
    ///
    /// If the variable is unset, fields are separated by a space. If it is
    /// set but empty, fields are joined without separation.
    #[must_use]
    pub fn ifs_join(self, vars: &VariableSet) -> Vec<AttrChar> {
        match self {
            Char(c) => vec![c],
            Field(chars) => chars,
            Full(fields) => {
                let separator = match vars.get_scalar(IFS) {
                    None => Some(' '),
                    Some(ifs) => ifs.chars().next(),
                };
                let mut chars = Vec::new();
                let mut first = true;
                for field in fields {
                    if first {
                        first = false;
                    } else if let Some(value) = separator {
                        chars.push(AttrChar {
                            value,
                            origin: Origin::SoftExpansion,
                            is_quoted: false,
                            is_quoting: false,
                        });
                    }
                    chars.extend(field);
                }
                chars
            }
        }
    }
}

impl From<AttrChar> for Phrase {
    fn from(c: AttrChar) -> Self {
        Char(c)
    }
}
impl From<Vec<AttrChar>> for Phrase {
    fn from(chars: Vec<AttrChar>) -> Self {
        Field(chars)
    }
}
impl From<Vec<Vec<AttrChar>>> for Phrase {
    fn from(fields: Vec<Vec<AttrChar>>) -> Self {
        Full(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoal_env::variable::Variable;

    fn dummy(value: char) -> AttrChar {
        AttrChar {
            value,
            origin: Origin::Literal,
            is_quoted: false,
            is_quoting: false,
        }
    }

    #[test]
    fn representation_independent_equality() {
        let c = dummy('c');
        assert_eq!(Char(c), Field(vec![c]));
        assert_eq!(Char(c), Full(vec![vec![c]]));
        assert_eq!(Field(vec![c]), Full(vec![vec![c]]));
        assert_ne!(Char(c), Phrase::zero_fields());
        assert_eq!(Phrase::one_empty_field(), Full(vec![vec![]]));
    }

    #[test]
    fn appending_single_field_phrases() {
        let a = dummy('a');
        let b = dummy('b');
        let mut left = Phrase::Char(a);
        let mut right = Phrase::Char(b);
        left.append(&mut right);
        assert_eq!(left, Field(vec![a, b]));
        assert!(right.is_zero_fields());
    }

    #[test]
    fn appending_multi_field_phrases() {
        let [a, b, c, d] = ['a', 'b', 'c', 'd'].map(dummy);
        let mut left = Full(vec![vec![a], vec![b]]);
        let mut right = Full(vec![vec![c], vec![d]]);
        left.append(&mut right);
        assert_eq!(left, Full(vec![vec![a], vec![b, c], vec![d]]));
        assert!(right.is_zero_fields());
    }

    #[test]
    fn appending_zero_fields() {
        let a = dummy('a');
        let mut left = Phrase::Char(a);
        let mut right = Phrase::zero_fields();
        left.append(&mut right);
        assert_eq!(left, Char(a));

        let mut left = Phrase::zero_fields();
        let mut right = Phrase::Char(a);
        left.append(&mut right);
        assert_eq!(left, Char(a));
    }

    #[test]
    fn appending_empty_fields_keeps_one() {
        let mut left = Phrase::one_empty_field();
        let mut right = Phrase::one_empty_field();
        left.append(&mut right);
        assert_eq!(left, Phrase::one_empty_field());
        assert_eq!(right, Phrase::zero_fields());
    }

    #[test]
    fn ifs_join_with_default_separator() {
        let vars = VariableSet::new();
        let [a, b] = ['a', 'b'].map(dummy);
        let phrase = Full(vec![vec![a], vec![b]]);
        let joined = phrase.ifs_join(&vars);
        let values: String = joined.iter().map(|c| c.value).collect();
        assert_eq!(values, "a b");
    }

    #[test]
    fn ifs_join_with_custom_separator() {
        let mut vars = VariableSet::new();
        vars.assign("IFS", Variable::new(":,")).unwrap();
        let [a, b] = ['a', 'b'].map(dummy);
        let phrase = Full(vec![vec![a], vec![b]]);
        let joined = phrase.ifs_join(&vars);
        let values: String = joined.iter().map(|c| c.value).collect();
        assert_eq!(values, "a:b");
    }

    #[test]
    fn ifs_join_with_empty_ifs() {
        let mut vars = VariableSet::new();
        vars.assign("IFS", Variable::new("")).unwrap();
        let [a, b] = ['a', 'b'].map(dummy);
        let phrase = Full(vec![vec![a], vec![b]]);
        let joined = phrase.ifs_join(&vars);
        let values: String = joined.iter().map(|c| c.value).collect();
        assert_eq!(values, "ab");
    }
}
