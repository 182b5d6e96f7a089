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

//! Type definitions for shell options
//!
//! This module defines the [`OptionSet`] struct, a map from [`Option`] to
//! [`State`]. The option set merely stores whether each option is on or
//! off; honoring the options is the consumers' business.

use enumset::EnumSet;
use enumset::EnumSetType;
use std::borrow::Cow;
use std::fmt::Display;
use std::fmt::Formatter;
use std::ops::Not;
use std::str::FromStr;

/// State of an option: either enabled or disabled.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum State {
    /// Enabled.
    On,
    /// Disabled.
    Off,
}

pub use State::*;

/// Converts a state to a string (`on` or `off`).
impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            On => "on",
            Off => "off",
        };
        s.fmt(f)
    }
}

impl Not for State {
    type Output = Self;
    #[must_use]
    fn not(self) -> Self {
        match self {
            On => Off,
            Off => On,
        }
    }
}

/// Shell option
#[derive(Clone, Copy, Debug, EnumSetType, Eq, Hash, PartialEq)]
#[enumset(no_super_impls)]
#[non_exhaustive]
pub enum Option {
    /// Performs brace expansion before the other expansions.
    BraceExpand,
    /// Lets `*` and `?` match a leading period in filenames.
    DotGlob,
    /// Makes the shell exit when a command returns a non-zero exit status.
    ErrExit,
    /// Makes subshells inherit the `ERR` trap.
    ErrTrace,
    /// Enables the extended glob syntax (`?(…)`, `!(…)`, …).
    ExtGlob,
    /// Makes a pattern matching no file an expansion error.
    FailGlob,
    /// Makes subshells inherit the `DEBUG` and `RETURN` traps.
    FuncTrace,
    /// Enables pathname expansion.
    Glob,
    /// Makes bracket ranges use ASCII ordering regardless of locale.
    GlobAsciiRanges,
    /// Lets `**` match any number of pathname components.
    GlobStar,
    /// Makes subshells run by command substitution inherit the `errexit`
    /// option.
    InheritErrExit,
    /// Enables features for interactive use.
    Interactive,
    /// Makes pattern matching case-insensitive.
    NoCaseMatch,
    /// Removes words whose pattern matches no file.
    NullGlob,
    /// Expands unset variables to an empty string rather than erroring out.
    Unset,
}

pub use self::Option::*;

impl Option {
    /// Returns the option name, all in lower case without punctuation.
    ///
    /// This function returns a string like `"braceexpand"` and `"glob"`.
    pub fn long_name(self) -> &'static str {
        match self {
            BraceExpand => "braceexpand",
            DotGlob => "dotglob",
            ErrExit => "errexit",
            ErrTrace => "errtrace",
            ExtGlob => "extglob",
            FailGlob => "failglob",
            FuncTrace => "functrace",
            Glob => "glob",
            GlobAsciiRanges => "globasciiranges",
            GlobStar => "globstar",
            InheritErrExit => "inheriterrexit",
            Interactive => "interactive",
            NoCaseMatch => "nocasematch",
            NullGlob => "nullglob",
            Unset => "unset",
        }
    }
}

/// Prints the option name, all in lower case without punctuation.
impl Display for Option {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.long_name().fmt(f)
    }
}

/// Error type indicating that a string does not name a valid option.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FromStrError {
    /// The input string does not match any option name.
    NoSuchOption,
    /// The input string is a prefix of more than one valid option name.
    Ambiguous,
}

pub use FromStrError::*;

/// Parses an option name.
///
/// The input string should be a canonical option name: all lowercase, no
/// punctuation. You can [canonicalize] the name before parsing it.
///
/// The option name may be abbreviated as long as it is an unambiguous
/// prefix of a valid option name. A full option name is never considered
/// ambiguous even if it is also a prefix of another valid name, as `glob`
/// is of `globstar`.
impl FromStr for Option {
    type Err = FromStrError;
    fn from_str(name: &str) -> Result<Self, FromStrError> {
        const OPTIONS: &[(&str, Option)] = &[
            ("braceexpand", BraceExpand),
            ("dotglob", DotGlob),
            ("errexit", ErrExit),
            ("errtrace", ErrTrace),
            ("extglob", ExtGlob),
            ("failglob", FailGlob),
            ("functrace", FuncTrace),
            ("glob", Glob),
            ("globasciiranges", GlobAsciiRanges),
            ("globstar", GlobStar),
            ("inheriterrexit", InheritErrExit),
            ("interactive", Interactive),
            ("nocasematch", NoCaseMatch),
            ("nullglob", NullGlob),
            ("unset", Unset),
        ];

        match OPTIONS.binary_search_by_key(&name, |&(full_name, _option)| full_name) {
            Ok(index) => Ok(OPTIONS[index].1),
            Err(index) => {
                let mut options = OPTIONS[index..]
                    .iter()
                    .filter(|&(full_name, _option)| full_name.starts_with(name));
                match options.next() {
                    Some(first) => match options.next() {
                        Some(_second) => Err(Ambiguous),
                        None => Ok(first.1),
                    },
                    None => Err(NoSuchOption),
                }
            }
        }
    }
}

/// Parses a short option name.
///
/// This function parses the single-character option names:
///
/// ```
/// # use shoal_env::option::{parse_short, Option::*, State::*};
/// assert_eq!(parse_short('B'), Some((BraceExpand, On)));
/// assert_eq!(parse_short('E'), Some((ErrTrace, On)));
/// assert_eq!(parse_short('T'), Some((FuncTrace, On)));
/// assert_eq!(parse_short('e'), Some((ErrExit, On)));
/// assert_eq!(parse_short('f'), Some((Glob, Off)));
/// assert_eq!(parse_short('i'), Some((Interactive, On)));
/// assert_eq!(parse_short('u'), Some((Unset, Off)));
/// ```
///
/// The name argument is case-sensitive. This function returns `None` if
/// the argument matches no short option name.
#[must_use]
pub fn parse_short(name: char) -> std::option::Option<(self::Option, State)> {
    match name {
        'B' => Some((BraceExpand, On)),
        'E' => Some((ErrTrace, On)),
        'T' => Some((FuncTrace, On)),
        'e' => Some((ErrExit, On)),
        'f' => Some((Glob, Off)),
        'i' => Some((Interactive, On)),
        'u' => Some((Unset, Off)),
        _ => None,
    }
}

/// Parses a long option name.
///
/// This function is similar to `impl FromStr for Option`, but allows
/// prefixing the option name with `no` to negate the state.
///
/// ```
/// # use shoal_env::option::{parse_long, FromStrError::NoSuchOption, Option::*, State::*};
/// assert_eq!(parse_long("nullglob"), Ok((NullGlob, On)));
/// assert_eq!(parse_long("nonullglob"), Ok((NullGlob, Off)));
/// assert_eq!(parse_long("llglob"), Err(NoSuchOption));
/// ```
pub fn parse_long(name: &str) -> Result<(Option, State), FromStrError> {
    if "no".starts_with(name) {
        return Err(Ambiguous);
    }

    let intact = Option::from_str(name);
    let without_no = name
        .strip_prefix("no")
        .ok_or(NoSuchOption)
        .and_then(Option::from_str);

    match (intact, without_no) {
        (Ok(option), Err(NoSuchOption)) => Ok((option, On)),
        (Err(NoSuchOption), Ok(option)) => Ok((option, Off)),
        (Err(Ambiguous), _) | (_, Err(Ambiguous)) => Err(Ambiguous),
        _ => Err(NoSuchOption),
    }
}

/// Canonicalizes an option name.
///
/// This function converts the string to lower case and removes
/// non-alphanumeric characters.
pub fn canonicalize(name: &str) -> Cow<'_, str> {
    if name
        .chars()
        .all(|c| c.is_alphanumeric() && !c.is_ascii_uppercase())
    {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(
            name.chars()
                .filter(|c| c.is_alphanumeric())
                .map(|c| c.to_ascii_lowercase())
                .collect(),
        )
    }
}

/// Set of the shell options and their states
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct OptionSet {
    enabled_options: EnumSet<Option>,
}

/// Defines the default option set.
///
/// The default set is not empty: `BraceExpand`, `Glob` and `Unset` are
/// enabled by default.
impl Default for OptionSet {
    fn default() -> Self {
        let enabled_options = BraceExpand | Glob | Unset;
        OptionSet { enabled_options }
    }
}

impl OptionSet {
    /// Creates an option set with all options disabled.
    #[must_use]
    pub fn empty() -> Self {
        OptionSet {
            enabled_options: EnumSet::empty(),
        }
    }

    /// Returns the current state of the option.
    #[must_use]
    pub fn get(&self, option: Option) -> State {
        if self.enabled_options.contains(option) {
            On
        } else {
            Off
        }
    }

    /// Changes the state of the option.
    pub fn set(&mut self, option: Option, state: State) {
        match state {
            On => self.enabled_options.insert(option),
            Off => self.enabled_options.remove(option),
        };
    }

    /// Returns the short-flag summary the `$-` special parameter expands
    /// to.
    ///
    /// Each character stands for an option whose current state equals the
    /// state its short flag selects.
    #[must_use]
    pub fn short_flags(&self) -> String {
        const FLAGS: &[char] = &['B', 'E', 'T', 'e', 'f', 'i', 'u'];
        FLAGS
            .iter()
            .copied()
            .filter(|&flag| {
                let (option, state) = parse_short(flag).unwrap();
                self.get(option) == state
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_states() {
        let set = OptionSet::default();
        assert_eq!(set.get(BraceExpand), On);
        assert_eq!(set.get(Glob), On);
        assert_eq!(set.get(Unset), On);
        assert_eq!(set.get(NullGlob), Off);
        assert_eq!(set.get(ErrExit), Off);
    }

    #[test]
    fn set_and_get() {
        let mut set = OptionSet::default();
        set.set(NullGlob, On);
        assert_eq!(set.get(NullGlob), On);
        set.set(NullGlob, Off);
        assert_eq!(set.get(NullGlob), Off);
    }

    #[test]
    fn parse_full_names() {
        assert_eq!("glob".parse(), Ok(Glob));
        assert_eq!("globstar".parse(), Ok(GlobStar));
        assert_eq!("unset".parse(), Ok(Unset));
        assert_eq!("bogus".parse::<Option>(), Err(NoSuchOption));
    }

    #[test]
    fn parse_abbreviated_names() {
        assert_eq!("brace".parse(), Ok(BraceExpand));
        assert_eq!("nu".parse(), Ok(NullGlob));
        assert_eq!("g".parse::<Option>(), Err(Ambiguous));
        assert_eq!("err".parse::<Option>(), Err(Ambiguous));
    }

    #[test]
    fn parse_long_with_no_prefix() {
        assert_eq!(parse_long("glob"), Ok((Glob, On)));
        assert_eq!(parse_long("noglob"), Ok((Glob, Off)));
        assert_eq!(parse_long("nocasematch"), Ok((NoCaseMatch, On)));
    }

    #[test]
    fn canonicalize_names() {
        assert_eq!(canonicalize("glob"), "glob");
        assert_eq!(canonicalize("Brace-Expand"), "braceexpand");
        assert_eq!(canonicalize("err_exit"), "errexit");
    }

    #[test]
    fn short_flag_summary() {
        let set = OptionSet::default();
        // Glob and Unset are on, so their off-selecting flags are absent.
        assert_eq!(set.short_flags(), "B");

        let mut set = set;
        set.set(ErrExit, On);
        set.set(Glob, Off);
        assert_eq!(set.short_flags(), "Bef");
    }
}
