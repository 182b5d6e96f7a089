// This file is part of shoal, a POSIX-compatible command-line shell.
// Copyright (C) 2025 the shoal authors

//! Abstract syntax tree for globbing patterns

mod interpret;
mod parse;
mod regex;

pub(crate) use interpret::full_match;

use crate::Config;
use crate::Error;
use crate::PatternChar;
use std::ops::RangeInclusive;

/// Bracket expression component
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketAtom {
    /// Literal character
    Char(char),
    /// Collating symbol (`[.x.]`)
    CollatingSymbol(String),
    /// Equivalence class (`[=x=]`)
    EquivalenceClass(String),
    /// Character class (`[:digit:]`)
    ///
    /// The string is a class name that has been verified against the POSIX
    /// class list, so it can be embedded in a regular expression as is.
    CharClass(String),
}

impl From<char> for BracketAtom {
    fn from(c: char) -> Self {
        BracketAtom::Char(c)
    }
}

/// Bracket expression component
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketItem {
    /// Atom
    Atom(BracketAtom),
    /// Character range
    ///
    /// Range endpoints compare by Unicode scalar value, which is ASCII
    /// ordering for ASCII operands. Locale collation is not modeled.
    Range(RangeInclusive<BracketAtom>),
}

impl<T: Into<BracketAtom>> From<T> for BracketItem {
    fn from(value: T) -> Self {
        BracketItem::Atom(value.into())
    }
}
impl From<RangeInclusive<BracketAtom>> for BracketItem {
    fn from(range: RangeInclusive<BracketAtom>) -> Self {
        BracketItem::Range(range)
    }
}

/// Bracket expression
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bracket {
    /// Whether there is an initial `!` or `^`
    ///
    /// When the bracket expression starts with an `!` or `^`, the set of
    /// matching characters is inverted.
    pub complement: bool,

    /// Content of the bracket expression
    pub items: Vec<BracketItem>,
}

/// Repetition operator of an extended-glob group
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ExtKind {
    /// `?(…)` - zero or one occurrence
    ZeroOrOne,
    /// `*(…)` - zero or more occurrences
    ZeroOrMore,
    /// `+(…)` - one or more occurrences
    OneOrMore,
    /// `@(…)` - exactly one occurrence
    Exactly,
    /// `!(…)` - anything except the given patterns
    Not,
}

/// Pattern component
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Atom {
    /// Literal character
    Char(char),
    /// Pattern that matches a single character (`?`)
    AnyChar,
    /// Pattern that matches any string (`*`)
    AnyString,
    /// Bracket expression
    Bracket(Bracket),
    /// Extended-glob group (`?(…)`, `*(…)`, `+(…)`, `@(…)`, `!(…)`)
    ///
    /// Only produced when the parser runs with [`Config::extglob`] enabled.
    ExtGlob {
        kind: ExtKind,
        alternatives: Vec<Ast>,
    },
}

/// Abstract syntax tree for a whole pattern
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Ast {
    /// Content of the pattern
    pub atoms: Vec<Atom>,
}

impl Ast {
    /// Creates a pattern with the default configuration.
    #[inline]
    pub fn new<I>(pattern: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = PatternChar>,
        <I as IntoIterator>::IntoIter: Clone,
    {
        Self::with_config(pattern, &Config::default())
    }

    /// Creates a pattern, honoring the `extglob` setting of the
    /// configuration.
    pub fn with_config<I>(pattern: I, config: &Config) -> Result<Self, Error>
    where
        I: IntoIterator<Item = PatternChar>,
        <I as IntoIterator>::IntoIter: Clone,
    {
        let mut atoms = Vec::new();
        let mut i = pattern.into_iter();
        while let Some((atom, j)) = Atom::parse(i, config)? {
            atoms.push(atom);
            i = j;
        }
        Ok(Ast { atoms })
    }

    /// Whether this pattern can only be matched by the AST interpreter.
    ///
    /// A negative extended-glob group has no equivalent in the regex crate's
    /// syntax, so patterns containing one bypass regex compilation.
    #[must_use]
    pub(crate) fn requires_interpreter(&self) -> bool {
        fn atom_requires(atom: &Atom) -> bool {
            match atom {
                Atom::Char(_) | Atom::AnyChar | Atom::AnyString | Atom::Bracket(_) => false,
                Atom::ExtGlob { kind, alternatives } => {
                    *kind == ExtKind::Not
                        || alternatives.iter().any(Ast::requires_interpreter)
                }
            }
        }
        self.atoms.iter().any(atom_requires)
    }

    /// Returns the literal string this pattern is equivalent to, if any.
    ///
    /// A pattern consisting of `Char` atoms only always matches exactly one
    /// string.
    #[must_use]
    pub(crate) fn to_literal(&self) -> Option<String> {
        self.atoms
            .iter()
            .map(|atom| match atom {
                Atom::Char(c) => Some(*c),
                _ => None,
            })
            .collect()
    }
}
