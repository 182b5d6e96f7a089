// This file is part of shoal, a POSIX-compatible command-line shell.
// Copyright (C) 2025 the shoal authors

//! Conversion to regular expression

use super::*;
use crate::Error;
use std::fmt::Write;

type Result = std::result::Result<(), Error>;

const SPECIAL_CHARS: &str = r"\.+*?()|[]{}^$";
const BRACKET_SPECIAL_CHARS: &str = "-&~";

impl BracketAtom {
    fn fmt_regex_char(c: char, regex: &mut dyn Write) -> Result {
        if BRACKET_SPECIAL_CHARS.contains(c) || SPECIAL_CHARS.contains(c) {
            regex.write_char('\\').unwrap();
        }
        regex.write_char(c).unwrap();
        Ok(())
    }

    fn matches_multi_character(&self) -> bool {
        match self {
            BracketAtom::CollatingSymbol(value) | BracketAtom::EquivalenceClass(value) => {
                value.chars().count() > 1
            }
            _ => false,
        }
    }

    fn fmt_regex(&self, regex: &mut dyn Write) -> Result {
        match self {
            BracketAtom::Char(c) => return BracketAtom::fmt_regex_char(*c, regex),
            BracketAtom::CollatingSymbol(value) | BracketAtom::EquivalenceClass(value) => {
                if !value.is_empty() {
                    regex.write_str(value)
                } else {
                    return Err(Error::EmptyCollatingSymbol);
                }
            }
            BracketAtom::CharClass(class) => regex.write_fmt(format_args!("[:{class}:]")),
        }
        .unwrap();
        Ok(())
    }

    fn fmt_regex_single(&self, regex: &mut dyn Write) -> Result {
        match self {
            BracketAtom::Char(c) => BracketAtom::fmt_regex_char(*c, regex),
            BracketAtom::CollatingSymbol(value) | BracketAtom::EquivalenceClass(value) => {
                let c = value.chars().next().ok_or(Error::EmptyCollatingSymbol)?;
                BracketAtom::fmt_regex_char(c, regex)
            }
            BracketAtom::CharClass(class) => Err(Error::CharClassInRange(class.clone())),
        }
    }
}

impl BracketItem {
    fn matches_multi_character(&self) -> bool {
        match self {
            BracketItem::Atom(a) => a.matches_multi_character(),
            BracketItem::Range(_) => false,
        }
    }

    fn fmt_regex(&self, regex: &mut dyn Write) -> Result {
        match self {
            BracketItem::Atom(a) => a.fmt_regex(regex),
            BracketItem::Range(range) => {
                range.start().fmt_regex_single(regex)?;
                regex.write_char('-').unwrap();
                range.end().fmt_regex_single(regex)
            }
        }
    }
}

impl Bracket {
    fn matches_multi_character(&self) -> bool {
        self.items.iter().any(BracketItem::matches_multi_character)
    }

    fn fmt_regex(&self, regex: &mut dyn Write) -> Result {
        if self.items.is_empty() {
            return Err(Error::EmptyBracket);
        }
        if !self.matches_multi_character() {
            regex.write_char('[').unwrap();
            if self.complement {
                regex.write_char('^').unwrap();
            }
            for item in &self.items {
                item.fmt_regex(regex)?;
            }
            regex.write_char(']').unwrap();
        } else if !self.complement {
            regex.write_str("(?:").unwrap();
            let mut first = true;
            for item in &self.items {
                if first {
                    first = false;
                } else {
                    regex.write_char('|').unwrap();
                }

                if !item.matches_multi_character() {
                    regex.write_char('[').unwrap();
                    item.fmt_regex(regex)?;
                    regex.write_char(']').unwrap();
                } else {
                    item.fmt_regex(regex)?;
                }
            }
            regex.write_char(')').unwrap();
        } else {
            // A complemented bracket cannot match more characters than one, so
            // multi-character collating symbols are dropped from the set.
            regex.write_str("[^").unwrap();
            for item in &self.items {
                if !item.matches_multi_character() {
                    item.fmt_regex(regex)?;
                }
            }
            regex.write_char(']').unwrap();
        }
        Ok(())
    }
}

impl Atom {
    fn fmt_regex(&self, regex: &mut dyn Write) -> Result {
        match self {
            Atom::Char(c) => {
                if SPECIAL_CHARS.contains(*c) {
                    regex.write_char('\\').unwrap();
                }
                regex.write_char(*c).unwrap();
            }
            Atom::AnyChar => regex.write_char('.').unwrap(),
            Atom::AnyString => regex.write_str(".*").unwrap(),
            Atom::Bracket(bracket) => bracket.fmt_regex(regex)?,
            Atom::ExtGlob { kind, alternatives } => {
                // `!(…)` is formatted like `@(…)` here. The result is used for
                // validation only; patterns containing a negation are matched
                // by the AST interpreter, never by the generated regex.
                regex.write_str("(?:").unwrap();
                let mut first = true;
                for alternative in alternatives {
                    if first {
                        first = false;
                    } else {
                        regex.write_char('|').unwrap();
                    }
                    alternative.fmt_regex(regex)?;
                }
                regex.write_char(')').unwrap();
                match kind {
                    ExtKind::ZeroOrOne => regex.write_char('?').unwrap(),
                    ExtKind::ZeroOrMore => regex.write_char('*').unwrap(),
                    ExtKind::OneOrMore => regex.write_char('+').unwrap(),
                    ExtKind::Exactly | ExtKind::Not => {}
                }
            }
        }
        Ok(())
    }
}

impl Ast {
    /// Writes the AST as a regular expression.
    pub(crate) fn fmt_regex(&self, regex: &mut dyn Write) -> Result {
        self.atoms.iter().try_for_each(|atom| atom.fmt_regex(regex))
    }

    /// Converts the AST to a regular expression.
    ///
    /// The result contains no anchors or flags; the caller adds them.
    pub(crate) fn to_regex(&self) -> std::result::Result<String, Error> {
        let mut regex = String::new();
        self.fmt_regex(&mut regex)?;
        Ok(regex)
    }
}
