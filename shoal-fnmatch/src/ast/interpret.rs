// This file is part of shoal, a POSIX-compatible command-line shell.
// Copyright (C) 2025 the shoal authors

//! Backtracking AST matcher
//!
//! The regex crate has no complement operator, so patterns containing a
//! negative extended-glob group (`!(…)`) cannot be compiled to a regular
//! expression. This module matches such patterns by interpreting the AST
//! directly, in the classic recursive fnmatch style: each atom consumes some
//! characters and the remainder of the pattern is tried against the
//! remainder of the string, backtracking over every possible split.

use super::*;
use crate::Config;

/// Matches the whole string against the whole pattern.
pub(crate) fn full_match(ast: &Ast, s: &str, config: &Config) -> bool {
    let chars: Vec<char> = s.chars().collect();
    Interp { config }.seq_match(&ast.atoms, &chars)
}

struct Interp<'a> {
    config: &'a Config,
}

impl Interp<'_> {
    fn char_eq(&self, a: char, b: char) -> bool {
        if self.config.case_insensitive {
            a == b || fold(a) == fold(b)
        } else {
            a == b
        }
    }

    fn seq_match(&self, atoms: &[Atom], s: &[char]) -> bool {
        let Some((atom, rest)) = atoms.split_first() else {
            return s.is_empty();
        };
        match atom {
            Atom::Char(c) => match s.split_first() {
                Some((head, tail)) => self.char_eq(*head, *c) && self.seq_match(rest, tail),
                None => false,
            },
            Atom::AnyChar => !s.is_empty() && self.seq_match(rest, &s[1..]),
            Atom::AnyString => (0..=s.len()).any(|k| self.seq_match(rest, &s[k..])),
            Atom::Bracket(bracket) => match self.bracket_match(bracket, s) {
                Some(consumed) => self.seq_match(rest, &s[consumed..]),
                None => false,
            },
            Atom::ExtGlob { kind, alternatives } => {
                self.ext_match(*kind, alternatives, rest, s)
            }
        }
    }

    fn ext_match(&self, kind: ExtKind, alternatives: &[Ast], rest: &[Atom], s: &[char]) -> bool {
        match kind {
            ExtKind::Exactly => self.once_then(alternatives, rest, s),
            ExtKind::ZeroOrOne => {
                self.seq_match(rest, s) || self.once_then(alternatives, rest, s)
            }
            ExtKind::ZeroOrMore => self.repeat_then(alternatives, rest, s, 0),
            ExtKind::OneOrMore => self.repeat_then(alternatives, rest, s, 1),
            ExtKind::Not => (0..=s.len()).any(|k| {
                !self.any_alternative(alternatives, &s[..k]) && self.seq_match(rest, &s[k..])
            }),
        }
    }

    /// One occurrence of any alternative, then the rest of the pattern.
    fn once_then(&self, alternatives: &[Ast], rest: &[Atom], s: &[char]) -> bool {
        (0..=s.len()).any(|k| {
            self.any_alternative(alternatives, &s[..k]) && self.seq_match(rest, &s[k..])
        })
    }

    /// At least `min` occurrences of the alternatives, then the rest.
    fn repeat_then(&self, alternatives: &[Ast], rest: &[Atom], s: &[char], min: usize) -> bool {
        if min == 0 && self.seq_match(rest, s) {
            return true;
        }
        // Each round must consume at least one character or the recursion
        // would never terminate.
        (1..=s.len()).any(|k| {
            self.any_alternative(alternatives, &s[..k])
                && self.repeat_then(alternatives, rest, &s[k..], min.saturating_sub(1))
        })
    }

    fn any_alternative(&self, alternatives: &[Ast], s: &[char]) -> bool {
        alternatives.iter().any(|a| self.seq_match(&a.atoms, s))
    }

    /// Returns the number of characters the bracket expression consumes, or
    /// `None` if it does not match at the start of `s`.
    fn bracket_match(&self, bracket: &Bracket, s: &[char]) -> Option<usize> {
        let head = *s.first()?;
        let mut matched = false;
        let mut consumed = 1;
        for item in &bracket.items {
            match item {
                BracketItem::Atom(BracketAtom::Char(c)) => {
                    if self.char_eq(head, *c) {
                        matched = true;
                    }
                }
                BracketItem::Atom(
                    BracketAtom::CollatingSymbol(value) | BracketAtom::EquivalenceClass(value),
                ) => {
                    let mut value_chars = value.chars();
                    match (value_chars.next(), value_chars.next()) {
                        (Some(only), None) => {
                            if self.char_eq(head, only) {
                                matched = true;
                            }
                        }
                        // A multi-character symbol consumes its whole
                        // sequence; complemented brackets ignore it.
                        (Some(_), Some(_)) if !bracket.complement => {
                            let n = value.chars().count();
                            if s.len() >= n
                                && s[..n]
                                    .iter()
                                    .zip(value.chars())
                                    .all(|(&a, b)| self.char_eq(a, b))
                            {
                                matched = true;
                                consumed = consumed.max(n);
                            }
                        }
                        _ => {}
                    }
                }
                BracketItem::Atom(BracketAtom::CharClass(class)) => {
                    if class_contains(class, head) {
                        matched = true;
                    }
                }
                BracketItem::Range(range) => {
                    let start = first_char(range.start());
                    let end = first_char(range.end());
                    if let (Some(start), Some(end)) = (start, end) {
                        if (start..=end).contains(&head)
                            || (self.config.case_insensitive
                                && (start..=end).contains(&fold(head)))
                        {
                            matched = true;
                        }
                    }
                }
            }
        }
        if matched != bracket.complement {
            Some(if matched { consumed } else { 1 })
        } else {
            None
        }
    }
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn first_char(atom: &BracketAtom) -> Option<char> {
    match atom {
        BracketAtom::Char(c) => Some(*c),
        BracketAtom::CollatingSymbol(value) | BracketAtom::EquivalenceClass(value) => {
            value.chars().next()
        }
        BracketAtom::CharClass(_) => None,
    }
}

fn class_contains(class: &str, c: char) -> bool {
    match class {
        "alnum" => c.is_ascii_alphanumeric(),
        "alpha" => c.is_ascii_alphabetic(),
        "ascii" => c.is_ascii(),
        "blank" => c == ' ' || c == '\t',
        "cntrl" => c.is_ascii_control(),
        "digit" => c.is_ascii_digit(),
        "graph" => c.is_ascii_graphic(),
        "lower" => c.is_ascii_lowercase(),
        "print" => c.is_ascii_graphic() || c == ' ',
        "punct" => c.is_ascii_punctuation(),
        "space" => c.is_ascii_whitespace(),
        "upper" => c.is_ascii_uppercase(),
        "word" => c.is_ascii_alphanumeric() || c == '_',
        "xdigit" => c.is_ascii_hexdigit(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::without_escape;

    fn config() -> Config {
        Config {
            extglob: true,
            ..Config::default()
        }
    }

    fn matches(pattern: &str, s: &str) -> bool {
        let ast = Ast::with_config(without_escape(pattern), &config()).unwrap();
        full_match(&ast, s, &config())
    }

    #[test]
    fn plain_atoms() {
        assert!(matches("abc", "abc"));
        assert!(!matches("abc", "abd"));
        assert!(matches("a?c", "abc"));
        assert!(matches("a*c", "ac"));
        assert!(matches("a*c", "a///c"));
        assert!(!matches("a*c", "a///d"));
        assert!(matches("[ab]x", "bx"));
        assert!(!matches("[!ab]x", "bx"));
    }

    #[test]
    fn negative_group_alone() {
        assert!(matches("!(foo)", "bar"));
        assert!(matches("!(foo)", ""));
        assert!(!matches("!(foo)", "foo"));
        assert!(matches("!(foo|bar)", "baz"));
        assert!(!matches("!(foo|bar)", "bar"));
    }

    #[test]
    fn negative_group_with_context() {
        assert!(matches("a.!(c)", "a.d"));
        assert!(!matches("a.!(c)", "a.c"));
        // The negated part may match empty or longer substrings.
        assert!(matches("a.!(c)", "a.cc"));
        assert!(matches("a.!(c)", "a."));
    }

    #[test]
    fn repetition_groups() {
        assert!(matches("+(ab)", "ababab"));
        assert!(!matches("+(ab)", ""));
        assert!(matches("*(ab)", ""));
        assert!(matches("?(ab)c", "c"));
        assert!(matches("?(ab)c", "abc"));
        assert!(!matches("?(ab)c", "ababc"));
        assert!(matches("@(a|bc)d", "bcd"));
        assert!(!matches("@(a|bc)d", "abcd"));
    }

    #[test]
    fn case_insensitive_matching() {
        let ci = Config {
            case_insensitive: true,
            extglob: true,
            ..Config::default()
        };
        let ast = Ast::with_config(without_escape("a[b-d]!(x)"), &ci).unwrap();
        assert!(full_match(&ast, "AC", &ci));
        assert!(full_match(&ast, "aCy", &ci));
        assert!(!full_match(&ast, "acX", &ci));
    }

    #[test]
    fn multi_character_collating_symbol() {
        assert!(matches("[[.ch.]]at", "chat"));
        assert!(!matches("[[.ch.]]at", "cat"));
    }

    #[test]
    fn character_classes() {
        assert!(matches("[[:digit:]]!(x)", "5y"));
        assert!(!matches("[[:digit:]]!(x)", "ay"));
    }
}
