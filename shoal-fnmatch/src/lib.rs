// This file is part of shoal, a POSIX-compatible command-line shell.
// Copyright (C) 2025 the shoal authors

//! This crate performs pattern matching based on shell globbing patterns.
//!
//! The supported pattern syntax is:
//!
//! - Any single character (`?`)
//! - Any character sequence (`*`)
//! - Bracket expression (`[...]`)
//!     - Character literals
//!     - Character ranges (e.g. `a-z`)
//!     - Complement (`[!...]` or `[^...]`)
//!     - Collating symbols (e.g. `[.ch.]`)
//!     - Equivalence classes (e.g. `[=a=]`)
//!     - Character classes (e.g. `[:alpha:]`)
//! - Extended-glob groups (`?(…)`, `*(…)`, `+(…)`, `@(…)`, `!(…)`) when
//!   enabled with [`Config::extglob`]
//!
//! Patterns are compiled to regular expressions where possible. A pattern
//! containing a negative extended-glob group has no regex equivalent and is
//! matched by a backtracking AST interpreter instead.
//!
//! The implementation is locale-independent: character classes match ASCII
//! characters, bracket ranges compare by Unicode scalar value (ASCII
//! ordering for ASCII operands), and collating symbols and equivalence
//! classes only match their own character sequence. The
//! [`ascii_ranges`](Config::ascii_ranges) knob exists for shell-option
//! parity; both settings produce scalar-value ordering.
//!
//! # Example
//!
//! ```
//! # use shoal_fnmatch::{Config, Pattern, without_escape};
//! let p = Pattern::parse(without_escape("a*c")).unwrap();
//! assert!(p.is_match("abc"));
//! assert!(p.is_match("ac"));
//! assert!(!p.is_match("abd"));
//! ```

pub mod ast;
mod char_iter;

pub use char_iter::{PatternChar, WithEscape, WithoutEscape, with_escape, without_escape};

use ast::Ast;
use thiserror::Error;

/// Error that may happen in pattern parsing and compilation
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A bracket expression containing no items
    #[error("empty bracket expression")]
    EmptyBracket,

    /// An empty collating symbol or equivalence class
    #[error("empty collating symbol or equivalence class")]
    EmptyCollatingSymbol,

    /// A character class used as a range endpoint
    #[error("character class `[:{0}:]` used in a character range")]
    CharClassInRange(String),

    /// A character class with an unsupported name
    #[error("undefined character class `[:{0}:]`")]
    UndefinedCharClass(String),

    /// The generated regular expression failed to compile
    #[error("pattern too complex: {0}")]
    CompileFailure(String),
}

/// Configuration for a pattern
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub struct Config {
    /// Whether a leading period must be matched literally
    ///
    /// When `true`, a `.` at the start of the subject string is only matched
    /// by a literal `.` at the start of the pattern, as in pathname expansion
    /// without the `dotglob` shell option.
    pub literal_period: bool,

    /// Whether matching is case-insensitive
    pub case_insensitive: bool,

    /// Whether the extended-glob groups are recognized in the pattern
    pub extglob: bool,

    /// Whether bracket ranges use ASCII ordering regardless of locale
    ///
    /// Accepted for shell-option parity; ranges always compare by scalar
    /// value, which is ASCII ordering for ASCII operands.
    pub ascii_ranges: bool,
}

#[derive(Clone, Debug)]
enum Matcher {
    /// The pattern contains no special atoms and equals this string.
    Literal(String),
    /// Compiled regular expression, fully anchored.
    Regex(regex::Regex),
    /// The pattern requires the backtracking AST interpreter.
    Interpret,
}

/// Compiled glob pattern
///
/// A `Pattern` always matches whole strings: [`is_match`](Self::is_match)
/// reports a full match, and the prefix/suffix operations test whole
/// prefixes and suffixes of the subject. This mirrors how the shell uses
/// patterns in `case`, parameter expansion and pathname expansion.
#[derive(Clone, Debug)]
pub struct Pattern {
    ast: Ast,
    config: Config,
    matcher: Matcher,
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.ast == other.ast && self.config == other.config
    }
}

impl Pattern {
    /// Compiles a pattern with the default configuration.
    #[inline]
    pub fn parse<I>(pattern: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = PatternChar>,
        <I as IntoIterator>::IntoIter: Clone,
    {
        Self::parse_with_config(pattern, Config::default())
    }

    /// Compiles a pattern with the given configuration.
    pub fn parse_with_config<I>(pattern: I, config: Config) -> Result<Self, Error>
    where
        I: IntoIterator<Item = PatternChar>,
        <I as IntoIterator>::IntoIter: Clone,
    {
        let ast = Ast::with_config(pattern, &config)?;

        // Compiling also validates bracket expressions, so it runs even for
        // patterns that will be matched by the interpreter.
        let body = ast.to_regex()?;

        let matcher = if ast.requires_interpreter() {
            Matcher::Interpret
        } else if let Some(literal) = ast.to_literal() {
            if config.case_insensitive {
                Matcher::Regex(compile(&body, &config)?)
            } else {
                Matcher::Literal(literal)
            }
        } else {
            Matcher::Regex(compile(&body, &config)?)
        };

        Ok(Pattern {
            ast,
            config,
            matcher,
        })
    }

    /// Returns the configuration this pattern was compiled with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Tests whether the whole string matches the pattern.
    #[must_use]
    pub fn is_match(&self, s: &str) -> bool {
        if self.config.literal_period
            && s.starts_with('.')
            && !matches!(self.ast.atoms.first(), Some(ast::Atom::Char('.')))
        {
            return false;
        }
        match &self.matcher {
            Matcher::Literal(literal) => s == literal,
            Matcher::Regex(regex) => regex.is_match(s),
            Matcher::Interpret => ast::full_match(&self.ast, s, &self.config),
        }
    }

    /// Finds a matching prefix of the string.
    ///
    /// Prefix cut positions are scanned from the short end upward; the first
    /// match is returned when `longest` is `false` and the last when it is
    /// `true`. The return value is the byte length of the matched prefix.
    /// A zero-length match is not reported since removing it would be a
    /// no-op.
    #[must_use]
    pub fn match_prefix(&self, s: &str, longest: bool) -> Option<usize> {
        let mut found = None;
        for &i in &boundaries(s)[1..] {
            if self.is_match(&s[..i]) {
                if !longest {
                    return Some(i);
                }
                found = Some(i);
            }
        }
        found
    }

    /// Finds a matching suffix of the string.
    ///
    /// Symmetric to [`match_prefix`](Self::match_prefix): the return value is
    /// the byte length of the matched suffix, the shortest or longest one
    /// depending on `longest`.
    #[must_use]
    pub fn match_suffix(&self, s: &str, longest: bool) -> Option<usize> {
        let mut found = None;
        let cuts = boundaries(s);
        for &i in cuts[..cuts.len() - 1].iter().rev() {
            if self.is_match(&s[i..]) {
                if !longest {
                    return Some(s.len() - i);
                }
                found = Some(s.len() - i);
            }
        }
        found
    }

    /// Returns the literal string the pattern is equivalent to, if any.
    ///
    /// A pattern without special atoms matches exactly one string; callers
    /// such as pathname expansion use this to skip directory scanning.
    pub fn into_literal(self) -> Result<String, Self> {
        match self.matcher {
            Matcher::Literal(literal) => Ok(literal),
            _ => Err(self),
        }
    }
}

/// All char boundaries of `s` including 0 and `s.len()`, in ascending order.
fn boundaries(s: &str) -> Vec<usize> {
    let mut cuts: Vec<usize> = s.char_indices().map(|(i, _)| i).collect();
    cuts.push(s.len());
    cuts
}

fn compile(body: &str, config: &Config) -> Result<regex::Regex, Error> {
    let flags = if config.case_insensitive { "si" } else { "s" };
    let anchored = format!(r"\A(?{flags}:{body})\z");
    regex::Regex::new(&anchored).map_err(|e| Error::CompileFailure(e.to_string()))
}
