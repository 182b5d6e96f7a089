// This file is part of shoal, a POSIX-compatible command-line shell.
// Copyright (C) 2025 the shoal authors

//! This crate provides a function that quotes a string so that a POSIX shell
//! reading the result back expands it to a single field with the original
//! value.
//!
//! The [`quoted`] function chooses a quoting style by these rules:
//!
//! - If the string is non-empty and contains no character that needs quoting,
//!   it is returned intact.
//! - Otherwise, if the string contains a non-printing character, the whole
//!   string becomes a dollar-single-quoted string (`$'…'`) with backslash
//!   escapes for the non-printing characters.
//! - Otherwise, the whole string is single-quoted, with every single quote
//!   spliced out as `'\''`.
//!
//! Characters that need quoting are the shell metacharacters (`;`, `&`, `|`,
//! `(`, `)`, `<`, `>`), whitespace, the quoting and expansion characters
//! (`$`, `` ` ``, `\`, `"`, `'`), globbing characters (`*`, `?`, `[`), `=`,
//! a leading `#` or `~`, and `{` followed by `}`.
//!
//! # Examples
//!
//! ```
//! # use std::borrow::Cow::{Borrowed, Owned};
//! # use shoal_quote::quoted;
//! assert_eq!(quoted("foo"), Borrowed("foo"));
//! assert_eq!(quoted(""), Owned::<str>("''".to_owned()));
//! assert_eq!(quoted("a b"), Owned::<str>("'a b'".to_owned()));
//! assert_eq!(quoted("don't"), Owned::<str>(r"'don'\''t'".to_owned()));
//! assert_eq!(quoted("a\tb"), Owned::<str>(r"$'a\tb'".to_owned()));
//! ```

use std::borrow::Cow::{self, Borrowed, Owned};

/// Quotes the argument for safe re-input to the shell.
///
/// If the argument needs no quoting, the return value is `Borrowed(s)`.
/// Otherwise, it is `Owned(_)` containing a newly quoted string.
///
/// See the [crate doc](self) for the quoting style selection rules.
#[must_use]
pub fn quoted(s: &str) -> Cow<'_, str> {
    if !s.is_empty() && !needs_quoting(s) {
        return Borrowed(s);
    }

    if s.chars().any(is_unprintable) {
        return Owned(dollar_quoted(s));
    }

    let mut result = String::with_capacity(s.len() + 2);
    result.push('\'');
    for c in s.chars() {
        if c == '\'' {
            result.push_str(r"'\''");
        } else {
            result.push(c);
        }
    }
    result.push('\'');
    Owned(result)
}

/// Builds a `$'…'` representation of the string.
fn dollar_quoted(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 3);
    result.push_str("$'");
    for c in s.chars() {
        match c {
            '\\' => result.push_str(r"\\"),
            '\'' => result.push_str(r"\'"),
            '\u{7}' => result.push_str(r"\a"),
            '\u{8}' => result.push_str(r"\b"),
            '\u{1B}' => result.push_str(r"\e"),
            '\u{C}' => result.push_str(r"\f"),
            '\n' => result.push_str(r"\n"),
            '\r' => result.push_str(r"\r"),
            '\t' => result.push_str(r"\t"),
            '\u{B}' => result.push_str(r"\v"),
            c if is_unprintable(c) => {
                for unit in c.to_string().bytes() {
                    result.push_str(&format!("\\x{unit:02X}"));
                }
            }
            c => result.push(c),
        }
    }
    result.push('\'');
    result
}

fn is_unprintable(c: char) -> bool {
    c.is_control()
}

/// Returns true iff the string contains any character that needs quoting.
fn needs_quoting(s: &str) -> bool {
    if s.chars().any(char_needs_quoting) {
        return true;
    }

    // a leading `#` or `~` would start a comment or tilde expansion
    if let Some(c) = s.chars().next() {
        if c == '#' || c == '~' {
            return true;
        }
    }

    // `{` preceding `}` could be subject to brace expansion
    if let Some(i) = s.find('{') {
        if s[i + 1..].contains('}') {
            return true;
        }
    }

    false
}

fn char_needs_quoting(c: char) -> bool {
    match c {
        ';' | '&' | '|' | '(' | ')' | '<' | '>' => true,
        '$' | '`' | '\\' | '"' | '\'' => true,
        '=' | '*' | '?' | '[' => true,
        _ => c.is_whitespace() || c.is_control(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_quoting_needed() {
        fn test(s: &str) {
            assert_eq!(quoted(s), Borrowed(s));
        }
        test("a");
        test("bin/ls");
        test("word");
        test("3.14");
        test("/usr/local/bin");
        test("a#b");
        test("x~y");
        test("{}");
        test("}{");
    }

    #[test]
    fn empty_string() {
        assert_eq!(quoted(""), Owned::<str>("''".to_owned()));
    }

    #[test]
    fn single_quoting() {
        fn test(s: &str, expected: &str) {
            assert_eq!(quoted(s), Owned::<str>(expected.to_owned()));
        }
        test("a b", "'a b'");
        test("*.c", "'*.c'");
        test("a=b", "'a=b'");
        test("$HOME", "'$HOME'");
        test("`date`", "'`date`'");
        test("#comment", "'#comment'");
        test("~user", "'~user'");
        test("{a,b}", "'{a,b}'");
        test("back\\slash", "'back\\slash'");
    }

    #[test]
    fn embedded_single_quotes() {
        assert_eq!(quoted("don't"), Owned::<str>(r"'don'\''t'".to_owned()));
        assert_eq!(quoted("''"), Owned::<str>(r"''\'''\'''".to_owned()));
    }

    #[test]
    fn dollar_quoting_for_control_characters() {
        assert_eq!(quoted("a\nb"), Owned::<str>(r"$'a\nb'".to_owned()));
        assert_eq!(quoted("\t"), Owned::<str>(r"$'\t'".to_owned()));
        assert_eq!(quoted("\u{1B}[m"), Owned::<str>(r"$'\e[m'".to_owned()));
        assert_eq!(quoted("a\u{1}"), Owned::<str>(r"$'a\x01'".to_owned()));
    }

    #[test]
    fn round_trip_special_cases_in_dollar_quoting() {
        assert_eq!(quoted("'\n"), Owned::<str>(r"$'\'\n'".to_owned()));
        assert_eq!(quoted("\\\n"), Owned::<str>(r"$'\\\n'".to_owned()));
    }
}
