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

//! Brace expansion
//!
//! Brace expansion runs over the raw word text before any other
//! expansion. `prefix{a,b}suffix` produces `prefixasuffix` and
//! `prefixbsuffix`; `{x..y}` and `{x..y..step}` iterate letter or integer
//! ranges. Multiple groups in one word produce the cross product.
//!
//! A group takes part only if it contains an unquoted top-level comma or
//! a valid range. Quoted and `$`-escaped braces are literal, and braces
//! inside `${…}` and `$(…)` are left to the later expansion stages.

/// Performs brace expansion on a raw word.
///
/// The result is the list of words to expand further. A word without any
/// expandable brace group is returned as the only element.
pub fn expand(word: &str) -> Vec<String> {
    match find_group(word) {
        None => vec![word.to_string()],
        Some(group) => {
            let prefix = &word[..group.start];
            let suffix = &word[group.after_end..];
            let mut results = Vec::new();
            for alternative in group.alternatives {
                let candidate = format!("{prefix}{alternative}{suffix}");
                results.extend(expand(&candidate));
            }
            results
        }
    }
}

/// An expandable brace group found in a word
struct Group {
    /// Byte index of the opening brace
    start: usize,
    /// Byte index just past the closing brace
    after_end: usize,
    /// Replacement strings for the whole group
    alternatives: Vec<String>,
}

/// Finds the first expandable brace group in the word.
fn find_group(word: &str) -> Option<Group> {
    let bytes = word.as_bytes();
    let mut i = 0;
    while i < word.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\'' => i = skip_single_quote(word, i + 1),
            b'"' => i = skip_double_quote(word, i + 1),
            b'$' => match bytes.get(i + 1) {
                // ${…} and $(…) keep their braces for later stages; a
                // quoted brace like $'{' is handled by the quote arms.
                Some(b'{') => i = skip_matching(word, i + 2, b'{', b'}'),
                Some(b'(') => i = skip_matching(word, i + 2, b'(', b')'),
                _ => i += 1,
            },
            b'`' => i = skip_backquote(word, i + 1),
            b'{' => {
                if let Some(group) = parse_group(word, i) {
                    return Some(group);
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    None
}

fn skip_single_quote(word: &str, mut i: usize) -> usize {
    while i < word.len() {
        if word.as_bytes()[i] == b'\'' {
            return i + 1;
        }
        i += 1;
    }
    i
}

fn skip_double_quote(word: &str, mut i: usize) -> usize {
    while i < word.len() {
        match word.as_bytes()[i] {
            b'"' => return i + 1,
            b'\\' => i += 2,
            _ => i += 1,
        }
    }
    i
}

fn skip_backquote(word: &str, mut i: usize) -> usize {
    while i < word.len() {
        match word.as_bytes()[i] {
            b'`' => return i + 1,
            b'\\' => i += 2,
            _ => i += 1,
        }
    }
    i
}

/// Skips to just past the delimiter matching an already-open `open`.
fn skip_matching(word: &str, mut i: usize, open: u8, close: u8) -> usize {
    let mut depth = 1;
    while i < word.len() {
        let b = word.as_bytes()[i];
        if b == b'\\' {
            i += 2;
            continue;
        }
        if b == b'\'' {
            i = skip_single_quote(word, i + 1);
            continue;
        }
        if b == b'"' {
            i = skip_double_quote(word, i + 1);
            continue;
        }
        if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return i + 1;
            }
        }
        i += 1;
    }
    i
}

/// Parses the brace group opening at `start`, if it is expandable.
fn parse_group(word: &str, start: usize) -> Option<Group> {
    let bytes = word.as_bytes();
    let content_start = start + 1;
    let mut alternatives = Vec::new();
    let mut alternative_start = content_start;
    let mut depth = 0;
    let mut i = content_start;
    while i < word.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'\'' => i = skip_single_quote(word, i + 1) - 1,
            b'"' => i = skip_double_quote(word, i + 1) - 1,
            b'`' => i = skip_backquote(word, i + 1) - 1,
            b'$' => match bytes.get(i + 1) {
                Some(b'{') => i = skip_matching(word, i + 2, b'{', b'}') - 1,
                Some(b'(') => i = skip_matching(word, i + 2, b'(', b')') - 1,
                _ => {}
            },
            b'{' => depth += 1,
            b'}' if depth > 0 => depth -= 1,
            b'}' => {
                let content = &word[content_start..i];
                let after_end = i + 1;
                if alternatives.is_empty() {
                    // no comma so far: a range, or not a group at all
                    let alternatives = parse_range(content)?;
                    return Some(Group {
                        start,
                        after_end,
                        alternatives,
                    });
                }
                alternatives.push(word[alternative_start..i].to_string());
                return Some(Group {
                    start,
                    after_end,
                    alternatives,
                });
            }
            b',' if depth == 0 => {
                alternatives.push(word[alternative_start..i].to_string());
                alternative_start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Parses a `x..y` or `x..y..step` range into its alternatives.
fn parse_range(content: &str) -> Option<Vec<String>> {
    let mut parts = content.split("..");
    let x = parts.next()?;
    let y = parts.next()?;
    let step = match parts.next() {
        None => None,
        Some(step) => Some(step.parse::<i64>().ok()?),
    };
    if parts.next().is_some() {
        return None;
    }

    let step = match step {
        // step 0 is treated as 1
        Some(0) | None => 1,
        Some(step) => step.abs(),
    };

    if let (Ok(x), Ok(y)) = (x.parse::<i64>(), y.parse::<i64>()) {
        let width = zero_pad_width(content);
        return Some(number_range(x, y, step, width));
    }

    let (x, y) = (single_letter(x)?, single_letter(y)?);
    Some(letter_range(x, y, step))
}

/// Returns the common zero-padding width, if any endpoint is zero-padded.
fn zero_pad_width(content: &str) -> usize {
    let mut parts = content.split("..");
    let endpoints = [parts.next().unwrap_or(""), parts.next().unwrap_or("")];
    let padded = endpoints.iter().any(|s| {
        let digits = s.strip_prefix('-').unwrap_or(s);
        digits.len() > 1 && digits.starts_with('0')
    });
    if padded {
        endpoints.iter().map(|s| s.len()).max().unwrap_or(0)
    } else {
        0
    }
}

fn number_range(x: i64, y: i64, step: i64, width: usize) -> Vec<String> {
    let mut result = Vec::new();
    let forward = y >= x;
    let mut value = x;
    loop {
        let formatted = if width > 0 {
            let minus = value < 0;
            let digits = value.unsigned_abs().to_string();
            let digit_width = width.saturating_sub(usize::from(minus));
            let padded = format!("{digits:0>digit_width$}");
            if minus {
                format!("-{padded}")
            } else {
                padded
            }
        } else {
            value.to_string()
        };
        result.push(formatted);
        if forward {
            value += step;
            if value > y {
                break;
            }
        } else {
            value -= step;
            if value < y {
                break;
            }
        }
    }
    result
}

fn single_letter(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c),
        _ => None,
    }
}

fn letter_range(x: char, y: char, step: i64) -> Vec<String> {
    let mut result = Vec::new();
    let forward = y >= x;
    let mut value = x as i64;
    loop {
        if let Some(c) = char::from_u32(value as u32) {
            result.push(c.to_string());
        }
        if forward {
            value += step;
            if value > y as i64 {
                break;
            }
        } else {
            value -= step;
            if value < y as i64 {
                break;
            }
        }
    }
    result
}
