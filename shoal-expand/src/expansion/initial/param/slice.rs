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

//! Parameter expansion substring semantics (`${P:offset}` and
//! `${P:offset:length}`)
//!
//! Offsets count characters, not bytes, and are zero-based. A negative
//! offset counts from the end of the value. A negative length marks the
//! position to stop at, counted from the end; if that position lies
//! before the offset the two are swapped so the slice is non-empty when
//! possible. Out-of-range slices yield empty strings, never errors.

use super::super::super::Error;
use super::super::super::ErrorCause;
use super::Env;
use shoal_env::variable::Value::{self, Array, Scalar};
use shoal_syntax::syntax::Slice;

/// Applies the substring modifier to the value.
pub fn apply(env: &mut Env<'_>, slice: &Slice, value: &mut Option<Value>) -> Result<(), Error> {
    let offset = index_word(env, &slice.offset)?;
    let length = match &slice.length {
        None => None,
        Some(word) => Some(index_word(env, word)?),
    };

    if let Some(value) = value {
        let slice_one = |s: &mut String| *s = slice_scalar(s, offset, length);
        match value {
            Scalar(s) => slice_one(s),
            Array(array) => array.iter_mut().for_each(slice_one),
        }
    }
    Ok(())
}

/// Expands a word to a decimal index.
fn index_word(env: &mut Env<'_>, word: &shoal_syntax::syntax::Word) -> Result<i64, Error> {
    let expansion = super::super::expand_to_string(env, word)?;
    let trimmed = expansion.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse().map_err(|_| Error {
        cause: ErrorCause::InvalidSubscript {
            value: expansion.clone(),
        },
        location: word.location.clone(),
    })
}

fn slice_scalar(s: &str, offset: i64, length: Option<i64>) -> String {
    let n = s.chars().count() as i64;

    let mut start = offset;
    if start < 0 {
        start += n;
    }

    let (start, count) = match length {
        None => (start, n - start),
        Some(mut length) => {
            if length < 0 {
                // A negative length is a stop offset from the end.
                length += n;
                let mut end = length;
                let mut start = start;
                if end < start {
                    std::mem::swap(&mut start, &mut end);
                }
                (start, end - start)
            } else {
                (start, length)
            }
        }
    };

    if start < 0 || start >= n || count <= 0 {
        return String::new();
    }
    s.chars()
        .skip(start as usize)
        .take(count as usize)
        .collect()
}
