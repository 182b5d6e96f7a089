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

//! Word parser
//!
//! This module turns the raw text of a word, as delimited by the surrounding
//! shell's lexer, into the [syntax](crate::syntax) the expansion operates
//! on. Parsing is a single left-to-right scan with an explicit cursor; each
//! `parse_*` function consumes the construct it recognizes and returns the
//! corresponding syntax node.
//!
//! Three entry points cover the three kinds of raw input the expansion
//! receives:
//!
//! - [`parse_word`] for an ordinary command word,
//! - [`parse_assignment_word`] for a word in variable-assignment context,
//!   where tilde expansion is also recognized after the first `=` and after
//!   each `:`,
//! - [`parse_text`] for the body of an unquoted here-document, where
//!   double-quote characters are not special and only `\$`, `` \` ``, `\\`
//!   and `\<newline>` are escapes.

use crate::source::Location;
use crate::syntax::*;
use std::rc::Rc;
use thiserror::Error;

/// Error in the syntax of a word
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum SyntaxError {
    /// A single quote without its closing counterpart
    #[error("unclosed single quote")]
    UnclosedSingleQuote,
    /// A double quote without its closing counterpart
    #[error("unclosed double quote")]
    UnclosedDoubleQuote,
    /// A `$'…'` string without its closing quote
    #[error("unclosed dollar-single-quote")]
    UnclosedDollarQuote,
    /// A backquote without its closing counterpart
    #[error("unclosed backquote")]
    UnclosedBackquote,
    /// A `$(…)` without its closing parenthesis
    #[error("unclosed command substitution")]
    UnclosedCommandSubst,
    /// A `${…}` without its closing brace
    #[error("unclosed parameter expansion")]
    UnclosedParam,
    /// A `${…}` whose content does not follow the expansion grammar
    #[error("bad substitution")]
    BadSubstitution,
}

/// Parses a word in normal mode.
///
/// Tilde expansion is recognized at the start of the word only.
pub fn parse_word(s: &str) -> Result<Word, SyntaxError> {
    let mut cursor = Cursor::new(s);
    let units = parse_units(&mut cursor, &[], TildeContext::new(false))?;
    debug_assert!(cursor.peek().is_none());
    Ok(Word {
        units,
        location: cursor.whole_location(),
    })
}

/// Parses a word in variable-assignment context.
///
/// If the word starts with `name=` (optionally `name+=`), the prefix up to
/// and including the `=` parses as literal characters and the remainder
/// parses with assignment tilde rules: a tilde is also recognized right
/// after that first `=` and after every unquoted `:`. Without such a
/// prefix, the word parses as in [`parse_word`].
pub fn parse_assignment_word(s: &str) -> Result<Word, SyntaxError> {
    let Some(eq_index) = assignment_prefix(s) else {
        return parse_word(s);
    };

    let mut cursor = Cursor::new(s);
    let mut units = Vec::new();
    while cursor.pos <= eq_index {
        match cursor.bump() {
            Some(c) => units.push(WordUnit::Unquoted(TextUnit::Literal(c))),
            None => break,
        }
    }
    let mut tail = parse_units(&mut cursor, &[], TildeContext::new(true))?;
    units.append(&mut tail);
    debug_assert!(cursor.peek().is_none());
    Ok(Word {
        units,
        location: cursor.whole_location(),
    })
}

/// Returns the byte index of the `=` ending an assignment prefix, if the
/// string starts with one.
fn assignment_prefix(s: &str) -> Option<usize> {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return None,
    }
    for (i, c) in chars {
        match c {
            _ if c.is_ascii_alphanumeric() || c == '_' => {}
            '+' => {
                return if s[i + 1..].starts_with('=') {
                    Some(i + 1)
                } else {
                    None
                };
            }
            '=' => return Some(i),
            _ => return None,
        }
    }
    None
}

/// Parses the body of an unquoted here-document.
pub fn parse_text(s: &str) -> Result<Text, SyntaxError> {
    let mut cursor = Cursor::new(s);
    let text = parse_text_units(&mut cursor, TextContext::HereDoc)?;
    debug_assert!(cursor.peek().is_none());
    Ok(text)
}

/// Parses the content of a `$'…'` string (without the delimiters).
///
/// Escapes that are not in the accepted alphabet keep their backslash
/// literally. A `\0` (octal zero) escape terminates the string; the rest of
/// the input is ignored.
pub fn parse_escaped_string(s: &str) -> Result<EscapedString, SyntaxError> {
    use EscapeUnit::*;
    let mut units = Vec::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            units.push(Literal(c));
            continue;
        }
        match chars.next() {
            None => units.push(Literal('\\')),
            Some('a') => units.push(Alert),
            Some('b') => units.push(Backspace),
            Some('e' | 'E') => units.push(Escape),
            Some('f') => units.push(FormFeed),
            Some('n') => units.push(Newline),
            Some('r') => units.push(CarriageReturn),
            Some('t') => units.push(Tab),
            Some('v') => units.push(VerticalTab),
            Some('\\') => units.push(Backslash),
            Some('\'') => units.push(SingleQuote),
            Some('"') => units.push(DoubleQuote),
            Some('?') => units.push(Question),
            Some(d @ '0'..='7') => {
                let mut value = d.to_digit(8).unwrap();
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) if value * 8 + digit < 0x100 => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        _ => break,
                    }
                }
                if value == 0 {
                    // \0 terminates the string
                    break;
                }
                units.push(Octal(value as u8));
            }
            Some('x') => {
                let mut value = None;
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(16)) {
                        Some(digit) => {
                            value = Some(value.unwrap_or(0) * 16 + digit);
                            chars.next();
                        }
                        None => break,
                    }
                }
                match value {
                    Some(value) => units.push(Hex(value as u8)),
                    None => {
                        units.push(Literal('\\'));
                        units.push(Literal('x'));
                    }
                }
            }
            Some(u @ ('u' | 'U')) => {
                let max_digits = if u == 'u' { 4 } else { 8 };
                let mut value = None;
                for _ in 0..max_digits {
                    match chars.peek().and_then(|c| c.to_digit(16)) {
                        Some(digit) => {
                            value = Some(value.unwrap_or(0u32).wrapping_mul(16) + digit);
                            chars.next();
                        }
                        None => break,
                    }
                }
                match value.and_then(char::from_u32) {
                    Some(c) => units.push(Unicode(c)),
                    None => {
                        units.push(Literal('\\'));
                        units.push(Literal(u));
                    }
                }
            }
            Some('c') => match chars.next() {
                Some(x) => match control_value(x) {
                    Some(value) => units.push(Control(value)),
                    None => {
                        units.push(Literal('\\'));
                        units.push(Literal('c'));
                        units.push(Literal(x));
                    }
                },
                None => {
                    units.push(Literal('\\'));
                    units.push(Literal('c'));
                }
            },
            Some(other) => {
                units.push(Literal('\\'));
                units.push(Literal(other));
            }
        }
    }
    Ok(EscapedString(units))
}

fn control_value(x: char) -> Option<u8> {
    match x {
        'a'..='z' => Some(x as u8 - b'a' + 1),
        'A'..='Z' => Some(x as u8 - b'A' + 1),
        '[' => Some(0x1B),
        '\\' => Some(0x1C),
        ']' => Some(0x1D),
        '^' => Some(0x1E),
        '_' => Some(0x1F),
        '?' => Some(0x7F),
        _ => None,
    }
}

/// Scanning cursor over the raw word text
struct Cursor<'a> {
    src: &'a str,
    code: Rc<str>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Cursor {
            src,
            code: Rc::from(src),
            pos: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn location_from(&self, start: usize) -> Location {
        Location {
            code: Rc::clone(&self.code),
            range: start..self.pos,
        }
    }

    fn whole_location(&self) -> Location {
        Location {
            code: Rc::clone(&self.code),
            range: 0..self.src.len(),
        }
    }
}

/// Where tilde expansion may be recognized
#[derive(Clone, Copy, Debug)]
struct TildeContext {
    /// Whether the word is in variable-assignment context
    assignment: bool,
    /// How many unquoted `=` have been seen so far
    eq_count: u32,
}

impl TildeContext {
    fn new(assignment: bool) -> Self {
        TildeContext {
            assignment,
            // The assignment prefix parser has already consumed the first =.
            eq_count: if assignment { 1 } else { 0 },
        }
    }
}

/// What kind of text is being parsed
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum TextContext {
    /// Interior of double quotes
    DoubleQuote,
    /// Body of an unquoted here-document
    HereDoc,
    /// Content of an arithmetic expansion
    Arith,
}

impl TextContext {
    /// Characters whose backslash escape consumes the backslash
    fn escapable(self, c: char) -> bool {
        match self {
            TextContext::DoubleQuote => matches!(c, '$' | '`' | '"' | '\\' | '\n'),
            TextContext::HereDoc | TextContext::Arith => matches!(c, '$' | '`' | '\\' | '\n'),
        }
    }
}

/// Parses word units until an unquoted top-level stop character or the end
/// of input.
///
/// The stop character, if hit, is left unconsumed.
fn parse_units(
    cursor: &mut Cursor,
    stop: &[char],
    mut tilde: TildeContext,
) -> Result<Vec<WordUnit>, SyntaxError> {
    let mut units: Vec<WordUnit> = Vec::new();
    let mut tilde_ok = true;
    loop {
        let Some(c) = cursor.peek() else {
            return Ok(units);
        };
        if stop.contains(&c) {
            return Ok(units);
        }

        let unit = match c {
            '~' if tilde_ok => {
                if let Some(unit) = parse_tilde(cursor, tilde.assignment, stop) {
                    unit
                } else {
                    cursor.bump();
                    WordUnit::Unquoted(TextUnit::Literal('~'))
                }
            }
            '\'' => {
                cursor.bump();
                parse_single_quote(cursor)?
            }
            '"' => {
                cursor.bump();
                let text = parse_text_units(cursor, TextContext::DoubleQuote)?;
                if !cursor.eat('"') {
                    return Err(SyntaxError::UnclosedDoubleQuote);
                }
                WordUnit::DoubleQuote(text)
            }
            '\\' => {
                cursor.bump();
                match cursor.bump() {
                    Some(c) => WordUnit::Unquoted(TextUnit::Backslashed(c)),
                    None => WordUnit::Unquoted(TextUnit::Literal('\\')),
                }
            }
            '$' => parse_dollar_word_unit(cursor)?,
            '`' => WordUnit::Unquoted(parse_backquote(cursor)?),
            c => {
                cursor.bump();
                if c == '=' && tilde.assignment {
                    tilde.eq_count += 1;
                }
                WordUnit::Unquoted(TextUnit::Literal(c))
            }
        };

        // A tilde prefix may also start right after the first `=` or after
        // any `:` of an assignment value.
        tilde_ok = match &unit {
            WordUnit::Unquoted(TextUnit::Literal(':')) if tilde.assignment => true,
            WordUnit::Unquoted(TextUnit::Literal('=')) if tilde.assignment => {
                tilde.eq_count == 1
            }
            _ => false,
        };
        units.push(unit);
    }
}

/// Attempts to parse a tilde prefix at the cursor.
///
/// The prefix extends to the next `/`, the next `:` in assignment context,
/// a stop character, or the end of the word. If any character of the prefix
/// is quoted or is itself an expansion, no tilde expansion happens and
/// `None` is returned with the cursor unmoved.
fn parse_tilde(cursor: &mut Cursor, assignment: bool, stop: &[char]) -> Option<WordUnit> {
    let start = cursor.pos;
    let rest = cursor.rest();
    debug_assert!(rest.starts_with('~'));

    let mut name_end = rest.len();
    let mut followed_by_slash = false;
    for (i, c) in rest.char_indices().skip(1) {
        match c {
            '/' => {
                name_end = i;
                followed_by_slash = true;
                break;
            }
            ':' if assignment => {
                name_end = i;
                break;
            }
            '\\' | '\'' | '"' | '`' | '$' => return None,
            c if stop.contains(&c) => {
                name_end = i;
                break;
            }
            _ => {}
        }
    }

    let name = rest[1..name_end].to_string();
    cursor.pos = start + name_end;
    Some(WordUnit::Tilde {
        name,
        followed_by_slash,
    })
}

fn parse_single_quote(cursor: &mut Cursor) -> Result<WordUnit, SyntaxError> {
    let mut value = String::new();
    loop {
        match cursor.bump() {
            Some('\'') => return Ok(WordUnit::SingleQuote(value)),
            Some(c) => value.push(c),
            None => return Err(SyntaxError::UnclosedSingleQuote),
        }
    }
}

/// Parses a word unit that starts with `$`.
fn parse_dollar_word_unit(cursor: &mut Cursor) -> Result<WordUnit, SyntaxError> {
    debug_assert_eq!(cursor.peek(), Some('$'));
    match cursor.peek_second() {
        Some('\'') => {
            cursor.bump();
            cursor.bump();
            let raw = scan_dollar_single_quote(cursor)?;
            let content = parse_escaped_string(&raw)?;
            Ok(WordUnit::DollarSingleQuote(content))
        }
        Some('"') => {
            cursor.bump();
            cursor.bump();
            let text = parse_text_units(cursor, TextContext::DoubleQuote)?;
            if !cursor.eat('"') {
                return Err(SyntaxError::UnclosedDoubleQuote);
            }
            Ok(WordUnit::DollarDoubleQuote(text))
        }
        _ => Ok(WordUnit::Unquoted(parse_dollar_text_unit(cursor)?)),
    }
}

/// Collects the raw content of a `$'…'` string after the opening quote.
fn scan_dollar_single_quote(cursor: &mut Cursor) -> Result<String, SyntaxError> {
    let mut raw = String::new();
    loop {
        match cursor.bump() {
            Some('\'') => return Ok(raw),
            Some('\\') => {
                raw.push('\\');
                match cursor.bump() {
                    Some(c) => raw.push(c),
                    None => return Err(SyntaxError::UnclosedDollarQuote),
                }
            }
            Some(c) => raw.push(c),
            None => return Err(SyntaxError::UnclosedDollarQuote),
        }
    }
}

/// Parses a text unit that starts with `$`.
///
/// Used both for unquoted text and for the interior of double quotes, where
/// `$'…'` and `$"…"` are not recognized. A `$` not followed by anything
/// expandable is a literal dollar.
fn parse_dollar_text_unit(cursor: &mut Cursor) -> Result<TextUnit, SyntaxError> {
    let start = cursor.pos;
    debug_assert_eq!(cursor.peek(), Some('$'));
    cursor.bump();

    match cursor.peek() {
        Some('{') => {
            cursor.bump();
            parse_braced_param(cursor, start).map(TextUnit::BracedParam)
        }
        Some('(') => {
            cursor.bump();
            if cursor.peek() == Some('(') {
                // Tentatively parse as arithmetic; if the double parentheses
                // do not balance, re-scan as a command substitution holding a
                // subshell.
                let reset = cursor.pos;
                cursor.bump();
                if let Some(content) = scan_arith(cursor) {
                    let location = cursor.location_from(start);
                    let content = parse_arith_content(&content)?;
                    return Ok(TextUnit::Arith { content, location });
                }
                cursor.pos = reset;
            }
            let content = scan_command_subst(cursor)?;
            let location = cursor.location_from(start);
            Ok(TextUnit::CommandSubst {
                content: content.into(),
                location,
            })
        }
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            let name_start = cursor.pos;
            while let Some(c) = cursor.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    cursor.bump();
                } else {
                    break;
                }
            }
            let id = &cursor.src[name_start..cursor.pos];
            Ok(TextUnit::RawParam {
                param: Param::from_id(id),
                location: cursor.location_from(start),
            })
        }
        // Without braces, only one digit forms a positional parameter:
        // `$10` is the expansion of `$1` followed by a literal `0`.
        Some(c) if c.is_ascii_digit() => {
            cursor.bump();
            Ok(TextUnit::RawParam {
                param: Param::from_id(c.to_string()),
                location: cursor.location_from(start),
            })
        }
        Some(c) if SpecialParam::from_char(c).is_some() && c != '<' => {
            cursor.bump();
            Ok(TextUnit::RawParam {
                param: Param::from_id(c.to_string()),
                location: cursor.location_from(start),
            })
        }
        _ => Ok(TextUnit::Literal('$')),
    }
}

/// Parses the interior of `${…}` after the opening brace.
fn parse_braced_param(cursor: &mut Cursor, start: usize) -> Result<BracedParam, SyntaxError> {
    // ${#…}: either the # parameter or the string-length form
    if cursor.peek() == Some('#') {
        match cursor.peek_second() {
            Some('}') => {
                cursor.bump();
                cursor.bump();
                return Ok(BracedParam {
                    param: Param::from_id("#"),
                    modifier: Modifier::None,
                    location: cursor.location_from(start),
                });
            }
            Some('-' | '=' | '?' | '+') => {
                // ${#-w} and friends operate on the # parameter itself.
                cursor.bump();
                let modifier = parse_modifier(cursor)?;
                return finish_braced_param(cursor, start, Param::from_id("#"), modifier);
            }
            Some(':') => return Err(SyntaxError::BadSubstitution),
            Some(_) => {
                cursor.bump();
                let param = parse_param_name(cursor)?;
                if !cursor.eat('}') {
                    return Err(if cursor.peek().is_none() {
                        SyntaxError::UnclosedParam
                    } else {
                        SyntaxError::BadSubstitution
                    });
                }
                return Ok(BracedParam {
                    param,
                    modifier: Modifier::Length,
                    location: cursor.location_from(start),
                });
            }
            None => return Err(SyntaxError::UnclosedParam),
        }
    }

    // ${!prefix*} / ${!prefix@}
    if cursor.peek() == Some('!') {
        cursor.bump();
        let name_start = cursor.pos;
        while let Some(c) = cursor.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                cursor.bump();
            } else {
                break;
            }
        }
        let prefix = cursor.src[name_start..cursor.pos].to_string();
        let at = match cursor.bump() {
            Some('*') => false,
            Some('@') => true,
            Some(_) => return Err(SyntaxError::BadSubstitution),
            None => return Err(SyntaxError::UnclosedParam),
        };
        if !cursor.eat('}') {
            return Err(if cursor.peek().is_none() {
                SyntaxError::UnclosedParam
            } else {
                SyntaxError::BadSubstitution
            });
        }
        return Ok(BracedParam {
            param: Param {
                id: prefix,
                r#type: ParamType::NamePrefix { at },
            },
            modifier: Modifier::None,
            location: cursor.location_from(start),
        });
    }

    let param = parse_param_name(cursor)?;
    let modifier = parse_modifier(cursor)?;
    finish_braced_param(cursor, start, param, modifier)
}

fn finish_braced_param(
    cursor: &mut Cursor,
    start: usize,
    param: Param,
    modifier: Modifier,
) -> Result<BracedParam, SyntaxError> {
    if !cursor.eat('}') {
        return Err(if cursor.peek().is_none() {
            SyntaxError::UnclosedParam
        } else {
            SyntaxError::BadSubstitution
        });
    }
    Ok(BracedParam {
        param,
        modifier,
        location: cursor.location_from(start),
    })
}

/// Parses the parameter name inside `${…}`.
///
/// Unlike the unbraced form, a positional parameter may have multiple
/// digits here.
fn parse_param_name(cursor: &mut Cursor) -> Result<Param, SyntaxError> {
    match cursor.peek() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            let start = cursor.pos;
            while let Some(c) = cursor.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    cursor.bump();
                } else {
                    break;
                }
            }
            Ok(Param::from_id(&cursor.src[start..cursor.pos]))
        }
        Some(c) if c.is_ascii_digit() => {
            let start = cursor.pos;
            while let Some(c) = cursor.peek() {
                if c.is_ascii_digit() {
                    cursor.bump();
                } else {
                    break;
                }
            }
            Ok(Param::from_id(&cursor.src[start..cursor.pos]))
        }
        Some(c) if SpecialParam::from_char(c).is_some() => {
            cursor.bump();
            Ok(Param::from_id(c.to_string()))
        }
        Some(_) => Err(SyntaxError::BadSubstitution),
        None => Err(SyntaxError::UnclosedParam),
    }
}

/// Parses the modifier of a braced parameter expansion.
///
/// The cursor is left at the closing brace (or wherever parsing stopped;
/// the caller verifies the brace).
fn parse_modifier(cursor: &mut Cursor) -> Result<Modifier, SyntaxError> {
    match cursor.peek() {
        Some('}') => Ok(Modifier::None),
        None => Err(SyntaxError::UnclosedParam),
        Some(':') => match cursor.peek_second() {
            Some(c @ ('-' | '=' | '?' | '+')) => {
                cursor.bump();
                cursor.bump();
                let word = parse_modifier_word(cursor, &['}'])?;
                Ok(Modifier::Switch(Switch {
                    r#type: switch_type(c),
                    condition: SwitchCondition::UnsetOrEmpty,
                    word,
                }))
            }
            _ => {
                cursor.bump();
                let offset = parse_modifier_word(cursor, &[':', '}'])?;
                let length = if cursor.eat(':') {
                    Some(parse_modifier_word(cursor, &['}'])?)
                } else {
                    None
                };
                Ok(Modifier::Slice(Slice { offset, length }))
            }
        },
        Some(c @ ('-' | '=' | '?' | '+')) => {
            cursor.bump();
            let word = parse_modifier_word(cursor, &['}'])?;
            Ok(Modifier::Switch(Switch {
                r#type: switch_type(c),
                condition: SwitchCondition::Unset,
                word,
            }))
        }
        Some(side @ ('#' | '%')) => {
            cursor.bump();
            let length = if cursor.eat(side) {
                TrimLength::Longest
            } else {
                TrimLength::Shortest
            };
            let pattern = parse_modifier_word(cursor, &['}'])?;
            Ok(Modifier::Trim(Trim {
                side: if side == '#' {
                    TrimSide::Prefix
                } else {
                    TrimSide::Suffix
                },
                length,
                pattern,
            }))
        }
        Some('/') => {
            cursor.bump();
            let mut all = false;
            let mut anchor = SubstAnchor::Unanchored;
            match cursor.peek() {
                Some('/') => {
                    cursor.bump();
                    all = true;
                }
                Some('#') => {
                    cursor.bump();
                    anchor = SubstAnchor::Prefix;
                }
                Some('%') => {
                    cursor.bump();
                    anchor = SubstAnchor::Suffix;
                }
                _ => {}
            }
            let pattern = parse_modifier_word(cursor, &['/', '}'])?;
            let replacement = if cursor.eat('/') {
                parse_modifier_word(cursor, &['}'])?
            } else {
                Word::empty()
            };
            Ok(Modifier::Subst(Subst {
                pattern,
                replacement,
                all,
                anchor,
            }))
        }
        Some('@') => {
            cursor.bump();
            match cursor.bump() {
                Some(c) => match InfoOp::from_char(c) {
                    Some(op) => Ok(Modifier::Info(op)),
                    None => Err(SyntaxError::BadSubstitution),
                },
                None => Err(SyntaxError::UnclosedParam),
            }
        }
        Some(_) => Err(SyntaxError::BadSubstitution),
    }
}

fn switch_type(c: char) -> SwitchType {
    match c {
        '+' => SwitchType::Alter,
        '-' => SwitchType::Default,
        '=' => SwitchType::Assign,
        '?' => SwitchType::Error,
        _ => unreachable!("not a switch type: {c:?}"),
    }
}

/// Parses a word embedded in a parameter expansion modifier.
fn parse_modifier_word(cursor: &mut Cursor, stop: &[char]) -> Result<Word, SyntaxError> {
    let start = cursor.pos;
    let units = parse_units(cursor, stop, TildeContext::new(false))?;
    if cursor.peek().is_none() {
        return Err(SyntaxError::UnclosedParam);
    }
    Ok(Word {
        units,
        location: cursor.location_from(start),
    })
}

/// Scans the content of a command substitution after `$(`, up to and
/// including the matching `)`.
///
/// The returned string excludes the closing parenthesis. The scan
/// understands quoting and skips the patterns of `case` clauses so their
/// unmatched `)` do not end the substitution early.
fn scan_command_subst(cursor: &mut Cursor) -> Result<String, SyntaxError> {
    let start = cursor.pos;
    let mut depth = 1usize;
    loop {
        let before = cursor.pos;
        if at_case_keyword(cursor) {
            skip_case_clause(cursor)?;
            continue;
        }
        match cursor.bump() {
            None => return Err(SyntaxError::UnclosedCommandSubst),
            Some('\\') => {
                cursor.bump();
            }
            Some('\'') => skip_single_quote(cursor, SyntaxError::UnclosedCommandSubst)?,
            Some('"') => skip_double_quote(cursor, SyntaxError::UnclosedCommandSubst)?,
            Some('`') => skip_backquote(cursor, SyntaxError::UnclosedCommandSubst)?,
            Some('(') => depth += 1,
            Some(')') => {
                depth -= 1;
                if depth == 0 {
                    return Ok(cursor.src[start..before].to_string());
                }
            }
            Some(_) => {}
        }
    }
}

/// Tests whether the cursor is at a `case` keyword at a command position.
fn at_case_keyword(cursor: &Cursor) -> bool {
    if !cursor.rest().starts_with("case") {
        return false;
    }
    let followed = cursor.src[cursor.pos + 4..]
        .chars()
        .next()
        .is_some_and(|c| c.is_whitespace());
    if !followed {
        return false;
    }
    match cursor.src[..cursor.pos].chars().next_back() {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, ';' | '&' | '|' | '(' | '{'),
    }
}

/// Skips a whole `case … esac` clause, quotes included.
fn skip_case_clause(cursor: &mut Cursor) -> Result<(), SyntaxError> {
    debug_assert!(at_case_keyword(cursor));
    cursor.pos += 4;
    let mut depth = 1usize;
    loop {
        if at_case_keyword(cursor) {
            cursor.pos += 4;
            depth += 1;
            continue;
        }
        if at_esac_keyword(cursor) {
            cursor.pos += 4;
            depth -= 1;
            if depth == 0 {
                return Ok(());
            }
            continue;
        }
        match cursor.bump() {
            None => return Err(SyntaxError::UnclosedCommandSubst),
            Some('\\') => {
                cursor.bump();
            }
            Some('\'') => skip_single_quote(cursor, SyntaxError::UnclosedCommandSubst)?,
            Some('"') => skip_double_quote(cursor, SyntaxError::UnclosedCommandSubst)?,
            Some('`') => skip_backquote(cursor, SyntaxError::UnclosedCommandSubst)?,
            Some(_) => {}
        }
    }
}

fn at_esac_keyword(cursor: &Cursor) -> bool {
    if !cursor.rest().starts_with("esac") {
        return false;
    }
    let followed = cursor.src[cursor.pos + 4..]
        .chars()
        .next()
        .is_none_or(|c| c.is_whitespace() || matches!(c, ';' | ')' | '&' | '|'));
    if !followed {
        return false;
    }
    match cursor.src[..cursor.pos].chars().next_back() {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, ';' | '&' | '|' | '(' | '{'),
    }
}

fn skip_single_quote(cursor: &mut Cursor, error: SyntaxError) -> Result<(), SyntaxError> {
    loop {
        match cursor.bump() {
            Some('\'') => return Ok(()),
            Some(_) => {}
            None => return Err(error),
        }
    }
}

fn skip_double_quote(cursor: &mut Cursor, error: SyntaxError) -> Result<(), SyntaxError> {
    loop {
        match cursor.bump() {
            Some('"') => return Ok(()),
            Some('\\') => {
                cursor.bump();
            }
            Some(_) => {}
            None => return Err(error),
        }
    }
}

fn skip_backquote(cursor: &mut Cursor, error: SyntaxError) -> Result<(), SyntaxError> {
    loop {
        match cursor.bump() {
            Some('`') => return Ok(()),
            Some('\\') => {
                cursor.bump();
            }
            Some(_) => {}
            None => return Err(error),
        }
    }
}

/// Scans the content of `$((…))` after the second opening parenthesis.
///
/// Returns the content if the parentheses balance all the way to a `))`,
/// or `None` if they do not, in which case the caller re-scans the input as
/// a command substitution.
fn scan_arith(cursor: &mut Cursor) -> Option<String> {
    let start = cursor.pos;
    let mut depth = 0usize;
    loop {
        match cursor.bump() {
            None => return None,
            Some('\\') => {
                cursor.bump();
            }
            Some('\'') => skip_single_quote(cursor, SyntaxError::UnclosedParam).ok()?,
            Some('"') => skip_double_quote(cursor, SyntaxError::UnclosedParam).ok()?,
            Some('(') => depth += 1,
            Some(')') => {
                if depth == 0 {
                    let end = cursor.pos - 1;
                    if cursor.eat(')') {
                        return Some(cursor.src[start..end].to_string());
                    }
                    return None;
                }
                depth -= 1;
            }
            Some(_) => {}
        }
    }
}

/// Parses the content of an arithmetic expansion as a text.
fn parse_arith_content(content: &str) -> Result<Text, SyntaxError> {
    let mut cursor = Cursor::new(content);
    let text = parse_text_units(&mut cursor, TextContext::Arith)?;
    debug_assert!(cursor.peek().is_none());
    Ok(text)
}

/// Parses a backquoted command substitution.
fn parse_backquote(cursor: &mut Cursor) -> Result<TextUnit, SyntaxError> {
    let start = cursor.pos;
    debug_assert_eq!(cursor.peek(), Some('`'));
    cursor.bump();

    let mut content = Vec::new();
    loop {
        match cursor.bump() {
            Some('`') => {
                let location = cursor.location_from(start);
                return Ok(TextUnit::Backquote { content, location });
            }
            Some('\\') => match cursor.bump() {
                Some(c @ ('$' | '`' | '\\')) => content.push(BackquoteUnit::Backslashed(c)),
                Some(c) => {
                    content.push(BackquoteUnit::Literal('\\'));
                    content.push(BackquoteUnit::Literal(c));
                }
                None => return Err(SyntaxError::UnclosedBackquote),
            },
            Some(c) => content.push(BackquoteUnit::Literal(c)),
            None => return Err(SyntaxError::UnclosedBackquote),
        }
    }
}

/// Parses text units until the context's delimiter or the end of input.
///
/// In the double-quote context, parsing stops at an unescaped `"`, which is
/// left unconsumed for the caller.
fn parse_text_units(cursor: &mut Cursor, ctx: TextContext) -> Result<Text, SyntaxError> {
    let mut units = Vec::new();
    loop {
        let Some(c) = cursor.peek() else {
            return Ok(Text(units));
        };
        match c {
            '"' if ctx == TextContext::DoubleQuote => return Ok(Text(units)),
            '\\' => {
                match cursor.peek_second() {
                    Some('\n') => {
                        // line continuation
                        cursor.bump();
                        cursor.bump();
                    }
                    Some(c2) if ctx.escapable(c2) => {
                        cursor.bump();
                        cursor.bump();
                        units.push(TextUnit::Backslashed(c2));
                    }
                    _ => {
                        cursor.bump();
                        units.push(TextUnit::Literal('\\'));
                    }
                }
            }
            '$' => units.push(parse_dollar_text_unit(cursor)?),
            '`' => units.push(parse_backquote(cursor)?),
            c => {
                cursor.bump();
                units.push(TextUnit::Literal(c));
            }
        }
    }
}
