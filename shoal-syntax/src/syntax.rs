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

//! Abstract syntax of expandable words
//!
//! A [`Word`] is a sequence of [word units](WordUnit): quoted segments,
//! tilde prefixes, and unquoted [text units](TextUnit). A [`Text`] is a
//! sequence of text units, the form the interior of double quotes,
//! here-documents and arithmetic expansions takes.
//!
//! Most types can be parsed from a string with [`FromStr`]; see the
//! [`parser`](crate::parser) module for the parsing rules.

use crate::source::Location;
use std::rc::Rc;
use std::str::FromStr;

/// Special parameter
///
/// Each special parameter is a single character with a fixed meaning, such
/// as `@` for all positional parameters.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SpecialParam {
    /// `@` (all positional parameters)
    At,
    /// `*` (all positional parameters)
    Asterisk,
    /// `#` (number of positional parameters)
    Number,
    /// `?` (exit status of the last command)
    Question,
    /// `-` (active shell options)
    Hyphen,
    /// `$` (process ID of the main shell)
    Dollar,
    /// `!` (process ID of the last asynchronous command)
    Exclamation,
    /// `0` (name of the shell or shell script)
    Zero,
    /// `_` (last argument of the previous command)
    Underscore,
    /// `<` (a line read from standard input)
    Stdin,
}

impl SpecialParam {
    /// Returns the special parameter for the given character, if any.
    #[must_use]
    pub fn from_char(c: char) -> Option<SpecialParam> {
        use SpecialParam::*;
        match c {
            '@' => Some(At),
            '*' => Some(Asterisk),
            '#' => Some(Number),
            '?' => Some(Question),
            '-' => Some(Hyphen),
            '$' => Some(Dollar),
            '!' => Some(Exclamation),
            '0' => Some(Zero),
            '_' => Some(Underscore),
            '<' => Some(Stdin),
            _ => None,
        }
    }
}

/// Type of a parameter
///
/// The actual identifier is stored separately in [`Param::id`]; this value
/// is precomputed from it so the expansion does not re-classify the name on
/// every evaluation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ParamType {
    /// Named parameter (a variable)
    Variable,
    /// Special parameter
    Special(SpecialParam),
    /// Positional parameter
    ///
    /// Positional parameters are indexed from 1, so index 0 never resolves.
    /// An index too large for `usize` is stored as `usize::MAX`, which is
    /// also guaranteed not to resolve.
    Positional(usize),
    /// `${!prefix*}` / `${!prefix@}` - names of variables with a prefix
    ///
    /// `at` is `true` for the `@` form, which expands to separate fields
    /// inside double quotes.
    NamePrefix {
        at: bool,
    },
}

/// Parameter appearing in a parameter expansion
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Param {
    /// Literal representation of the parameter name
    ///
    /// For the `NamePrefix` type, this is the prefix without the leading `!`
    /// and trailing `*`/`@`.
    pub id: String,
    /// Classification of the parameter
    pub r#type: ParamType,
}

impl Param {
    /// Classifies a parameter name.
    ///
    /// The name must be a well-formed identifier, decimal integer, or
    /// special parameter character; the parser guarantees this.
    #[must_use]
    pub fn from_id<S: Into<String>>(id: S) -> Param {
        fn inner(id: String) -> Param {
            let r#type = classify(&id);
            Param { id, r#type }
        }
        inner(id.into())
    }
}

fn classify(id: &str) -> ParamType {
    let mut chars = id.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            if c.is_ascii_digit() {
                if c == '0' {
                    ParamType::Special(SpecialParam::Zero)
                } else {
                    ParamType::Positional(c as usize - '0' as usize)
                }
            } else if let Some(special) = SpecialParam::from_char(c) {
                ParamType::Special(special)
            } else {
                ParamType::Variable
            }
        }
        _ => {
            if id.chars().all(|c| c.is_ascii_digit()) && !id.is_empty() {
                ParamType::Positional(id.parse().unwrap_or(usize::MAX))
            } else {
                ParamType::Variable
            }
        }
    }
}

/// Flag that specifies how the value is substituted in a [switch](Switch)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwitchType {
    /// Substitute an alternate value if the parameter has one. (`+`)
    Alter,
    /// Substitute a missing value with a default. (`-`)
    Default,
    /// Assign a default to the variable if the value is missing. (`=`)
    Assign,
    /// Error out if the value is missing. (`?`)
    Error,
}

/// Condition that triggers a [switch](Switch)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwitchCondition {
    /// Without a colon, the switch triggers if the parameter is unset.
    Unset,
    /// With a colon, the switch triggers if the parameter is unset or empty.
    UnsetOrEmpty,
}

/// Parameter expansion modifier that conditionally substitutes the value
///
/// Examples: `+foo`, `:-bar`, `:=baz`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Switch {
    /// How the value is substituted
    pub r#type: SwitchType,
    /// Condition that determines whether the value is substituted
    pub condition: SwitchCondition,
    /// Word that substitutes the parameter value
    pub word: Word,
}

/// Flag that specifies which side of the value is removed in a [trim](Trim)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrimSide {
    /// Beginning of the value
    Prefix,
    /// End of the value
    Suffix,
}

/// Flag that specifies the matching strategy in a [trim](Trim)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrimLength {
    /// Match as few characters as possible.
    Shortest,
    /// Match as many characters as possible.
    Longest,
}

/// Parameter expansion modifier that removes a prefix or suffix
///
/// Examples: `#foo`, `##bar*`, `%%baz*`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Trim {
    /// Which side of the value is removed
    pub side: TrimSide,
    /// Whether the shortest or longest match is removed
    pub length: TrimLength,
    /// Pattern matched against the expanded value
    pub pattern: Word,
}

/// Parameter expansion modifier that takes a substring (`${P:o}`,
/// `${P:o:l}`)
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Slice {
    /// Word evaluating to the decimal offset
    pub offset: Word,
    /// Word evaluating to the decimal length, if present
    pub length: Option<Word>,
}

/// Where a [substitution](Subst) pattern is required to match
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubstAnchor {
    /// Anywhere in the value
    Unanchored,
    /// At the beginning of the value (`${P/#pat/rep}`)
    Prefix,
    /// At the end of the value (`${P/%pat/rep}`)
    Suffix,
}

/// Parameter expansion modifier that replaces pattern matches
/// (`${P/pat/rep}` and friends)
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Subst {
    /// Pattern matched against the expanded value
    pub pattern: Word,
    /// Word that replaces each match
    pub replacement: Word,
    /// Whether all matches are replaced (`${P//pat/rep}`)
    pub all: bool,
    /// Where the pattern must match
    pub anchor: SubstAnchor,
}

/// Letter of an info expansion (`${P@op}`)
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum InfoOp {
    /// `Q` - the value quoted for safe re-input
    Quote,
    /// `E` - the value with backslash escapes expanded as in `$'…'`
    Escape,
    /// `P` - the value expanded as a prompt string
    Prompt,
    /// `A` - an assignment statement that re-creates the parameter
    Assign,
}

impl InfoOp {
    /// Returns the operator for the given letter, if any.
    #[must_use]
    pub fn from_char(c: char) -> Option<InfoOp> {
        match c {
            'Q' => Some(InfoOp::Quote),
            'E' => Some(InfoOp::Escape),
            'P' => Some(InfoOp::Prompt),
            'A' => Some(InfoOp::Assign),
            _ => None,
        }
    }
}

/// Attribute that modifies a parameter expansion
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Modifier {
    /// No modifier
    None,
    /// `#` prefix (`${#foo}`)
    Length,
    /// `+`, `-`, `=` or `?` suffix, optionally with `:` (`${foo:-bar}`)
    Switch(Switch),
    /// `#`, `##`, `%` or `%%` suffix (`${foo##bar}`)
    Trim(Trim),
    /// `:offset` / `:offset:length` suffix (`${foo:1:2}`)
    Slice(Slice),
    /// `/pattern/replacement` suffix (`${foo/bar/baz}`)
    Subst(Subst),
    /// `@` suffix with an operator letter (`${foo@Q}`)
    Info(InfoOp),
}

/// Parameter expansion enclosed in braces
///
/// Expansions that are not enclosed in braces are directly encoded with
/// [`TextUnit::RawParam`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BracedParam {
    /// Parameter to be expanded
    pub param: Param,
    /// Modifier applied to the value
    pub modifier: Modifier,
    /// Position of this parameter expansion in the word
    pub location: Location,
}

/// Element of [`TextUnit::Backquote`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BackquoteUnit {
    /// Literal single character
    Literal(char),
    /// Backslash-escaped single character
    ///
    /// Only `$`, `` ` `` and `\` can be escaped inside backquotes; the
    /// escape is reduced before the command is executed.
    Backslashed(char),
}

/// Element of a [`Text`], i.e., something that can be expanded
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TextUnit {
    /// Literal single character
    Literal(char),
    /// Backslash-escaped single character
    Backslashed(char),
    /// Parameter expansion that is not enclosed in braces
    RawParam {
        /// Parameter to be expanded
        param: Param,
        /// Position of this parameter expansion in the word
        location: Location,
    },
    /// Parameter expansion that is enclosed in braces
    BracedParam(BracedParam),
    /// Command substitution of the form `$(…)`
    CommandSubst {
        /// Command string that will be parsed and executed in a subshell
        /// when the command substitution is expanded
        ///
        /// The string is reference-counted so passing it to the executor
        /// does not copy the whole command.
        content: Rc<str>,
        /// Position of this command substitution in the word
        location: Location,
    },
    /// Command substitution of the form `` `…` ``
    Backquote {
        /// Command with backslash escapes still marked
        content: Vec<BackquoteUnit>,
        /// Position of this command substitution in the word
        location: Location,
    },
    /// Arithmetic expansion (`$((…))`)
    Arith {
        /// Expression to be expanded and then evaluated
        content: Text,
        /// Position of this arithmetic expansion in the word
        location: Location,
    },
}

/// String that may contain some expansions
///
/// A text is the form the interior of double quotes, here-document bodies
/// and arithmetic expansions takes. Compare [`Word`], which additionally
/// has quotations and tilde expansions.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Text(pub Vec<TextUnit>);

/// Element of an [`EscapedString`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EscapeUnit {
    /// Literal single character
    Literal(char),
    /// Backslash-escaped double-quote character (`\"`)
    DoubleQuote,
    /// Backslash-escaped single-quote character (`\'`)
    SingleQuote,
    /// Backslash-escaped backslash character (`\\`)
    Backslash,
    /// Backslash-escaped question mark character (`\?`)
    Question,
    /// Bell character (`\a`, ASCII 7)
    Alert,
    /// Backspace character (`\b`, ASCII 8)
    Backspace,
    /// Escape character (`\e` or `\E`, ASCII 27)
    Escape,
    /// Form feed character (`\f`, ASCII 12)
    FormFeed,
    /// Newline character (`\n`, ASCII 10)
    Newline,
    /// Carriage return character (`\r`, ASCII 13)
    CarriageReturn,
    /// Horizontal tab character (`\t`, ASCII 9)
    Tab,
    /// Vertical tab character (`\v`, ASCII 11)
    VerticalTab,
    /// Control character notation (`\cX`)
    Control(u8),
    /// Single-byte octal notation (`\NNN`, up to three digits)
    Octal(u8),
    /// Single-byte hexadecimal notation (`\xHH`, up to two digits)
    Hex(u8),
    /// Unicode notation (`\uHHHH` or `\UHHHHHHHH`)
    Unicode(char),
}

/// String that may contain some escapes
///
/// An escaped string is the value of a dollar-single-quoted string
/// ([`WordUnit::DollarSingleQuote`]). A `\0` escape in the source
/// terminates the string, so no unit for it exists.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EscapedString(pub Vec<EscapeUnit>);

/// Element of a [`Word`], i.e., text with quotes and tilde expansion
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WordUnit {
    /// Unquoted [`TextUnit`] as a word unit
    Unquoted(TextUnit),
    /// String surrounded with a pair of single quotations
    SingleQuote(String),
    /// Text surrounded with a pair of double quotations
    DoubleQuote(Text),
    /// String surrounded with a pair of single quotations and preceded by a
    /// dollar sign (`$'…'`)
    DollarSingleQuote(EscapedString),
    /// Text surrounded with a pair of double quotations and preceded by a
    /// dollar sign (`$"…"`)
    ///
    /// Without a message catalog this expands exactly like a plain
    /// double-quoted text.
    DollarDoubleQuote(Text),
    /// Tilde expansion
    Tilde {
        /// User name; empty for the plain `~` form
        name: String,
        /// Whether the tilde prefix is followed by a slash
        ///
        /// Used to avoid a doubled slash when the home directory path ends
        /// with one.
        followed_by_slash: bool,
    },
}

/// Token that may involve expansions and quotes
///
/// A word is a sequence of word units as delivered by the surrounding
/// shell's lexer. Whether an empty word is valid depends on context.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Word {
    /// Word units that constitute the word
    pub units: Vec<WordUnit>,
    /// Position of the word
    pub location: Location,
}

impl Word {
    /// Creates an empty word with a dummy location.
    #[must_use]
    pub fn empty() -> Word {
        Word {
            units: Vec::new(),
            location: Location::dummy(""),
        }
    }
}

/// Parses a word in normal (non-assignment) mode.
impl FromStr for Word {
    type Err = crate::parser::SyntaxError;
    fn from_str(s: &str) -> Result<Word, Self::Err> {
        crate::parser::parse_word(s)
    }
}

/// Parses a text in here-document mode.
impl FromStr for Text {
    type Err = crate::parser::SyntaxError;
    fn from_str(s: &str) -> Result<Text, Self::Err> {
        crate::parser::parse_text(s)
    }
}

/// Parses the content of a dollar-single-quoted string (without the
/// surrounding `$'` and `'`).
impl FromStr for EscapedString {
    type Err = crate::parser::SyntaxError;
    fn from_str(s: &str) -> Result<EscapedString, Self::Err> {
        crate::parser::parse_escaped_string(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_param_round_trip() {
        for (c, expected) in [
            ('@', SpecialParam::At),
            ('*', SpecialParam::Asterisk),
            ('#', SpecialParam::Number),
            ('?', SpecialParam::Question),
            ('-', SpecialParam::Hyphen),
            ('$', SpecialParam::Dollar),
            ('!', SpecialParam::Exclamation),
            ('0', SpecialParam::Zero),
            ('_', SpecialParam::Underscore),
            ('<', SpecialParam::Stdin),
        ] {
            assert_eq!(SpecialParam::from_char(c), Some(expected));
        }
        assert_eq!(SpecialParam::from_char('a'), None);
        assert_eq!(SpecialParam::from_char('1'), None);
    }

    #[test]
    fn param_classification() {
        assert_eq!(Param::from_id("foo").r#type, ParamType::Variable);
        assert_eq!(Param::from_id("_foo9").r#type, ParamType::Variable);
        assert_eq!(
            Param::from_id("_").r#type,
            ParamType::Special(SpecialParam::Underscore)
        );
        assert_eq!(Param::from_id("3").r#type, ParamType::Positional(3));
        assert_eq!(Param::from_id("12").r#type, ParamType::Positional(12));
        assert_eq!(
            Param::from_id("0").r#type,
            ParamType::Special(SpecialParam::Zero)
        );
        assert_eq!(
            Param::from_id("@").r#type,
            ParamType::Special(SpecialParam::At)
        );
    }

    #[test]
    fn huge_positional_index_never_resolves() {
        let param = Param::from_id("99999999999999999999999999");
        assert_eq!(param.r#type, ParamType::Positional(usize::MAX));
    }
}
