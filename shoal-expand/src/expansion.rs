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

//! Word expansion
//!
//! This module turns the raw text of a word into the fields a command
//! receives, in the POSIX order:
//!
//! 1. Brace expansion (an extension, before everything else)
//! 2. Tilde expansion
//! 3. Parameter expansion, command substitution and arithmetic expansion,
//!    interleaved in one left-to-right pass (the [initial](initial)
//!    expansion)
//! 4. Field [splitting](split)
//! 5. Pathname expansion ([globbing](glob))
//! 6. [Quote removal](quote_removal) and [attribute
//!    stripping](attr_strip)
//!
//! Which stages run is selected per call site with [`ExpandFlags`]: a
//! command word runs all of them, an assignment value neither splits nor
//! globs, and a here-document body takes a separate path with its own
//! quoting rules.
//!
//! The [`expand`] function is the generic entry point;
//! [`expand_words`], [`expand_word`], [`expand_value`] and
//! [`expand_here_doc`] wrap it for the common call sites.

pub mod ansi;
pub mod attr;
pub(crate) mod attr_fnmatch;
pub mod attr_strip;
pub mod brace;
pub mod glob;
pub mod initial;
pub mod phrase;
pub mod quote_removal;
pub mod split;

use self::attr::AttrField;
use self::initial::Expand as _;
use self::phrase::Phrase;
use self::split::Ifs;
use enumset::{EnumSet, EnumSetType};
use shoal_env::arith::ArithError;
use shoal_env::exec::ExecError;
use shoal_env::option::{BraceExpand, Glob, On};
use shoal_env::semantics::{ExitStatus, Field};
use shoal_env::variable::{AssignReadOnlyError, IFS};
use shoal_syntax::parser::{SyntaxError, parse_assignment_word, parse_text, parse_word};
use shoal_syntax::source::Location;
use shoal_syntax::syntax::{Text, Word};
use thiserror::Error as ThisError;

pub use self::initial::param::{EmptyError, NonassignableError, ValueState};

/// Option of an expansion call
///
/// Each flag enables one stage or behavior of the pipeline; see
/// [`expand`].
#[derive(Clone, Copy, Debug, EnumSetType, Eq, Hash, PartialEq)]
#[enumset(no_super_impls)]
#[non_exhaustive]
pub enum ExpandFlag {
    /// Performs brace expansion (when the `braceexpand` option is also
    /// on).
    Brace,
    /// Parses the word in variable-assignment context: tilde expansion
    /// after `=` and `:`, and no field splitting of the value.
    VarAssign,
    /// Performs field splitting.
    FieldSplit,
    /// Performs pathname expansion (when the `glob` option is also on).
    Pathname,
    /// Removes quoting characters from the result.
    StripQuotes,
    /// Treats the input as the body of an unquoted here-document.
    HereDoc,
}

/// Set of [`ExpandFlag`]s
pub type ExpandFlags = EnumSet<ExpandFlag>;

/// Flags for an ordinary command word
#[must_use]
pub fn command_word_flags() -> ExpandFlags {
    ExpandFlag::Brace | ExpandFlag::FieldSplit | ExpandFlag::Pathname | ExpandFlag::StripQuotes
}

/// Flags for the value of a variable assignment
#[must_use]
pub fn assignment_flags() -> ExpandFlags {
    ExpandFlag::VarAssign | ExpandFlag::StripQuotes
}

/// Types of errors that may occur in the word expansion
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[non_exhaustive]
pub enum ErrorCause {
    /// The word does not follow the expansion syntax.
    #[error("{0}")]
    Syntax(#[from] SyntaxError),

    /// A parameter is unset while the `nounset` behavior is active.
    #[error("parameter `{name}` is not set")]
    UnsetParameter {
        /// Name of the unset parameter
        name: String,
    },

    /// A `${P:?w}` expansion rejected an unset or empty value.
    #[error(transparent)]
    EmptyExpansion(EmptyError),

    /// A `${P:=w}` expansion tried to assign to a non-variable.
    #[error(transparent)]
    NonassignableParameter(NonassignableError),

    /// A `${P:=w}` expansion tried to assign to a read-only variable.
    #[error(transparent)]
    AssignReadOnly(AssignReadOnlyError),

    /// A command substitution could not be started.
    #[error(transparent)]
    CommandSubstError(ExecError),

    /// An arithmetic expression could not be evaluated.
    #[error(transparent)]
    ArithError(ArithError),

    /// A substring modifier has a non-decimal offset or length.
    #[error("`{value}` is not a valid offset or length")]
    InvalidSubscript {
        /// The offending value, after expansion
        value: String,
    },

    /// A pattern matched no pathname while `failglob` is on.
    #[error("no matches for pattern `{pattern}`")]
    NonMatchingGlob {
        /// The pattern, after quote removal
        pattern: String,
    },
}

/// Explanation of an expansion failure
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{cause}")]
pub struct Error {
    /// Type of the error
    pub cause: ErrorCause,
    /// Position of the construct that caused the error
    pub location: Location,
}

impl Error {
    /// Formats the error as a one-line diagnostic.
    #[must_use]
    pub fn message(&self) -> String {
        format!("shoal: {}: {}", self.location.token(), self.cause)
    }
}

/// Result of word expansion
pub type Result<T> = std::result::Result<T, Error>;

/// Expands a word into fields.
///
/// The stages that run are selected by `flags`; see [`ExpandFlag`]. The
/// exit status of the last command substitution performed, if any,
/// becomes the environment's exit status, which is how `$?` observes a
/// substitution.
pub fn expand(env: &mut shoal_env::Env, word: &str, flags: ExpandFlags) -> Result<Vec<Field>> {
    if flags.contains(ExpandFlag::HereDoc) {
        let (value, status) = expand_here_doc_content(env, word)?;
        if let Some(status) = status {
            env.exit_status = status;
        }
        return Ok(vec![Field {
            value,
            origin: Location::dummy(word),
        }]);
    }

    let words = if flags.contains(ExpandFlag::Brace) && env.options.get(BraceExpand) == On {
        brace::expand(word)
    } else {
        vec![word.to_string()]
    };

    let mut fields = Vec::new();
    let mut last_subst_status = None;
    for word in words {
        let parsed = parse(&word, flags)?;
        let (phrase, status) = expand_phrase(env, &parsed, flags)?;
        if status.is_some() {
            last_subst_status = status;
        }

        let attr_fields: Vec<AttrField> = phrase
            .into_fields()
            .into_iter()
            .map(|chars| AttrField {
                chars,
                origin: parsed.location.clone(),
            })
            .collect();

        let attr_fields = if flags.contains(ExpandFlag::FieldSplit) {
            let ifs_value = env.variables.get_scalar(IFS).map(ToOwned::to_owned);
            let ifs = match &ifs_value {
                None => Ifs::default(),
                Some(value) => Ifs::new(value),
            };
            attr_fields
                .into_iter()
                .flat_map(|field| split::split(field, &ifs))
                .collect()
        } else {
            attr_fields
        };

        for field in attr_fields {
            if flags.contains(ExpandFlag::Pathname) && env.options.get(Glob) == On {
                fields.extend(glob::glob(env, field)?);
            } else if flags.contains(ExpandFlag::StripQuotes) {
                fields.push(field.remove_quotes_and_strip());
            } else {
                use self::attr_strip::Strip;
                fields.push(field.strip());
            }
        }
    }

    if let Some(status) = last_subst_status {
        env.exit_status = status;
    }
    Ok(fields)
}

/// Expands command words.
///
/// Every word is expanded with the full pipeline and the resulting fields
/// are concatenated in order.
pub fn expand_words<S: AsRef<str>>(env: &mut shoal_env::Env, words: &[S]) -> Result<Vec<Field>> {
    let flags = command_word_flags();
    let mut fields = Vec::new();
    for word in words {
        fields.extend(expand(env, word.as_ref(), flags)?);
    }
    Ok(fields)
}

/// Expands a word to exactly one field.
///
/// No brace expansion, field splitting or pathname expansion happens;
/// multiple inner fields (from `"$@"` and the like) are joined by the
/// first IFS character. This is the expansion used for words that must
/// stay whole, like the target of a redirection.
pub fn expand_word(
    env: &mut shoal_env::Env,
    word: &str,
) -> Result<(Field, Option<ExitStatus>)> {
    let parsed = parse(word, ExpandFlags::empty())?;
    expand_parsed_word(env, &parsed)
}

/// Expands the value of a variable assignment.
///
/// Tilde expansion applies after `=` and `:`, and whitespace inside
/// single quotes becomes single spaces.
pub fn expand_value(
    env: &mut shoal_env::Env,
    word: &str,
) -> Result<(Field, Option<ExitStatus>)> {
    let parsed = parse(word, assignment_flags())?;

    let mut ienv = initial::Env::new(env);
    ienv.will_split = false;
    ienv.in_assignment = true;
    let result = parsed.units.expand(&mut ienv);
    let status = ienv.last_command_subst_exit_status;

    let chars = result?.ifs_join(&env.variables);
    let value: String = {
        use self::attr_strip::Strip;
        quote_removal::skip_quotes(chars).strip().collect()
    };
    Ok((
        Field {
            value,
            origin: parsed.location,
        },
        status,
    ))
}

/// Expands a parsed word to exactly one field.
pub fn expand_parsed_word(
    env: &mut shoal_env::Env,
    word: &Word,
) -> Result<(Field, Option<ExitStatus>)> {
    let mut ienv = initial::Env::new(env);
    ienv.will_split = false;
    let result = word.units.expand(&mut ienv);
    let status = ienv.last_command_subst_exit_status;

    let chars = result?.ifs_join(&env.variables);
    let value: String = {
        use self::attr_strip::Strip;
        quote_removal::skip_quotes(chars).strip().collect()
    };
    Ok((
        Field {
            value,
            origin: word.location.clone(),
        },
        status,
    ))
}

/// Expands a parsed text to a string.
///
/// This is the expansion of here-document bodies and arithmetic content:
/// parameter expansion, command substitution and arithmetic expansion
/// run, but nothing is split, globbed, or stripped beyond the text's own
/// escapes.
pub fn expand_text(
    env: &mut shoal_env::Env,
    text: &Text,
) -> Result<(String, Option<ExitStatus>)> {
    let mut ienv = initial::Env::new(env);
    let result = initial::expand_text_to_string(&mut ienv, text);
    let status = ienv.last_command_subst_exit_status;
    Ok((result?, status))
}

/// Parses and expands the body of an unquoted here-document.
pub fn expand_here_doc_content(
    env: &mut shoal_env::Env,
    content: &str,
) -> Result<(String, Option<ExitStatus>)> {
    let text = parse_text(content).map_err(|e| syntax_error(e, content))?;
    expand_text(env, &text)
}

fn parse(word: &str, flags: ExpandFlags) -> Result<Word> {
    let result = if flags.contains(ExpandFlag::VarAssign) {
        parse_assignment_word(word)
    } else {
        parse_word(word)
    };
    result.map_err(|e| syntax_error(e, word))
}

fn syntax_error(error: SyntaxError, word: &str) -> Error {
    Error {
        cause: ErrorCause::Syntax(error),
        location: Location::dummy(word),
    }
}

/// Runs the initial expansion over a parsed word.
fn expand_phrase(
    env: &mut shoal_env::Env,
    word: &Word,
    flags: ExpandFlags,
) -> Result<(Phrase, Option<ExitStatus>)> {
    let mut ienv = initial::Env::new(env);
    ienv.will_split = flags.contains(ExpandFlag::FieldSplit);
    ienv.in_assignment =
        flags.contains(ExpandFlag::VarAssign) && flags.contains(ExpandFlag::StripQuotes);
    let result = word.units.expand(&mut ienv);
    let status = ienv.last_command_subst_exit_status;
    Ok((result?, status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shoal_env::variable::Variable;

    fn values(fields: &[Field]) -> Vec<&str> {
        fields.iter().map(|f| f.value.as_str()).collect()
    }

    #[test]
    fn plain_word() {
        let mut env = shoal_env::Env::new_virtual();
        let fields = expand(&mut env, "hello", command_word_flags()).unwrap();
        assert_eq!(values(&fields), ["hello"]);
    }

    #[test]
    fn quoted_word_without_stripping() {
        let mut env = shoal_env::Env::new_virtual();
        let fields = expand(&mut env, "\"a\"'b'", ExpandFlags::empty()).unwrap();
        assert_eq!(values(&fields), ["\"a\"'b'"]);
    }

    #[test]
    fn unset_variable_vanishes_when_splitting() {
        let mut env = shoal_env::Env::new_virtual();
        let fields = expand(&mut env, "$x", command_word_flags()).unwrap();
        assert_eq!(fields, []);
    }

    #[test]
    fn quoted_unset_variable_keeps_one_empty_field() {
        let mut env = shoal_env::Env::new_virtual();
        let fields = expand(&mut env, "\"$x\"", command_word_flags()).unwrap();
        assert_eq!(values(&fields), [""]);
    }

    #[test]
    fn expansion_is_split_by_default_ifs() {
        let mut env = shoal_env::Env::new_virtual();
        env.variables
            .assign("x", Variable::new("one two three"))
            .unwrap();
        let fields = expand(&mut env, "$x", command_word_flags()).unwrap();
        assert_eq!(values(&fields), ["one", "two", "three"]);
    }

    #[test]
    fn syntax_error_reports_the_word() {
        let mut env = shoal_env::Env::new_virtual();
        let e = expand(&mut env, "'oops", command_word_flags()).unwrap_err();
        assert_matches!(
            e.cause,
            ErrorCause::Syntax(SyntaxError::UnclosedSingleQuote)
        );
        assert_eq!(e.message(), "shoal: 'oops: unclosed single quote");
    }

    #[test]
    fn brace_expansion_is_gated_by_the_option() {
        let mut env = shoal_env::Env::new_virtual();
        let fields = expand(&mut env, "{a,b}x", command_word_flags()).unwrap();
        assert_eq!(values(&fields), ["ax", "bx"]);

        env.options.set(BraceExpand, shoal_env::option::Off);
        let fields = expand(&mut env, "{a,b}x", command_word_flags()).unwrap();
        assert_eq!(values(&fields), ["{a,b}x"]);
    }

    #[test]
    fn expand_value_does_not_split() {
        let mut env = shoal_env::Env::new_virtual();
        env.variables
            .assign("x", Variable::new("one two"))
            .unwrap();
        let (field, status) = expand_value(&mut env, "v=$x").unwrap();
        assert_eq!(field.value, "v=one two");
        assert_eq!(status, None);
    }

    #[test]
    fn expand_value_converts_single_quoted_whitespace() {
        let mut env = shoal_env::Env::new_virtual();
        let (field, _) = expand_value(&mut env, "v='a\tb'").unwrap();
        assert_eq!(field.value, "v=a b");
    }

    #[test]
    fn expand_word_joins_multiple_fields() {
        let mut env = shoal_env::Env::new_virtual();
        env.variables.positional_params_mut().values =
            vec!["a".to_string(), "b".to_string()];
        let (field, _) = expand_word(&mut env, "\"$@\"").unwrap();
        assert_eq!(field.value, "a b");
    }

    #[test]
    fn here_doc_content_is_not_split_and_quotes_are_literal() {
        let mut env = shoal_env::Env::new_virtual();
        env.variables
            .assign("x", Variable::new("one two"))
            .unwrap();
        let fields = expand(
            &mut env,
            "\"$x\" and '$x'",
            ExpandFlag::HereDoc | ExpandFlag::FieldSplit,
        )
        .unwrap();
        assert_eq!(values(&fields), ["\"one two\" and 'one two'"]);
    }

    #[test]
    fn command_substitution_updates_exit_status() {
        use shoal_env::exec::{CaptureResult, FnExecutor};
        let mut env = shoal_env::Env::new_virtual();
        env.executor = Box::new(FnExecutor(Box::new(|_| {
            Ok(CaptureResult {
                output: b"out".to_vec(),
                exit_status: ExitStatus(3),
            })
        })));
        let fields = expand(&mut env, "$(cmd)", command_word_flags()).unwrap();
        assert_eq!(values(&fields), ["out"]);
        assert_eq!(env.exit_status, ExitStatus(3));
    }
}
