// This file is part of shoal, a POSIX-compatible command-line shell.
// Copyright (C) 2025 the shoal authors

//! AST parser

use super::*;
use crate::Config;
use crate::Error;
use crate::PatternChar;
use regex_syntax::ast::ClassAsciiKind;

impl BracketAtom {
    /// Parses an inner bracket expression (except the initial `[`).
    ///
    /// This function parses a collating symbol, equivalence class, or
    /// character class.
    ///
    /// If successful, returns the result as well as an iterator that yields
    /// characters following the closing bracket. Returns `Ok(None)` if the
    /// inner bracket expression is not valid.
    fn parse_inner<I>(mut i: I) -> Result<Option<(Self, I)>, Error>
    where
        I: Iterator<Item = PatternChar>,
    {
        match i.next() {
            Some(PatternChar::Normal('.')) => {
                let mut value = Vec::new();
                while let Some(pc) = i.next() {
                    value.push(pc);
                    if value.ends_with(&[PatternChar::Normal('.'), PatternChar::Normal(']')]) {
                        value.truncate(value.len() - 2);
                        let value = value.into_iter().map(PatternChar::char_value).collect();
                        return Ok(Some((BracketAtom::CollatingSymbol(value), i)));
                    }
                }
                Ok(None)
            }
            Some(PatternChar::Normal('=')) => {
                let mut value = Vec::new();
                while let Some(pc) = i.next() {
                    value.push(pc);
                    if value.ends_with(&[PatternChar::Normal('='), PatternChar::Normal(']')]) {
                        value.truncate(value.len() - 2);
                        let value = value.into_iter().map(PatternChar::char_value).collect();
                        return Ok(Some((BracketAtom::EquivalenceClass(value), i)));
                    }
                }
                Ok(None)
            }
            Some(PatternChar::Normal(':')) => {
                let mut value = Vec::new();
                while let Some(pc) = i.next() {
                    value.push(pc);
                    if value.ends_with(&[PatternChar::Normal(':'), PatternChar::Normal(']')]) {
                        value.truncate(value.len() - 2);
                        let name: String = value.into_iter().map(PatternChar::char_value).collect();
                        return if ClassAsciiKind::from_name(&name).is_some() {
                            Ok(Some((BracketAtom::CharClass(name), i)))
                        } else {
                            Err(Error::UndefinedCharClass(name))
                        };
                    }
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}

/// Converts the last three items into a range if applicable.
fn make_range(items: &mut Vec<BracketItem>) {
    use BracketAtom::*;
    use BracketItem::*;

    if let Some(i1) = items.pop() {
        if let Atom(end) = i1 {
            if let Some(i2) = items.pop() {
                if let Atom(Char('-')) = i2 {
                    if let Some(i3) = items.pop() {
                        if let Atom(start) = i3 {
                            items.push(Range(start..=end));
                            return;
                        }
                        items.push(i3);
                    }
                }
                items.push(i2);
            }
            items.push(Atom(end));
        } else {
            items.push(i1);
        }
    }
}

impl Bracket {
    /// Parses a bracket expression (except the initial `[`).
    ///
    /// If successful, returns the result as well as an iterator that yields
    /// characters following the bracket expression. Returns `Ok(None)` if a
    /// bracket expression is not found, in which case the caller treats the
    /// initial `[` as a literal.
    fn parse<I>(mut i: I) -> Result<Option<(Self, I)>, Error>
    where
        I: Iterator<Item = PatternChar> + Clone,
    {
        use BracketAtom::*;
        use BracketItem::*;

        let mut bracket = Bracket {
            complement: false,
            items: Vec::new(),
        };
        while let Some(pc) = i.next() {
            match pc {
                PatternChar::Normal(']') if !bracket.items.is_empty() => {
                    return Ok(Some((bracket, i)));
                }
                PatternChar::Normal('!' | '^')
                    if !bracket.complement && bracket.items.is_empty() =>
                {
                    bracket.complement = true
                }
                PatternChar::Normal('[') => {
                    if let Some((atom, j)) = BracketAtom::parse_inner(i.clone())? {
                        bracket.items.push(atom.into());
                        i = j;
                    } else {
                        bracket.items.push(Atom(Char('[')));
                    }
                }
                c => bracket.items.push(Atom(Char(c.char_value()))),
            }
            make_range(&mut bracket.items);
        }
        Ok(None)
    }
}

/// Parses the alternatives of an extended-glob group (after the opening `(`).
///
/// Alternatives are separated by unnested `|` and the group ends at the
/// matching `)`. Returns `Ok(None)` if the group is not closed, in which case
/// the introducer is treated as ordinary pattern characters.
fn parse_ext_alternatives<I>(mut i: I, config: &Config) -> Result<Option<(Vec<Ast>, I)>, Error>
where
    I: Iterator<Item = PatternChar> + Clone,
{
    let mut alternatives = Vec::new();
    let mut current = Ast::default();
    loop {
        let mut j = i.clone();
        match j.next() {
            None => return Ok(None),
            Some(PatternChar::Normal(')')) => {
                alternatives.push(current);
                return Ok(Some((alternatives, j)));
            }
            Some(PatternChar::Normal('|')) => {
                alternatives.push(std::mem::take(&mut current));
                i = j;
            }
            Some(_) => match Atom::parse(i, config)? {
                Some((atom, j)) => {
                    current.atoms.push(atom);
                    i = j;
                }
                None => return Ok(None),
            },
        }
    }
}

impl ExtKind {
    fn from_introducer(c: char) -> Option<ExtKind> {
        match c {
            '?' => Some(ExtKind::ZeroOrOne),
            '*' => Some(ExtKind::ZeroOrMore),
            '+' => Some(ExtKind::OneOrMore),
            '@' => Some(ExtKind::Exactly),
            '!' => Some(ExtKind::Not),
            _ => None,
        }
    }
}

impl Atom {
    pub(crate) fn parse<I>(mut i: I, config: &Config) -> Result<Option<(Self, I)>, Error>
    where
        I: Iterator<Item = PatternChar> + Clone,
    {
        if let Some(pc) = i.next() {
            if config.extglob {
                if let PatternChar::Normal(c) = pc {
                    if let Some(kind) = ExtKind::from_introducer(c) {
                        let mut j = i.clone();
                        if j.next() == Some(PatternChar::Normal('(')) {
                            if let Some((alternatives, k)) =
                                parse_ext_alternatives(j, config)?
                            {
                                return Ok(Some((Atom::ExtGlob { kind, alternatives }, k)));
                            }
                        }
                    }
                }
            }

            let atom = match pc {
                PatternChar::Normal('?') => Atom::AnyChar,
                PatternChar::Normal('*') => Atom::AnyString,
                PatternChar::Normal('[') => {
                    if let Some((bracket, j)) = Bracket::parse(i.clone())? {
                        i = j;
                        Atom::Bracket(bracket)
                    } else {
                        Atom::Char('[')
                    }
                }
                c => Atom::Char(c.char_value()),
            };
            Ok(Some((atom, i)))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::with_escape;
    use crate::without_escape;

    fn extglob_config() -> Config {
        Config {
            extglob: true,
            ..Config::default()
        }
    }

    #[test]
    fn empty_pattern() {
        let ast = Ast::new(without_escape("")).unwrap();
        assert_eq!(ast.atoms, []);
    }

    #[test]
    fn literal_characters() {
        let ast = Ast::new(without_escape("in")).unwrap();
        assert_eq!(ast.atoms, [Atom::Char('i'), Atom::Char('n')]);
    }

    #[test]
    fn any_patterns() {
        let ast = Ast::new(without_escape("?*")).unwrap();
        assert_eq!(ast.atoms, [Atom::AnyChar, Atom::AnyString]);
    }

    #[test]
    fn escaped_any_patterns() {
        let ast = Ast::new(with_escape(r"\?\*")).unwrap();
        assert_eq!(ast.atoms, [Atom::Char('?'), Atom::Char('*')]);
    }

    #[test]
    fn empty_bracket_expression_is_literal() {
        let ast = Ast::new(without_escape("[]")).unwrap();
        assert_eq!(ast.atoms, [Atom::Char('['), Atom::Char(']')]);
    }

    #[test]
    fn unclosed_bracket_expression_is_literal() {
        let ast = Ast::new(without_escape("[ab")).unwrap();
        assert_eq!(
            ast.atoms,
            [Atom::Char('['), Atom::Char('a'), Atom::Char('b')]
        );
    }

    #[test]
    fn escaped_bracket_expression() {
        let ast = Ast::new(with_escape(r"\[a]")).unwrap();
        assert_eq!(
            ast.atoms,
            [Atom::Char('['), Atom::Char('a'), Atom::Char(']')]
        );
    }

    #[test]
    fn simple_bracket_expression() {
        let ast = Ast::new(without_escape("[xyz]")).unwrap();
        assert_eq!(
            ast.atoms,
            [Atom::Bracket(Bracket {
                complement: false,
                items: vec![
                    BracketItem::Atom(BracketAtom::Char('x')),
                    BracketItem::Atom(BracketAtom::Char('y')),
                    BracketItem::Atom(BracketAtom::Char('z')),
                ]
            })]
        );
    }

    #[test]
    fn brackets_in_bracket_expression() {
        let ast = Ast::new(without_escape("[]a[]")).unwrap();
        assert_eq!(
            ast.atoms,
            [Atom::Bracket(Bracket {
                complement: false,
                items: vec![
                    BracketItem::Atom(BracketAtom::Char(']')),
                    BracketItem::Atom(BracketAtom::Char('a')),
                    BracketItem::Atom(BracketAtom::Char('[')),
                ]
            })]
        );
    }

    #[test]
    fn bracket_expression_complement() {
        for pattern in ["[!12]", "[^12]"] {
            let ast = Ast::new(without_escape(pattern)).unwrap();
            assert_eq!(
                ast.atoms,
                [Atom::Bracket(Bracket {
                    complement: true,
                    items: vec![
                        BracketItem::Atom(BracketAtom::Char('1')),
                        BracketItem::Atom(BracketAtom::Char('2')),
                    ]
                })],
                "pattern: {pattern}"
            );
        }
    }

    #[test]
    fn character_range() {
        let ast = Ast::new(without_escape("[a-z]")).unwrap();
        assert_eq!(
            ast.atoms,
            [Atom::Bracket(Bracket {
                complement: false,
                items: vec![BracketItem::Range(
                    BracketAtom::Char('a')..=BracketAtom::Char('z')
                )]
            })]
        );
    }

    #[test]
    fn initial_and_final_hyphens_are_literal() {
        let ast = Ast::new(without_escape("[-a-]")).unwrap();
        assert_eq!(
            ast.atoms,
            [Atom::Bracket(Bracket {
                complement: false,
                items: vec![
                    BracketItem::Atom(BracketAtom::Char('-')),
                    BracketItem::Atom(BracketAtom::Char('a')),
                    BracketItem::Atom(BracketAtom::Char('-')),
                ]
            })]
        );
    }

    #[test]
    fn collating_symbol() {
        let ast = Ast::new(without_escape("[[.ch.]]")).unwrap();
        assert_eq!(
            ast.atoms,
            [Atom::Bracket(Bracket {
                complement: false,
                items: vec![BracketItem::Atom(BracketAtom::CollatingSymbol(
                    "ch".to_string()
                ))]
            })]
        );
    }

    #[test]
    fn character_class() {
        let ast = Ast::new(without_escape("[[:digit:]]")).unwrap();
        assert_eq!(
            ast.atoms,
            [Atom::Bracket(Bracket {
                complement: false,
                items: vec![BracketItem::Atom(BracketAtom::CharClass(
                    "digit".to_string()
                ))]
            })]
        );
    }

    #[test]
    fn undefined_character_class() {
        let e = Ast::new(without_escape("[[:foo:]]")).unwrap_err();
        assert_eq!(e, Error::UndefinedCharClass("foo".to_string()));
    }

    #[test]
    fn extglob_not_parsed_by_default() {
        let ast = Ast::new(without_escape("@(a)")).unwrap();
        assert_eq!(
            ast.atoms,
            [
                Atom::Char('@'),
                Atom::Char('('),
                Atom::Char('a'),
                Atom::Char(')'),
            ]
        );
    }

    #[test]
    fn extglob_group_with_one_alternative() {
        let ast = Ast::with_config(without_escape("@(ab)"), &extglob_config()).unwrap();
        assert_eq!(
            ast.atoms,
            [Atom::ExtGlob {
                kind: ExtKind::Exactly,
                alternatives: vec![Ast {
                    atoms: vec![Atom::Char('a'), Atom::Char('b')]
                }],
            }]
        );
    }

    #[test]
    fn extglob_group_with_alternatives() {
        let ast = Ast::with_config(without_escape("!(a|b?)"), &extglob_config()).unwrap();
        assert_eq!(
            ast.atoms,
            [Atom::ExtGlob {
                kind: ExtKind::Not,
                alternatives: vec![
                    Ast {
                        atoms: vec![Atom::Char('a')]
                    },
                    Ast {
                        atoms: vec![Atom::Char('b'), Atom::AnyChar]
                    },
                ],
            }]
        );
    }

    #[test]
    fn nested_extglob_group() {
        let ast = Ast::with_config(without_escape("+(a*(b))"), &extglob_config()).unwrap();
        assert_eq!(
            ast.atoms,
            [Atom::ExtGlob {
                kind: ExtKind::OneOrMore,
                alternatives: vec![Ast {
                    atoms: vec![
                        Atom::Char('a'),
                        Atom::ExtGlob {
                            kind: ExtKind::ZeroOrMore,
                            alternatives: vec![Ast {
                                atoms: vec![Atom::Char('b')]
                            }],
                        },
                    ]
                }],
            }]
        );
    }

    #[test]
    fn unclosed_extglob_group_is_literal() {
        let ast = Ast::with_config(without_escape("@(ab"), &extglob_config()).unwrap();
        assert_eq!(
            ast.atoms,
            [
                Atom::Char('@'),
                Atom::Char('('),
                Atom::Char('a'),
                Atom::Char('b'),
            ]
        );
    }

    #[test]
    fn quoted_introducer_is_literal() {
        let ast = Ast::with_config(with_escape(r"\@(a)"), &extglob_config()).unwrap();
        assert_eq!(
            ast.atoms,
            [
                Atom::Char('@'),
                Atom::Char('('),
                Atom::Char('a'),
                Atom::Char(')'),
            ]
        );
    }
}
