// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query string to tokens.
//!
//! Positions are character offsets into the query, which is what a user
//! counting along their input expects (byte offsets drift on non-ASCII).

use super::Field;
use crate::error::{Result, SearchError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Bare word, not yet analyzed.
    Word(String),
    /// Body of a `"..."` phrase, not yet analyzed.
    Quoted(String),
    /// `name:` prefix naming a searchable field.
    Field(Field),
    LParen,
    RParen,
    And,
    Or,
    Not,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Lexeme {
    pub kind: TokenKind,
    pub position: usize,
}

#[inline]
fn is_special(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '"')
}

pub(crate) fn lex(input: &str) -> Result<Vec<Lexeme>> {
    let chars: Vec<char> = input.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        match c {
            '(' => {
                out.push(Lexeme {
                    kind: TokenKind::LParen,
                    position: i,
                });
                i += 1;
            }
            ')' => {
                out.push(Lexeme {
                    kind: TokenKind::RParen,
                    position: i,
                });
                i += 1;
            }
            '"' => {
                let open = i;
                let close = chars[open + 1..]
                    .iter()
                    .position(|&c| c == '"')
                    .map(|offset| open + 1 + offset)
                    .ok_or_else(|| SearchError::syntax("unbalanced quote", open))?;
                out.push(Lexeme {
                    kind: TokenKind::Quoted(chars[open + 1..close].iter().collect()),
                    position: open,
                });
                i = close + 1;
            }
            _ => {
                let start = i;
                while i < chars.len() && !is_special(chars[i]) {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                lex_word(word, start, &mut out);
            }
        }
    }

    Ok(out)
}

/// Classify a bare word: keyword, `field:` prefix, or plain word.
///
/// Only a known field name makes a prefix. Anything else with a colon
/// (`std::io`, `http://go.dev`) stays one word and is left to the analyzer.
fn lex_word(word: String, position: usize, out: &mut Vec<Lexeme>) {
    let kind = match word.as_str() {
        "AND" => TokenKind::And,
        "OR" => TokenKind::Or,
        "NOT" => TokenKind::Not,
        _ => {
            if let Some((name, rest)) = word.split_once(':') {
                if let Some(field) = Field::from_name(name) {
                    let rest_position = position + name.chars().count() + 1;
                    out.push(Lexeme {
                        kind: TokenKind::Field(field),
                        position,
                    });
                    if !rest.is_empty() {
                        out.push(Lexeme {
                            kind: TokenKind::Word(rest.to_string()),
                            position: rest_position,
                        });
                    }
                    return;
                }
            }
            TokenKind::Word(word)
        }
    };
    out.push(Lexeme { kind, position });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex(input).unwrap().into_iter().map(|l| l.kind).collect()
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(
            kinds("a AND b and c"),
            vec![
                TokenKind::Word("a".into()),
                TokenKind::And,
                TokenKind::Word("b".into()),
                TokenKind::Word("and".into()),
                TokenKind::Word("c".into()),
            ]
        );
    }

    #[test]
    fn test_parens_split_words() {
        assert_eq!(
            kinds("(a)b"),
            vec![
                TokenKind::LParen,
                TokenKind::Word("a".into()),
                TokenKind::RParen,
                TokenKind::Word("b".into()),
            ]
        );
    }

    #[test]
    fn test_field_prefix() {
        let lexemes = lex("content:\"x y\" content:z").unwrap();
        assert_eq!(lexemes[0].kind, TokenKind::Field(Field::Content));
        assert_eq!(lexemes[1].kind, TokenKind::Quoted("x y".into()));
        assert_eq!(lexemes[1].position, 8);
        assert_eq!(lexemes[3].kind, TokenKind::Word("z".into()));
        assert_eq!(lexemes[3].position, 22);
    }

    #[test]
    fn test_unknown_prefix_stays_a_word() {
        assert_eq!(kinds("std::io"), vec![TokenKind::Word("std::io".into())]);
        assert_eq!(
            kinds("http://go.dev title:x"),
            vec![
                TokenKind::Word("http://go.dev".into()),
                TokenKind::Word("title:x".into()),
            ]
        );
    }

    #[test]
    fn test_unbalanced_quote_position() {
        let err = lex("ab \"cd").unwrap_err();
        assert!(matches!(err, SearchError::QuerySyntax { position: 3, .. }));
    }

    #[test]
    fn test_positions_are_chars() {
        let lexemes = lex("café (x").unwrap();
        assert_eq!(lexemes[1].position, 5);
    }
}
