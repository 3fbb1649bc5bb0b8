// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Recursive-descent parser.
//!
//! ```text
//! query    := or_expr EOF
//! or_expr  := and_expr (["OR"] and_expr)*
//! and_expr := unary ("AND" unary)*
//! unary    := "NOT" unary | primary
//! primary  := "(" or_expr ")" | phrase | field ":" (word | phrase) | word
//! ```
//!
//! A word that analyzes to nothing (`!!!`) is dropped from the tree. Every
//! production therefore returns `Option<Query>`; `None` means "nothing
//! searchable here" and the parent just skips it.

use super::lexer::{lex, Lexeme, TokenKind};
use super::Query;
use crate::error::{Result, SearchError};
use crate::index::tokenizer::Analyzer;

/// Parse a query string into a tree of normalized terms.
pub fn parse(input: &str, analyzer: &Analyzer) -> Result<Query> {
    if input.trim().is_empty() {
        return Err(SearchError::syntax("empty query", 0));
    }

    let tokens = lex(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        analyzer,
        end: input.chars().count(),
    };

    let query = parser.or_expr()?;
    if let Some(stray) = parser.peek() {
        let message = match stray.kind {
            TokenKind::RParen => "unmatched ')'".to_string(),
            _ => format!("unexpected {}", describe(&stray.kind)),
        };
        return Err(SearchError::syntax(message, stray.position));
    }

    query.ok_or_else(|| SearchError::syntax("query has no searchable terms", 0))
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Word(w) => format!("'{}'", w),
        TokenKind::Quoted(_) => "phrase".to_string(),
        TokenKind::Field(field) => format!("'{}:'", field.name()),
        TokenKind::LParen => "'('".to_string(),
        TokenKind::RParen => "')'".to_string(),
        TokenKind::And => "'AND'".to_string(),
        TokenKind::Or => "'OR'".to_string(),
        TokenKind::Not => "'NOT'".to_string(),
    }
}

/// Collapse a list of alternatives/conjuncts into a single node.
fn combine(mut items: Vec<Query>, make: fn(Vec<Query>) -> Query) -> Option<Query> {
    match items.len() {
        0 => None,
        1 => items.pop(),
        _ => Some(make(items)),
    }
}

struct Parser<'a> {
    tokens: Vec<Lexeme>,
    pos: usize,
    analyzer: &'a Analyzer,
    /// Character length of the input, reported for errors at end of input.
    end: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Lexeme> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Lexeme> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn starts_primary(&self) -> bool {
        matches!(
            self.peek().map(|t| &t.kind),
            Some(
                TokenKind::Word(_)
                    | TokenKind::Quoted(_)
                    | TokenKind::Field(_)
                    | TokenKind::LParen
                    | TokenKind::Not
            )
        )
    }

    fn or_expr(&mut self) -> Result<Option<Query>> {
        let mut items = Vec::new();
        items.extend(self.and_expr()?);

        loop {
            if matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Or)) {
                let op = self.next();
                if !self.starts_primary() {
                    return Err(self.dangling(op));
                }
                items.extend(self.and_expr()?);
            } else if self.starts_primary() {
                // Adjacency is an implicit OR
                items.extend(self.and_expr()?);
            } else {
                break;
            }
        }

        Ok(combine(items, Query::Or))
    }

    fn and_expr(&mut self) -> Result<Option<Query>> {
        let mut items = Vec::new();
        items.extend(self.unary()?);

        while matches!(self.peek().map(|t| &t.kind), Some(TokenKind::And)) {
            let op = self.next();
            if !self.starts_primary() {
                return Err(self.dangling(op));
            }
            items.extend(self.unary()?);
        }

        Ok(combine(items, Query::And))
    }

    fn unary(&mut self) -> Result<Option<Query>> {
        if matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Not)) {
            let op = self.next();
            if !self.starts_primary() {
                return Err(self.dangling(op));
            }
            return Ok(self.unary()?.map(|inner| Query::Not(Box::new(inner))));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Option<Query>> {
        let Some(token) = self.next() else {
            return Err(SearchError::syntax("expected a term", self.end));
        };

        match token.kind {
            TokenKind::Word(word) => Ok(self.word(&word)),
            TokenKind::Quoted(body) => self.phrase(&body, token.position).map(Some),
            TokenKind::LParen => {
                if matches!(self.peek().map(|t| &t.kind), Some(TokenKind::RParen)) {
                    return Err(SearchError::syntax("empty group", token.position));
                }
                let inner = self.or_expr()?;
                match self.next() {
                    Some(Lexeme {
                        kind: TokenKind::RParen,
                        ..
                    }) => Ok(inner),
                    _ => Err(SearchError::syntax("unclosed '('", token.position)),
                }
            }
            TokenKind::Field(field) => {
                let inner = match self.next() {
                    Some(Lexeme {
                        kind: TokenKind::Word(word),
                        ..
                    }) => self.word(&word),
                    Some(Lexeme {
                        kind: TokenKind::Quoted(body),
                        position,
                    }) => Some(self.phrase(&body, position)?),
                    _ => {
                        return Err(SearchError::syntax(
                            format!("expected a term after '{}:'", field.name()),
                            token.position,
                        ))
                    }
                };
                Ok(inner.map(|query| Query::FieldScoped {
                    field,
                    query: Box::new(query),
                }))
            }
            TokenKind::RParen => Err(SearchError::syntax("unmatched ')'", token.position)),
            other => Err(SearchError::syntax(
                format!("unexpected {}", describe(&other)),
                token.position,
            )),
        }
    }

    /// A bare word: zero terms is nothing, several terms is a phrase.
    fn word(&self, word: &str) -> Option<Query> {
        let mut terms = self.analyzer.terms(word);
        match terms.len() {
            0 => None,
            1 => Some(Query::Term(terms.remove(0))),
            _ => Some(Query::Phrase(terms)),
        }
    }

    fn phrase(&self, body: &str, position: usize) -> Result<Query> {
        let mut terms = self.analyzer.terms(body);
        match terms.len() {
            0 => Err(SearchError::syntax("empty phrase", position)),
            1 => Ok(Query::Term(terms.remove(0))),
            _ => Ok(Query::Phrase(terms)),
        }
    }

    fn dangling(&self, op: Option<Lexeme>) -> SearchError {
        match op {
            Some(op) => SearchError::syntax(
                format!("{} is missing an operand", describe(&op.kind)),
                op.position,
            ),
            None => SearchError::syntax("expected a term", self.end),
        }
    }
}
