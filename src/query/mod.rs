// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query language: parsing a user's query string into a tree.
//!
//! ```text
//! rust async            either term (adjacent items are OR'd)
//! rust AND async        both terms
//! rust NOT unsafe       "rust", or anything without "unsafe"
//! rust AND NOT unsafe   "rust" but not "unsafe"
//! "error handling"      exact phrase, contiguous positions
//! content:tokio         field-scoped term
//! (a OR b) AND c        grouping
//! ```
//!
//! Precedence, tightest first: `NOT`, `AND`, `OR`/adjacency. Keywords must be
//! upper-case; `and` is just a word.
//!
//! Leaves hold normalized terms. The parser runs every word through the same
//! [`Analyzer`](crate::index::tokenizer::Analyzer) the index was built with.

mod lexer;
mod parser;

pub use parser::parse;

use std::fmt;
use std::str::FromStr;

use crate::error::SearchError;
use crate::index::tokenizer::Analyzer;

/// A searchable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Content,
}

impl Field {
    /// Every field a query may scope to.
    pub const SEARCHABLE: &'static [Field] = &[Field::Content];

    pub fn name(self) -> &'static str {
        match self {
            Field::Content => "content",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Self::SEARCHABLE.iter().copied().find(|f| f.name() == name)
    }
}

/// Parsed query tree. Leaves hold normalized terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Term(String),
    /// Two or more terms that must appear at consecutive positions.
    Phrase(Vec<String>),
    And(Vec<Query>),
    Or(Vec<Query>),
    Not(Box<Query>),
    /// A term or phrase restricted to one field.
    FieldScoped { field: Field, query: Box<Query> },
}

impl Query {
    /// Terms whose presence contributes to a match, i.e. not under a `NOT`.
    ///
    /// Deduplicated, in first-seen order.
    pub fn positive_terms(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_terms(false, &mut out);
        out
    }

    fn collect_terms<'a>(&'a self, negated: bool, out: &mut Vec<&'a str>) {
        fn push<'a>(term: &'a str, negated: bool, out: &mut Vec<&'a str>) {
            if !negated && !out.contains(&term) {
                out.push(term);
            }
        }
        match self {
            Query::Term(term) => push(term, negated, out),
            Query::Phrase(terms) => {
                for term in terms {
                    push(term, negated, out);
                }
            }
            Query::And(children) | Query::Or(children) => {
                for child in children {
                    child.collect_terms(negated, out);
                }
            }
            Query::Not(inner) => inner.collect_terms(!negated, out),
            Query::FieldScoped { query, .. } => query.collect_terms(negated, out),
        }
    }

    // Nested nodes of the same kind are parenthesized so the tree shape survives
    fn needs_parens_under_and(&self) -> bool {
        matches!(self, Query::And(_) | Query::Or(_))
    }

    fn needs_parens_under_or(&self) -> bool {
        matches!(self, Query::Or(_))
    }

    fn needs_parens_under_not(&self) -> bool {
        matches!(self, Query::And(_) | Query::Or(_))
    }
}

fn is_keyword(term: &str) -> bool {
    matches!(term, "AND" | "OR" | "NOT")
}

fn needs_quoting(term: &str) -> bool {
    is_keyword(term) || term.contains(':')
}

/// Renders a string that parses back to the same tree.
impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Term(term) if needs_quoting(term) => write!(f, "\"{}\"", term),
            Query::Term(term) => f.write_str(term),
            Query::Phrase(terms) => write!(f, "\"{}\"", terms.join(" ")),
            Query::And(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" AND ")?;
                    }
                    if child.needs_parens_under_and() {
                        write!(f, "({})", child)?;
                    } else {
                        write!(f, "{}", child)?;
                    }
                }
                Ok(())
            }
            Query::Or(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    if child.needs_parens_under_or() {
                        write!(f, "({})", child)?;
                    } else {
                        write!(f, "{}", child)?;
                    }
                }
                Ok(())
            }
            Query::Not(inner) if inner.needs_parens_under_not() => write!(f, "NOT ({})", inner),
            Query::Not(inner) => write!(f, "NOT {}", inner),
            Query::FieldScoped { field, query } => write!(f, "{}:{}", field.name(), query),
        }
    }
}

/// Parses with the default analyzer.
impl FromStr for Query {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s, &Analyzer::default())
    }
}
