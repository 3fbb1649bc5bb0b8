// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of a namespace index.
//!
//! Documents go in, postings come out, scored matches and reports go back to
//! the caller. Everything that crosses the public API lives here.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **Namespace**: non-empty, ASCII alphanumerics plus `-`, `_`, `.`, and no
//!   leading `.`. It names a directory, so anything else is rejected up front.
//!
//! - **PostingList**: `postings` sorted strictly by `doc_id`, every posting has
//!   at least one position, positions strictly increasing. `doc_freq()` is the
//!   number of postings.
//!
//! - **ScoredMatch**: `doc_id < snapshot.doc_count()`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::highlight::Fragment;

// =============================================================================
// NAMESPACE
// =============================================================================

/// An isolated index, one per subject or language.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Namespace(String);

impl Namespace {
    /// Validate and wrap a namespace name.
    pub fn new(name: impl Into<String>) -> Result<Self, SearchError> {
        let name = name.into();
        let reason = if name.is_empty() {
            Some("name is empty")
        } else if name.starts_with('.') {
            Some("name must not start with '.'")
        } else if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            Some("only ASCII letters, digits, '-', '_' and '.' are allowed")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(SearchError::InvalidNamespace { name, reason }),
            None => Ok(Namespace(name)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Namespace {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Namespace::new(s)
    }
}

impl TryFrom<String> for Namespace {
    type Error = SearchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Namespace::new(value)
    }
}

impl From<Namespace> for String {
    fn from(ns: Namespace) -> Self {
        ns.0
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// DOCUMENTS
// =============================================================================

/// A document as submitted by a content source.
///
/// Only `content` is tokenized. `url` and `title` are stored verbatim and come
/// back with search results, but queries never match them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub key: String,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
}

impl Document {
    pub fn new(key: impl Into<String>, url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            url: url.into(),
            title: None,
            content: content.into(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

// =============================================================================
// POSTINGS
// =============================================================================

/// One document's occurrences of a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: u32,
    /// Token ordinals within the document, strictly increasing.
    pub positions: Vec<u32>,
}

impl Posting {
    /// Term frequency in this document.
    #[inline]
    pub fn term_freq(&self) -> usize {
        self.positions.len()
    }
}

/// Posting list for a single term, sorted by `doc_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingList {
    pub postings: Vec<Posting>,
}

impl PostingList {
    /// Number of documents containing the term.
    #[inline]
    pub fn doc_freq(&self) -> usize {
        self.postings.len()
    }

    /// Binary search for a document's posting.
    pub fn get(&self, doc_id: u32) -> Option<&Posting> {
        self.postings
            .binary_search_by_key(&doc_id, |p| p.doc_id)
            .ok()
            .map(|i| &self.postings[i])
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// A document that satisfied a query, with its relevance score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMatch {
    pub doc_id: u32,
    pub key: String,
    pub score: f64,
}

/// Outcome of an indexing run for one namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    pub indexed: usize,
    pub skipped: usize,
    /// Keys that were skipped (no content, or the source had nothing).
    pub skipped_keys: Vec<String>,
}

/// A single search hit ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub key: String,
    pub url: String,
    pub title: Option<String>,
    pub score: f64,
    pub fragments: Vec<Fragment>,
}

/// Outcome of a query against one namespace.
///
/// When `used_correction` is set, the original query matched nothing and
/// `matches` are the results of the corrected query. Callers must show both.
#[derive(Debug, Clone, Serialize)]
pub struct QueryReport {
    pub namespace: Namespace,
    pub query: String,
    pub matches: Vec<MatchReport>,
    pub used_correction: Option<String>,
}
