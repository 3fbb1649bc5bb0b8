// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for the engine.
//!
//! Everything fallible returns `Result<T, SearchError>`. Nothing in the library
//! panics or exits on bad input: a corrupt segment is a `Storage` error for that
//! namespace only, a malformed query is a `QuerySyntax` error with a position,
//! and a document without indexable text is `EmptyContent` (counted as skipped
//! by callers, never fatal).
//!
//! "No results" is deliberately absent. An empty result list is a valid answer
//! that triggers spelling correction, not a failure.

use std::io;

use thiserror::Error;

use crate::types::Namespace;

/// Errors surfaced by indexing, querying and storage.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Persisted state could not be read, written or validated.
    #[error("storage error ({context}): {source}")]
    Storage {
        context: String,
        #[source]
        source: io::Error,
    },

    /// A write session is already open for this namespace.
    #[error("a write session is already open for namespace '{0}'")]
    WriteConflict(Namespace),

    /// The query string could not be parsed. `position` is a character offset.
    #[error("query syntax error at position {position}: {message}")]
    QuerySyntax { message: String, position: usize },

    /// The document produced no tokens after analysis.
    #[error("document '{key}' has no indexable content")]
    EmptyContent { key: String },

    /// A query targeted a namespace with no persisted segment.
    #[error("namespace '{0}' has not been indexed yet")]
    NotIndexed(Namespace),

    /// A namespace name is not usable as a directory name.
    #[error("invalid namespace '{name}': {reason}")]
    InvalidNamespace { name: String, reason: &'static str },

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// The external document source failed.
    #[error("document source error: {0}")]
    Source(String),
}

impl SearchError {
    /// Wrap an I/O error with a human-readable context.
    pub fn storage(context: impl Into<String>, source: io::Error) -> Self {
        SearchError::Storage {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn syntax(message: impl Into<String>, position: usize) -> Self {
        SearchError::QuerySyntax {
            message: message.into(),
            position,
        }
    }

    /// Recoverable errors leave the engine usable; the caller may retry,
    /// fix the input or simply count the item as skipped.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SearchError::WriteConflict(_)
                | SearchError::QuerySyntax { .. }
                | SearchError::EmptyContent { .. }
                | SearchError::NotIndexed(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
