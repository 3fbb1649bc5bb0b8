// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Write sessions: stage upserts, then commit them all at once.
//!
//! Staged documents are invisible to readers until [`WriteSession::commit`]
//! has persisted the new segment and swapped the snapshot. Dropping a session
//! (or calling [`WriteSession::rollback`]) throws the staged work away.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{Result, SearchError};
use crate::index::snapshot::{AnalyzedDoc, Snapshot};
use crate::index::store::{commit_timestamp, Store};
use crate::types::Document;

/// Which keys of a batch were staged and which had nothing to index.
///
/// Both lists hold distinct keys in ascending order. A key repeated in the
/// batch appears once; a key that was empty once but had content elsewhere in
/// the batch counts as staged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub indexed: Vec<String>,
    pub skipped: Vec<String>,
}

/// Exclusive write access to one namespace.
#[derive(Debug)]
pub struct WriteSession<'a> {
    store: &'a Store,
    staged: BTreeMap<String, AnalyzedDoc>,
}

impl<'a> WriteSession<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self {
            store,
            staged: BTreeMap::new(),
        }
    }

    /// Number of distinct keys staged so far.
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Stage a document, replacing any staged version with the same key.
    ///
    /// Returns `EmptyContent` (and stages nothing) when the content has no
    /// indexable tokens.
    pub fn upsert(&mut self, document: Document) -> Result<()> {
        let analyzed = AnalyzedDoc::analyze(document, self.store.analyzer())?;
        self.stage(analyzed);
        Ok(())
    }

    /// Stage a batch. Tokenization runs in parallel, staging keeps input
    /// order so the last occurrence of a key wins.
    pub fn upsert_all(&mut self, documents: Vec<Document>) -> UpsertOutcome {
        let analyzer = self.store.analyzer();

        #[cfg(feature = "parallel")]
        let analyzed: Vec<Result<AnalyzedDoc>> = documents
            .into_par_iter()
            .map(|doc| AnalyzedDoc::analyze(doc, analyzer))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let analyzed: Vec<Result<AnalyzedDoc>> = documents
            .into_iter()
            .map(|doc| AnalyzedDoc::analyze(doc, analyzer))
            .collect();

        let mut indexed = BTreeSet::new();
        let mut empty = BTreeSet::new();
        for result in analyzed {
            match result {
                Ok(doc) => {
                    indexed.insert(doc.doc.key.clone());
                    self.stage(doc);
                }
                Err(SearchError::EmptyContent { key }) => {
                    warn!(namespace = %self.store.namespace(), key = %key, "no content, skipping");
                    empty.insert(key);
                }
                Err(e) => {
                    // analyze only fails with EmptyContent
                    warn!(namespace = %self.store.namespace(), error = %e, "skipping document");
                }
            }
        }

        // A key that had content anywhere in the batch is staged, not skipped
        UpsertOutcome {
            skipped: empty.difference(&indexed).cloned().collect(),
            indexed: indexed.into_iter().collect(),
        }
    }

    fn stage(&mut self, analyzed: AnalyzedDoc) {
        self.staged.insert(analyzed.doc.key.clone(), analyzed);
    }

    /// Merge staged documents into the committed snapshot, persist the new
    /// segment, and publish it.
    ///
    /// On failure the previous snapshot and segment are untouched and the
    /// staged work is discarded.
    pub fn commit(self) -> Result<Arc<Snapshot>> {
        let base = self.store.snapshot();
        if self.staged.is_empty() {
            debug!(namespace = %self.store.namespace(), "nothing staged, commit is a no-op");
            return Ok(base);
        }

        let next = base.merge(&self.staged, commit_timestamp());
        let published = self.store.persist_and_publish(next)?;
        info!(
            namespace = %self.store.namespace(),
            generation = published.generation(),
            upserted = self.staged.len(),
            docs = published.doc_count(),
            terms = published.term_count(),
            "committed"
        );
        Ok(published)
    }

    /// Discard staged documents and release the write lock.
    pub fn rollback(self) {
        debug!(
            namespace = %self.store.namespace(),
            discarded = self.staged.len(),
            "rolled back"
        );
    }
}

impl Drop for WriteSession<'_> {
    fn drop(&mut self) {
        self.store.release_writer();
    }
}
