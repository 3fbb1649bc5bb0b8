// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Immutable, committed view of a namespace.
//!
//! A snapshot is built once (by a commit or by loading a segment) and never
//! mutated afterwards. Readers hold it through an `Arc`, so a concurrent commit
//! cannot change what an in-flight search sees.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **DOCS_SORTED**: `docs` is sorted strictly by key, so `doc_id` order is key order
//! 2. **POSTING_LIST_SORTED**: each posting list is sorted strictly by `doc_id`
//! 3. **NON_EMPTY**: every term has at least one posting, every posting one position
//! 4. **POSTING_WELLFORMED**: every `doc_id < docs.len()`, positions strictly increasing

use std::collections::{BTreeMap, HashSet};
use std::time::SystemTime;

use crate::error::{Result, SearchError};
use crate::index::tokenizer::Analyzer;
use crate::types::{Document, Namespace, Posting, PostingList};

/// A document after analysis, waiting in a write session.
#[derive(Debug, Clone)]
pub(crate) struct AnalyzedDoc {
    pub doc: Document,
    /// term -> positions, positions ascending
    pub terms: BTreeMap<String, Vec<u32>>,
}

impl AnalyzedDoc {
    /// Tokenize a document's content. Fails with `EmptyContent` if nothing is left.
    pub fn analyze(doc: Document, analyzer: &Analyzer) -> Result<Self> {
        let mut terms: BTreeMap<String, Vec<u32>> = BTreeMap::new();
        for token in analyzer.tokenize(&doc.content) {
            terms.entry(token.term).or_default().push(token.position);
        }

        if terms.is_empty() {
            return Err(SearchError::EmptyContent { key: doc.key });
        }
        Ok(Self { doc, terms })
    }
}

/// Point-in-time view of a namespace's documents and postings.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    namespace: Namespace,
    generation: u64,
    committed_at: SystemTime,
    docs: Vec<Document>,
    terms: BTreeMap<String, PostingList>,
}

impl Snapshot {
    /// A namespace with nothing in it.
    pub(crate) fn empty(namespace: Namespace, committed_at: SystemTime) -> Self {
        Self {
            namespace,
            generation: 0,
            committed_at,
            docs: Vec::new(),
            terms: BTreeMap::new(),
        }
    }

    pub(crate) fn from_parts(
        namespace: Namespace,
        generation: u64,
        committed_at: SystemTime,
        docs: Vec<Document>,
        terms: BTreeMap<String, PostingList>,
    ) -> Self {
        Self {
            namespace,
            generation,
            committed_at,
            docs,
            terms,
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Incremented by every successful commit. 0 for a freshly created namespace.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn committed_at(&self) -> SystemTime {
        self.committed_at
    }

    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Stored fields, ordered by key.
    pub fn documents(&self) -> &[Document] {
        &self.docs
    }

    pub fn document(&self, doc_id: u32) -> Option<&Document> {
        self.docs.get(doc_id as usize)
    }

    pub fn doc_id(&self, key: &str) -> Option<u32> {
        self.docs
            .binary_search_by(|d| d.key.as_str().cmp(key))
            .ok()
            .map(|i| i as u32)
    }

    pub fn document_by_key(&self, key: &str) -> Option<&Document> {
        self.doc_id(key).and_then(|id| self.document(id))
    }

    pub fn postings(&self, term: &str) -> Option<&PostingList> {
        self.terms.get(term)
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    pub fn doc_freq(&self, term: &str) -> usize {
        self.terms.get(term).map_or(0, PostingList::doc_freq)
    }

    /// Sorted vocabulary.
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    pub fn terms(&self) -> &BTreeMap<String, PostingList> {
        &self.terms
    }

    /// Total number of (term, document, position) occurrences.
    pub fn total_positions(&self) -> usize {
        self.terms
            .values()
            .flat_map(|list| list.postings.iter())
            .map(Posting::term_freq)
            .sum()
    }

    /// Build the next generation: staged documents replace any existing
    /// document with the same key, everything else carries over.
    ///
    /// Old postings are filtered and remapped rather than re-tokenized. Because
    /// both the old and the merged document lists are sorted by key, the
    /// old-to-new id mapping is monotonic and filtered lists stay sorted.
    pub(crate) fn merge(
        &self,
        staged: &BTreeMap<String, AnalyzedDoc>,
        committed_at: SystemTime,
    ) -> Snapshot {
        enum Origin<'a> {
            Kept(u32),
            Staged(&'a AnalyzedDoc),
        }

        let mut merged: Vec<(&str, Origin<'_>)> = self
            .docs
            .iter()
            .enumerate()
            .filter(|(_, doc)| !staged.contains_key(&doc.key))
            .map(|(id, doc)| (doc.key.as_str(), Origin::Kept(id as u32)))
            .chain(
                staged
                    .iter()
                    .map(|(key, analyzed)| (key.as_str(), Origin::Staged(analyzed))),
            )
            .collect();
        merged.sort_by(|a, b| a.0.cmp(b.0));

        let mut remap: Vec<Option<u32>> = vec![None; self.docs.len()];
        let mut docs = Vec::with_capacity(merged.len());
        let mut fresh: Vec<(u32, &AnalyzedDoc)> = Vec::with_capacity(staged.len());

        for (new_id, (_, origin)) in merged.iter().enumerate() {
            let new_id = new_id as u32;
            match origin {
                Origin::Kept(old_id) => {
                    remap[*old_id as usize] = Some(new_id);
                    docs.push(self.docs[*old_id as usize].clone());
                }
                Origin::Staged(analyzed) => {
                    fresh.push((new_id, *analyzed));
                    docs.push(analyzed.doc.clone());
                }
            }
        }

        // Carry over postings of surviving documents
        let mut terms: BTreeMap<String, PostingList> = BTreeMap::new();
        for (term, list) in &self.terms {
            let postings: Vec<Posting> = list
                .postings
                .iter()
                .filter_map(|p| {
                    remap[p.doc_id as usize].map(|doc_id| Posting {
                        doc_id,
                        positions: p.positions.clone(),
                    })
                })
                .collect();
            if !postings.is_empty() {
                terms.insert(term.clone(), PostingList { postings });
            }
        }

        // Insert postings of staged documents
        let mut touched: HashSet<&str> = HashSet::new();
        for (doc_id, analyzed) in fresh {
            for (term, positions) in &analyzed.terms {
                terms.entry(term.clone()).or_default().postings.push(Posting {
                    doc_id,
                    positions: positions.clone(),
                });
                touched.insert(term.as_str());
            }
        }
        for term in touched {
            if let Some(list) = terms.get_mut(term) {
                list.postings.sort_by_key(|p| p.doc_id);
            }
        }

        Snapshot {
            namespace: self.namespace.clone(),
            generation: self.generation + 1,
            committed_at,
            docs,
            terms,
        }
    }

    /// Check every structural invariant. Used when loading untrusted bytes.
    pub fn check_well_formed(&self) -> std::result::Result<(), String> {
        for pair in self.docs.windows(2) {
            if pair[0].key >= pair[1].key {
                return Err(format!(
                    "document keys not strictly sorted: '{}' >= '{}'",
                    pair[0].key, pair[1].key
                ));
            }
        }

        let doc_count = self.docs.len() as u32;
        for (term, list) in &self.terms {
            if list.postings.is_empty() {
                return Err(format!("empty posting list for '{}'", term));
            }
            let mut prev_doc: Option<u32> = None;
            for posting in &list.postings {
                if posting.doc_id >= doc_count {
                    return Err(format!(
                        "posting for '{}' references doc {} (only {} docs)",
                        term, posting.doc_id, doc_count
                    ));
                }
                if prev_doc.is_some_and(|prev| prev >= posting.doc_id) {
                    return Err(format!("posting list for '{}' not sorted", term));
                }
                prev_doc = Some(posting.doc_id);

                if posting.positions.is_empty() {
                    return Err(format!(
                        "posting for '{}' in doc {} has no positions",
                        term, posting.doc_id
                    ));
                }
                if posting.positions.windows(2).any(|w| w[0] >= w[1]) {
                    return Err(format!(
                        "positions for '{}' in doc {} not increasing",
                        term, posting.doc_id
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    fn ns() -> Namespace {
        Namespace::new("test").unwrap()
    }

    fn stage(docs: &[(&str, &str)]) -> BTreeMap<String, AnalyzedDoc> {
        let analyzer = Analyzer::default();
        docs.iter()
            .map(|(key, content)| {
                let doc = Document::new(*key, format!("https://x/{}", key), *content);
                (key.to_string(), AnalyzedDoc::analyze(doc, &analyzer).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_analyze_rejects_empty_content() {
        let doc = Document::new("k", "u", " ... !!! ");
        let err = AnalyzedDoc::analyze(doc, &Analyzer::default()).unwrap_err();
        assert!(matches!(err, SearchError::EmptyContent { key } if key == "k"));
    }

    #[test]
    fn test_merge_into_empty() {
        let base = Snapshot::empty(ns(), UNIX_EPOCH);
        let next = base.merge(&stage(&[("b", "rust is great"), ("a", "rust code")]), UNIX_EPOCH);

        assert_eq!(next.generation(), 1);
        assert_eq!(next.doc_count(), 2);
        assert_eq!(next.document(0).unwrap().key, "a");
        assert_eq!(next.doc_freq("rust"), 2);
        assert!(next.check_well_formed().is_ok());
    }

    #[test]
    fn test_merge_replaces_old_postings() {
        let base = Snapshot::empty(ns(), UNIX_EPOCH);
        let first = base.merge(&stage(&[("a", "alpha beta"), ("b", "beta gamma")]), UNIX_EPOCH);
        let second = first.merge(&stage(&[("a", "delta")]), UNIX_EPOCH);

        assert_eq!(second.doc_count(), 2);
        assert!(!second.contains_term("alpha"));
        assert_eq!(second.doc_freq("beta"), 1);
        assert_eq!(second.postings("delta").unwrap().postings[0].doc_id, 0);
        assert!(second.check_well_formed().is_ok());

        // The previous generation is untouched
        assert!(first.contains_term("alpha"));
        assert_eq!(first.doc_freq("beta"), 2);
    }

    #[test]
    fn test_merge_remaps_doc_ids_in_key_order() {
        let base = Snapshot::empty(ns(), UNIX_EPOCH);
        let first = base.merge(&stage(&[("c", "shared"), ("e", "shared")]), UNIX_EPOCH);
        let second = first.merge(&stage(&[("a", "shared"), ("d", "shared")]), UNIX_EPOCH);

        let keys: Vec<&str> = second.documents().iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "c", "d", "e"]);
        let ids: Vec<u32> = second
            .postings("shared")
            .unwrap()
            .postings
            .iter()
            .map(|p| p.doc_id)
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert!(second.check_well_formed().is_ok());
    }

    #[test]
    fn test_positions_recorded() {
        let base = Snapshot::empty(ns(), UNIX_EPOCH);
        let snap = base.merge(&stage(&[("a", "to be or not to be")]), UNIX_EPOCH);
        assert_eq!(snap.postings("to").unwrap().postings[0].positions, vec![0, 4]);
        assert_eq!(snap.postings("be").unwrap().postings[0].positions, vec![1, 5]);
        assert_eq!(snap.total_positions(), 6);
    }

    #[test]
    fn test_check_well_formed_catches_bad_doc_id() {
        let mut terms = BTreeMap::new();
        terms.insert(
            "x".to_string(),
            PostingList {
                postings: vec![Posting {
                    doc_id: 3,
                    positions: vec![0],
                }],
            },
        );
        let snap = Snapshot::from_parts(ns(), 1, UNIX_EPOCH, vec![], terms);
        assert!(snap.check_well_formed().is_err());
    }
}
