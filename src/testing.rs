// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical implementations of test helpers to avoid duplication.

#![doc(hidden)]

use std::collections::BTreeMap;
use std::time::UNIX_EPOCH;

use crate::index::snapshot::{AnalyzedDoc, Snapshot};
use crate::index::tokenizer::Analyzer;
use crate::types::{Document, Namespace};

/// Namespace used by in-memory test snapshots.
pub const TEST_NAMESPACE: &str = "test";

/// Create a simple test document with a predictable url.
///
/// This is the canonical implementation used across all tests.
pub fn make_doc(key: &str, content: &str) -> Document {
    Document::new(key, format!("https://example.org/{}", key), content)
}

/// Create a test document with a title.
pub fn make_titled_doc(key: &str, title: &str, content: &str) -> Document {
    make_doc(key, content).with_title(title)
}

/// Build a committed snapshot in memory, without touching disk.
///
/// Documents with no indexable content are skipped, as a write session would.
pub fn snapshot_of(docs: &[(&str, &str)]) -> Snapshot {
    snapshot_of_docs(docs.iter().map(|(key, content)| make_doc(key, content)))
}

/// Same as [`snapshot_of`], from full documents.
pub fn snapshot_of_docs(docs: impl IntoIterator<Item = Document>) -> Snapshot {
    let analyzer = Analyzer::default();
    let staged: BTreeMap<String, AnalyzedDoc> = docs
        .into_iter()
        .filter_map(|doc| AnalyzedDoc::analyze(doc, &analyzer).ok())
        .map(|analyzed| (analyzed.doc.key.clone(), analyzed))
        .collect();

    let namespace = Namespace::new(TEST_NAMESPACE).expect("valid test namespace");
    Snapshot::empty(namespace, UNIX_EPOCH).merge(&staged, UNIX_EPOCH)
}
