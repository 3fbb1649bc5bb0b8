// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the query parser and search.
//!
//! Users type anything: unbalanced quotes, emoji, stray operators, null
//! bytes. Parsing must return a tree or a positioned syntax error, and every
//! tree must render back to a string that parses to the same tree.

#![no_main]

use libfuzzer_sys::fuzz_target;
use scour::testing::snapshot_of;
use scour::{search, Query, SearchError, Snapshot};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let query = match input.parse::<Query>() {
        Ok(query) => query,
        Err(SearchError::QuerySyntax { position, .. }) => {
            assert!(position <= input.chars().count());
            return;
        }
        Err(other) => panic!("unexpected error kind: {:?}", other),
    };

    let rendered = query.to_string();
    let reparsed: Query = rendered.parse().expect("rendered query must parse");
    assert_eq!(reparsed, query);

    // Evaluation must hold up on a small corpus too
    static CORPUS: std::sync::OnceLock<Snapshot> = std::sync::OnceLock::new();
    let snapshot = CORPUS.get_or_init(|| {
        snapshot_of(&[
            ("a", "the quick brown fox"),
            ("b", "fox jumps over the lazy dog"),
            ("c", "goroutines and channels"),
        ])
    });
    let results = search(snapshot, &query);
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(results.iter().all(|r| (r.doc_id as usize) < snapshot.doc_count()));
});
