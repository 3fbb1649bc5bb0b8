//! Upserts converge to "last write wins", however they are batched.

use std::collections::BTreeMap;

use proptest::prelude::*;
use scour::index::{Analyzer, Store};
use tempfile::TempDir;

use crate::common::{make_doc, ns};

fn content_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!["alpha", "beta", "gamma", "delta", "Alpha!", "..."]),
        0..5,
    )
    .prop_map(|words| words.join(" "))
}

/// Batches of (key, content) upserts; each batch is one commit.
fn batches_strategy() -> impl Strategy<Value = Vec<Vec<(String, String)>>> {
    let upsert = (prop::sample::select(vec!["a", "b", "c", "d"]), content_strategy())
        .prop_map(|(key, content)| (key.to_string(), content));
    prop::collection::vec(prop::collection::vec(upsert, 0..5), 1..5)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    #[test]
    fn prop_last_upsert_wins(batches in batches_strategy()) {
        let dir = TempDir::new().unwrap();
        let store = Store::open_or_create(dir.path(), ns("prop")).unwrap();
        let analyzer = Analyzer::default();

        // Oracle: the latest content per key that had something to index
        let mut expected: BTreeMap<String, String> = BTreeMap::new();
        for batch in &batches {
            let mut session = store.begin_write().unwrap();
            for (key, content) in batch {
                if session.upsert(make_doc(key, content)).is_ok() {
                    expected.insert(key.clone(), content.clone());
                }
            }
            session.commit().unwrap();
        }

        let snap = store.snapshot();
        prop_assert!(snap.check_well_formed().is_ok());
        prop_assert_eq!(snap.doc_count(), expected.len());

        for (key, content) in &expected {
            let doc = snap.document_by_key(key);
            prop_assert_eq!(doc.map(|d| d.content.as_str()), Some(content.as_str()));
        }

        // Postings reflect only the latest content
        for term in snap.vocabulary() {
            let holders = expected
                .values()
                .filter(|c| analyzer.terms(c).iter().any(|t| t == term))
                .count();
            prop_assert_eq!(snap.doc_freq(term), holders, "term {}", term);
        }

        // And the segment on disk agrees
        let reopened = Store::open_or_create(dir.path(), ns("prop")).unwrap().snapshot();
        prop_assert_eq!(reopened.doc_count(), snap.doc_count());
        prop_assert_eq!(reopened.terms(), snap.terms());
    }
}
