//! Readers never observe a half-applied commit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use scour::index::Store;
use scour::{search, Query, SearchError};
use tempfile::TempDir;

use crate::common::{make_doc, ns, search_keys};

#[test]
fn test_snapshot_taken_before_commit_does_not_see_it() {
    let dir = TempDir::new().unwrap();
    let store = Store::open_or_create(dir.path(), ns("go")).unwrap();

    let before = store.snapshot();
    let mut session = store.begin_write().unwrap();
    session.upsert(make_doc("late", "arrives after the search began")).unwrap();
    session.commit().unwrap();

    assert!(search_keys(&before, "arrives").is_empty());
    assert_eq!(search_keys(&store.snapshot(), "arrives"), vec!["late"]);
}

#[test]
fn test_readers_see_whole_generations() {
    const COMMITS: usize = 20;
    const BATCH: usize = 5;

    let dir = TempDir::new().unwrap();
    let store = Arc::new(Store::open_or_create(dir.path(), ns("go")).unwrap());
    let done = AtomicBool::new(false);
    let query: Query = "shared".parse().unwrap();

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let mut last_generation = 0;
                while !done.load(Ordering::Acquire) {
                    let snap = store.snapshot();
                    assert!(snap.generation() >= last_generation);
                    last_generation = snap.generation();

                    // Every commit adds a full batch, so a consistent view
                    // always holds a multiple of BATCH documents, all matching
                    let hits = search(&snap, &query);
                    assert_eq!(hits.len(), snap.doc_count());
                    assert_eq!(snap.doc_count() % BATCH, 0);
                    assert_eq!(snap.doc_count(), snap.generation() as usize * BATCH);
                }
            });
        }

        scope.spawn(|| {
            for commit in 0..COMMITS {
                let mut session = store.begin_write().unwrap();
                for i in 0..BATCH {
                    let key = format!("doc-{}-{}", commit, i);
                    session.upsert(make_doc(&key, "shared words")).unwrap();
                }
                session.commit().unwrap();
            }
            done.store(true, Ordering::Release);
        });
    });

    let snap = store.snapshot();
    assert_eq!(snap.generation(), COMMITS as u64);
    assert_eq!(snap.doc_count(), COMMITS * BATCH);
}

#[test]
fn test_writer_lock_is_exclusive_across_threads() {
    let dir = TempDir::new().unwrap();
    let store = Store::open_or_create(dir.path(), ns("go")).unwrap();
    let session = store.begin_write().unwrap();

    thread::scope(|scope| {
        let handle = scope.spawn(|| store.begin_write().map(|_| ()));
        let result = handle.join().unwrap();
        assert!(matches!(result, Err(SearchError::WriteConflict(_))));
    });

    drop(session);
    assert!(store.begin_write().is_ok());
}
