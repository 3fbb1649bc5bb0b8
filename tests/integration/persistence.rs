//! Segments survive reopening; broken segments stay contained.

use std::fs;

use scour::binary::SegmentFooter;
use scour::index::{segment_path, Store};
use scour::{Engine, EngineConfig, SearchError};
use tempfile::TempDir;

use crate::common::{make_doc, ns, report_keys, search_keys};

#[test]
fn test_reopen_sees_committed_state() {
    let dir = TempDir::new().unwrap();
    {
        let store = Store::open_or_create(dir.path(), ns("go")).unwrap();
        let mut session = store.begin_write().unwrap();
        session.upsert(make_doc("maps", "maps are hash tables")).unwrap();
        session.upsert(make_doc("slices", "slices grow")).unwrap();
        session.commit().unwrap();
    }

    let store = Store::open_or_create(dir.path(), ns("go")).unwrap();
    let snap = store.snapshot();
    assert_eq!(snap.generation(), 1);
    assert_eq!(snap.doc_count(), 2);
    assert_eq!(search_keys(&snap, "hash"), vec!["maps"]);
    assert_eq!(
        snap.document_by_key("slices").map(|d| d.url.as_str()),
        Some("https://example.org/slices")
    );
}

#[test]
fn test_upsert_is_idempotent_across_commits() {
    let dir = TempDir::new().unwrap();
    let store = Store::open_or_create(dir.path(), ns("go")).unwrap();

    for content in ["first version", "second version"] {
        let mut session = store.begin_write().unwrap();
        session.upsert(make_doc("doc", content)).unwrap();
        session.commit().unwrap();
    }

    let snap = Store::open_or_create(dir.path(), ns("go")).unwrap().snapshot();
    assert_eq!(snap.doc_count(), 1);
    assert!(!snap.contains_term("first"));
    assert_eq!(search_keys(&snap, "second"), vec!["doc"]);
    assert_eq!(snap.doc_freq("version"), 1);
    assert_eq!(snap.generation(), 2);
}

#[test]
fn test_dropped_session_leaves_snapshot_unchanged() {
    let dir = TempDir::new().unwrap();
    let store = Store::open_or_create(dir.path(), ns("go")).unwrap();
    {
        let mut session = store.begin_write().unwrap();
        session.upsert(make_doc("a", "committed")).unwrap();
        session.commit().unwrap();
    }
    let before = store.snapshot();

    {
        let mut session = store.begin_write().unwrap();
        session.upsert(make_doc("b", "never committed")).unwrap();
        // dropped without commit
    }

    let after = store.snapshot();
    assert_eq!(after.generation(), before.generation());
    assert!(after.document_by_key("b").is_none());

    let reopened = Store::open_or_create(dir.path(), ns("go")).unwrap().snapshot();
    assert!(reopened.document_by_key("b").is_none());

    // The writer lock was released
    assert!(store.begin_write().is_ok());
}

#[test]
fn test_second_writer_conflicts() {
    let dir = TempDir::new().unwrap();
    let store = Store::open_or_create(dir.path(), ns("go")).unwrap();

    let first = store.begin_write().unwrap();
    let err = store.begin_write().unwrap_err();
    assert!(matches!(err, SearchError::WriteConflict(_)));
    assert!(err.is_recoverable());

    first.rollback();
    assert!(store.begin_write().is_ok());
}

#[test]
fn test_corrupt_segment_only_breaks_its_namespace() {
    let dir = TempDir::new().unwrap();
    let config = EngineConfig::default().with_index_dir(dir.path());
    {
        let engine = Engine::new(config.clone()).unwrap();
        engine.index(&ns("go"), vec![make_doc("g", "maps")]).unwrap();
        engine.index(&ns("rust"), vec![make_doc("r", "maps")]).unwrap();
    }

    let path = segment_path(dir.path(), &ns("go"));
    let mut bytes = fs::read(&path).unwrap();
    // Last content byte, so the header stays readable
    let target = bytes.len() - SegmentFooter::SIZE - 1;
    bytes[target] ^= 0xFF;
    fs::write(&path, bytes).unwrap();

    let engine = Engine::new(config).unwrap();
    let results = engine.query_many(&[], "maps").unwrap();
    assert_eq!(results.len(), 2);

    let (go, go_result) = &results[0];
    assert_eq!(go.as_str(), "go");
    match go_result {
        Err(SearchError::Storage { .. }) => {}
        other => panic!("expected storage error, got {:?}", other),
    }

    let (_, rust_result) = &results[1];
    assert_eq!(report_keys(rust_result.as_ref().unwrap()), vec!["r"]);
}

#[test]
fn test_truncated_segment_is_rejected() {
    let dir = TempDir::new().unwrap();
    {
        let store = Store::open_or_create(dir.path(), ns("go")).unwrap();
        let mut session = store.begin_write().unwrap();
        session.upsert(make_doc("a", "alpha beta gamma")).unwrap();
        session.commit().unwrap();
    }

    let path = segment_path(dir.path(), &ns("go"));
    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

    let err = Store::open_or_create(dir.path(), ns("go")).unwrap_err();
    assert!(matches!(err, SearchError::Storage { .. }));
    assert!(!err.is_recoverable());
}

#[test]
fn test_discovery_skips_foreign_directories() {
    let dir = TempDir::new().unwrap();
    let engine = Engine::new(EngineConfig::default().with_index_dir(dir.path())).unwrap();
    engine.index(&ns("go"), vec![make_doc("a", "x")]).unwrap();

    fs::create_dir_all(dir.path().join("empty")).unwrap();
    fs::create_dir_all(dir.path().join(".hidden")).unwrap();
    fs::write(dir.path().join("stray.txt"), "not a namespace").unwrap();

    let listed = engine.list_namespaces().unwrap();
    let names: Vec<&str> = listed.keys().map(|n| n.as_str()).collect();
    assert_eq!(names, vec!["go"]);
}

#[test]
fn test_commit_time_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let store = Store::open_or_create(dir.path(), ns("go")).unwrap();
    let mut session = store.begin_write().unwrap();
    session.upsert(make_doc("a", "x")).unwrap();
    let committed = session.commit().unwrap();

    let reopened = Store::open_or_create(dir.path(), ns("go")).unwrap();
    assert_eq!(reopened.last_modified_time(), committed.committed_at());
}
