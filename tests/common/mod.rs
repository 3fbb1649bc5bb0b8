//! Shared test utilities and fixtures.

#![allow(dead_code)]

use scour::index::Snapshot;
use scour::{search, Engine, EngineConfig, Namespace, Query, QueryReport};
use tempfile::TempDir;

// Re-export canonical test utilities from scour::testing
pub use scour::testing::{make_doc, make_titled_doc, snapshot_of, snapshot_of_docs};

/// Shorthand for a namespace that is known to be valid.
pub fn ns(name: &str) -> Namespace {
    Namespace::new(name).unwrap()
}

/// Engine rooted in a fresh temporary directory.
///
/// The `TempDir` must outlive the engine, so it is returned alongside it.
pub fn temp_engine() -> (TempDir, Engine) {
    let dir = TempDir::new().unwrap();
    let engine = Engine::new(EngineConfig::default().with_index_dir(dir.path())).unwrap();
    (dir, engine)
}

/// Parse with the default analyzer and return matching keys in rank order.
pub fn search_keys(snapshot: &Snapshot, query: &str) -> Vec<String> {
    let parsed: Query = query.parse().unwrap();
    search(snapshot, &parsed).into_iter().map(|m| m.key).collect()
}

/// Keys of a query report, in rank order.
pub fn report_keys(report: &QueryReport) -> Vec<&str> {
    report.matches.iter().map(|m| m.key.as_str()).collect()
}
