//! Boolean semantics and basic matching.

use crate::common::{search_keys, snapshot_of};

#[test]
fn test_present_term_matches() {
    let snap = snapshot_of(&[("fox", "the quick brown fox")]);
    assert_eq!(search_keys(&snap, "quick"), vec!["fox"]);
}

#[test]
fn test_absent_term_is_empty() {
    let snap = snapshot_of(&[("fox", "the quick brown fox")]);
    assert!(search_keys(&snap, "zzqqxx").is_empty());
}

#[test]
fn test_case_and_punctuation_variants_match() {
    let snap = snapshot_of(&[("shout", "Go!"), ("plain", "go")]);
    let mut keys = search_keys(&snap, "go");
    keys.sort();
    assert_eq!(keys, vec!["plain", "shout"]);
}

#[test]
fn test_diacritics_fold() {
    let snap = snapshot_of(&[("cafe", "Un café noir")]);
    assert_eq!(search_keys(&snap, "cafe"), vec!["cafe"]);
    assert_eq!(search_keys(&snap, "CAFÉ"), vec!["cafe"]);
}

#[test]
fn test_and_requires_every_term() {
    let snap = snapshot_of(&[
        ("both", "rust async runtime"),
        ("rust", "rust borrow checker"),
        ("async", "async python"),
    ]);
    assert_eq!(search_keys(&snap, "rust AND async"), vec!["both"]);
}

#[test]
fn test_adjacent_terms_are_or() {
    let snap = snapshot_of(&[("a", "alpha"), ("b", "beta"), ("c", "gamma")]);
    let mut keys = search_keys(&snap, "alpha beta");
    keys.sort();
    assert_eq!(keys, vec!["a", "b"]);
}

#[test]
fn test_and_not_excludes() {
    let snap = snapshot_of(&[
        ("safe", "rust is memory safe"),
        ("unsafe", "rust unsafe blocks"),
    ]);
    assert_eq!(search_keys(&snap, "rust AND NOT unsafe"), vec!["safe"]);
}

#[test]
fn test_bare_not_is_complement() {
    let snap = snapshot_of(&[("a", "alpha"), ("b", "beta"), ("c", "alpha beta")]);
    let keys = search_keys(&snap, "NOT alpha");
    assert_eq!(keys, vec!["b"]);
}

#[test]
fn test_grouping_changes_meaning() {
    let snap = snapshot_of(&[
        ("a", "alpha"),
        ("ac", "alpha gamma"),
        ("b", "beta"),
        ("bc", "beta gamma"),
    ]);
    // AND binds tighter: alpha OR (beta AND gamma)
    let mut loose = search_keys(&snap, "alpha OR beta AND gamma");
    loose.sort();
    assert_eq!(loose, vec!["a", "ac", "bc"]);

    let mut grouped = search_keys(&snap, "(alpha OR beta) AND gamma");
    grouped.sort();
    assert_eq!(grouped, vec!["ac", "bc"]);
}

#[test]
fn test_field_scope_on_content() {
    let snap = snapshot_of(&[("a", "tokio runtime")]);
    assert_eq!(search_keys(&snap, "content:tokio"), vec!["a"]);
}

#[test]
fn test_title_is_not_searchable() {
    use crate::common::{make_titled_doc, snapshot_of_docs};

    let snap = snapshot_of_docs([make_titled_doc("a", "Channels", "pipes between goroutines")]);
    assert!(search_keys(&snap, "channels").is_empty());
    assert_eq!(search_keys(&snap, "pipes"), vec!["a"]);
}

#[test]
fn test_empty_namespace_returns_nothing() {
    let snap = snapshot_of(&[]);
    assert!(search_keys(&snap, "anything").is_empty());
    assert!(search_keys(&snap, "NOT anything").is_empty());
}
