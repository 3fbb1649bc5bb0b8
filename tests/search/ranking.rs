//! Ranking order and scores.

use scour::{search, Query};

use crate::common::{search_keys, snapshot_of};

#[test]
fn test_higher_term_frequency_ranks_no_lower() {
    let snap = snapshot_of(&[
        ("once", "goroutine plus other words"),
        ("five", "goroutine goroutine goroutine goroutine goroutine"),
    ]);
    assert_eq!(search_keys(&snap, "goroutine"), vec!["five", "once"]);
}

#[test]
fn test_ties_break_by_key() {
    let snap = snapshot_of(&[("b", "same text"), ("c", "same text"), ("a", "same text")]);
    assert_eq!(search_keys(&snap, "same"), vec!["a", "b", "c"]);
}

#[test]
fn test_rare_terms_weigh_more() {
    let snap = snapshot_of(&[
        ("common", "channel"),
        ("rare", "select"),
        ("x", "channel"),
        ("y", "channel"),
    ]);
    // One occurrence each; "select" is in fewer documents
    assert_eq!(search_keys(&snap, "channel OR select")[0], "rare");
}

#[test]
fn test_or_sums_scores() {
    let snap = snapshot_of(&[("both", "alpha beta"), ("one", "alpha"), ("z", "gamma")]);
    assert_eq!(search_keys(&snap, "alpha OR beta"), vec!["both", "one"]);
}

#[test]
fn test_scores_are_positive_and_sorted() {
    let snap = snapshot_of(&[
        ("a", "rust rust async"),
        ("b", "rust"),
        ("c", "async async async"),
    ]);
    let query: Query = "rust async".parse().unwrap();
    let results = search(&snap, &query);
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.score > 0.0));
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_ranking_is_deterministic() {
    let docs: Vec<(String, String)> = (0..20)
        .map(|i| (format!("doc{:02}", i), format!("term {}", "filler ".repeat(i % 4))))
        .collect();
    let refs: Vec<(&str, &str)> = docs.iter().map(|(k, c)| (k.as_str(), c.as_str())).collect();
    let snap = snapshot_of(&refs);

    let first = search_keys(&snap, "term");
    for _ in 0..5 {
        assert_eq!(search_keys(&snap, "term"), first);
    }
}
