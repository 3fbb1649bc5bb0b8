//! Phrase queries match consecutive positions only.

use crate::common::{search_keys, snapshot_of};

#[test]
fn test_phrase_in_order_matches() {
    let snap = snapshot_of(&[("dog", "fox jumps over the dog")]);
    assert_eq!(search_keys(&snap, "\"fox jumps\""), vec!["dog"]);
}

#[test]
fn test_phrase_reversed_does_not_match() {
    let snap = snapshot_of(&[("dog", "fox jumps over the dog")]);
    assert!(search_keys(&snap, "\"jumps fox\"").is_empty());
}

#[test]
fn test_phrase_needs_adjacency() {
    let snap = snapshot_of(&[("gap", "fox quietly jumps"), ("tight", "the fox jumps")]);
    assert_eq!(search_keys(&snap, "\"fox jumps\""), vec!["tight"]);
}

#[test]
fn test_phrase_ignores_punctuation_between_words() {
    let snap = snapshot_of(&[("a", "error, handling is hard")]);
    assert_eq!(search_keys(&snap, "\"error handling\""), vec!["a"]);
}

#[test]
fn test_hyphenated_word_is_a_phrase() {
    let snap = snapshot_of(&[("a", "a well known fact"), ("b", "known well")]);
    assert_eq!(search_keys(&snap, "well-known"), vec!["a"]);
}

#[test]
fn test_phrase_combines_with_boolean() {
    let snap = snapshot_of(&[
        ("a", "wait group in go"),
        ("b", "wait group with mutex"),
    ]);
    assert_eq!(search_keys(&snap, "\"wait group\" AND NOT mutex"), vec!["a"]);
}

#[test]
fn test_repeated_phrase_ranks_higher() {
    let snap = snapshot_of(&[
        ("once", "hash map and more words here"),
        ("twice", "hash map then hash map"),
    ]);
    assert_eq!(search_keys(&snap, "\"hash map\""), vec!["twice", "once"]);
}
