//! Spelling correction when a query finds nothing.

use scour::fuzzy::{suggest, DEFAULT_MAX_DISTANCE};
use scour::Query;

use crate::common::{make_doc, ns, report_keys, snapshot_of, temp_engine};

#[test]
fn test_misspelling_triggers_correction() {
    let (_dir, engine) = temp_engine();
    engine
        .index(&ns("go"), vec![make_doc("fn", "a function returns values")])
        .unwrap();

    let report = engine.query(&ns("go"), "functoin").unwrap();
    assert_eq!(report.used_correction.as_deref(), Some("function"));
    assert_eq!(report_keys(&report), vec!["fn"]);
    assert_eq!(report.query, "functoin");
}

#[test]
fn test_no_correction_beyond_threshold() {
    let (_dir, engine) = temp_engine();
    engine
        .index(&ns("go"), vec![make_doc("fn", "a function returns values")])
        .unwrap();

    let report = engine.query(&ns("go"), "fnctxxxn").unwrap();
    assert!(report.used_correction.is_none());
    assert!(report.matches.is_empty());
}

#[test]
fn test_hits_skip_correction() {
    let (_dir, engine) = temp_engine();
    engine
        .index(
            &ns("go"),
            vec![make_doc("a", "function"), make_doc("b", "functions")],
        )
        .unwrap();

    let report = engine.query(&ns("go"), "function").unwrap();
    assert!(report.used_correction.is_none());
    assert_eq!(report_keys(&report), vec!["a"]);
}

#[test]
fn test_correction_keeps_operators() {
    let snap = snapshot_of(&[("a", "channel buffer"), ("b", "channel select")]);
    let query: Query = "chanel AND NOT selcet".parse().unwrap();
    let corrected = suggest(&snap, &query, DEFAULT_MAX_DISTANCE).unwrap();
    assert_eq!(corrected.string, "channel AND NOT selcet");
}

#[test]
fn test_correction_applies_inside_phrases() {
    let snap = snapshot_of(&[("a", "wait group")]);
    let query: Query = "\"wiat group\"".parse().unwrap();
    let corrected = suggest(&snap, &query, DEFAULT_MAX_DISTANCE).unwrap();
    assert_eq!(corrected.query, Query::Phrase(vec!["wait".into(), "group".into()]));
}

#[test]
fn test_zero_distance_disables_correction() {
    let snap = snapshot_of(&[("a", "function")]);
    let query: Query = "functoin".parse().unwrap();
    assert!(suggest(&snap, &query, 0).is_none());
}
