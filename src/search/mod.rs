// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query evaluation: where the rubber meets the road.
//!
//! The tree is evaluated bottom-up into `doc_id -> score` maps:
//!
//! - `Term`: the posting list, each document scored by TF-IDF
//! - `Phrase`: documents with the terms at consecutive positions
//! - `And`: intersection, scores summed
//! - `Or`: union, scores summed
//! - `Not`: every document that does not match, score 0
//!
//! `a AND NOT b` never materializes the complement: negated conjuncts are
//! subtracted from the intersection of the positive ones.

pub mod phrase;

use std::collections::BTreeMap;

use tracing::trace;

use crate::index::snapshot::Snapshot;
use crate::query::Query;
use crate::scoring::{idf, rank, tf_idf};
use crate::types::{PostingList, ScoredMatch};

type Scores = BTreeMap<u32, f64>;

/// Run a query against a snapshot.
///
/// Returns every matching document, best first. Empty when nothing matches.
pub fn search(snapshot: &Snapshot, query: &Query) -> Vec<ScoredMatch> {
    let scores = evaluate(snapshot, query);

    let mut results: Vec<ScoredMatch> = scores
        .into_iter()
        .filter_map(|(doc_id, score)| {
            snapshot.document(doc_id).map(|doc| ScoredMatch {
                doc_id,
                key: doc.key.clone(),
                score,
            })
        })
        .collect();
    rank(&mut results);

    trace!(
        namespace = %snapshot.namespace(),
        query = %query,
        hits = results.len(),
        "search"
    );
    results
}

/// Run a query and keep only the best `limit` results.
pub fn search_with_limit(snapshot: &Snapshot, query: &Query, limit: usize) -> Vec<ScoredMatch> {
    let mut results = search(snapshot, query);
    results.truncate(limit);
    results
}

fn evaluate(snapshot: &Snapshot, query: &Query) -> Scores {
    match query {
        Query::Term(term) => term_scores(snapshot, term),
        Query::Phrase(terms) => phrase_scores(snapshot, terms),
        Query::FieldScoped { query, .. } => evaluate(snapshot, query),
        Query::Or(children) => {
            let mut acc = Scores::new();
            for child in children {
                for (doc_id, score) in evaluate(snapshot, child) {
                    *acc.entry(doc_id).or_insert(0.0) += score;
                }
            }
            acc
        }
        Query::And(children) => and_scores(snapshot, children),
        Query::Not(inner) => complement(snapshot, &evaluate(snapshot, inner)),
    }
}

fn term_scores(snapshot: &Snapshot, term: &str) -> Scores {
    let Some(list) = snapshot.postings(term) else {
        return Scores::new();
    };
    let idf = idf(snapshot.doc_count(), list.doc_freq());
    list.postings
        .iter()
        .map(|p| (p.doc_id, tf_idf(p.term_freq(), idf)))
        .collect()
}

fn phrase_scores(snapshot: &Snapshot, terms: &[String]) -> Scores {
    let lists: Option<Vec<&PostingList>> = terms.iter().map(|t| snapshot.postings(t)).collect();
    let Some(lists) = lists else {
        // Some term occurs nowhere, so the phrase cannot either
        return Scores::new();
    };

    let n = snapshot.doc_count();
    let idf_sum: f64 = lists.iter().map(|list| idf(n, list.doc_freq())).sum();
    phrase::phrase_matches(&lists)
        .into_iter()
        .map(|(doc_id, freq)| (doc_id, tf_idf(freq, idf_sum)))
        .collect()
}

fn and_scores(snapshot: &Snapshot, children: &[Query]) -> Scores {
    let (negated, positive): (Vec<&Query>, Vec<&Query>) =
        children.iter().partition(|c| matches!(c, Query::Not(_)));

    let mut acc: Option<Scores> = None;
    for child in positive {
        let scores = evaluate(snapshot, child);
        acc = Some(match acc {
            None => scores,
            Some(prev) => prev
                .into_iter()
                .filter_map(|(doc_id, score)| scores.get(&doc_id).map(|s| (doc_id, score + s)))
                .collect(),
        });
        if acc.as_ref().is_some_and(Scores::is_empty) {
            return Scores::new();
        }
    }

    let mut acc = acc.unwrap_or_else(|| all_docs(snapshot));
    for child in negated {
        if let Query::Not(inner) = child {
            let excluded = evaluate(snapshot, inner);
            acc.retain(|doc_id, _| !excluded.contains_key(doc_id));
        }
    }
    acc
}

fn all_docs(snapshot: &Snapshot) -> Scores {
    (0..snapshot.doc_count() as u32).map(|id| (id, 0.0)).collect()
}

fn complement(snapshot: &Snapshot, matched: &Scores) -> Scores {
    (0..snapshot.doc_count() as u32)
        .filter(|id| !matched.contains_key(id))
        .map(|id| (id, 0.0))
        .collect()
}
