// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Spelling correction for queries that found nothing.
//!
//! Every positive term the vocabulary does not know is swapped for its
//! nearest vocabulary neighbour. Negated terms are left alone: correcting
//! `NOT colour` to `NOT color` would change which documents get excluded
//! without the user asking for it.
//!
//! Candidate choice, in order:
//! 1. smallest edit distance (must be within `max_distance`)
//! 2. highest document frequency
//! 3. lexicographically smallest

use crate::fuzzy::levenshtein_distance;
use crate::index::snapshot::Snapshot;
use crate::query::Query;

/// Default edit-distance bound for suggestions.
pub const DEFAULT_MAX_DISTANCE: usize = 2;

/// A query rewritten with vocabulary terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectedQuery {
    pub query: Query,
    /// The corrected query rendered back to query syntax.
    pub string: String,
    /// `(original, replacement)` pairs, in query order.
    pub substitutions: Vec<(String, String)>,
}

/// Propose a corrected query, or `None` if nothing needs (or can get)
/// correcting.
pub fn suggest(snapshot: &Snapshot, query: &Query, max_distance: usize) -> Option<CorrectedQuery> {
    let mut substitutions = Vec::new();
    let corrected = rewrite(snapshot, query, max_distance, false, &mut substitutions);

    if substitutions.is_empty() {
        return None;
    }
    Some(CorrectedQuery {
        string: corrected.to_string(),
        query: corrected,
        substitutions,
    })
}

fn rewrite(
    snapshot: &Snapshot,
    query: &Query,
    max_distance: usize,
    negated: bool,
    subs: &mut Vec<(String, String)>,
) -> Query {
    match query {
        Query::Term(term) => Query::Term(fix_term(snapshot, term, max_distance, negated, subs)),
        Query::Phrase(terms) => Query::Phrase(
            terms
                .iter()
                .map(|t| fix_term(snapshot, t, max_distance, negated, subs))
                .collect(),
        ),
        Query::And(children) => Query::And(
            children
                .iter()
                .map(|c| rewrite(snapshot, c, max_distance, negated, subs))
                .collect(),
        ),
        Query::Or(children) => Query::Or(
            children
                .iter()
                .map(|c| rewrite(snapshot, c, max_distance, negated, subs))
                .collect(),
        ),
        Query::Not(inner) => Query::Not(Box::new(rewrite(
            snapshot,
            inner,
            max_distance,
            !negated,
            subs,
        ))),
        Query::FieldScoped { field, query } => Query::FieldScoped {
            field: *field,
            query: Box::new(rewrite(snapshot, query, max_distance, negated, subs)),
        },
    }
}

fn fix_term(
    snapshot: &Snapshot,
    term: &str,
    max_distance: usize,
    negated: bool,
    subs: &mut Vec<(String, String)>,
) -> String {
    if negated || snapshot.contains_term(term) {
        return term.to_string();
    }
    match closest_term(snapshot, term, max_distance) {
        Some(replacement) => {
            subs.push((term.to_string(), replacement.clone()));
            replacement
        }
        None => term.to_string(),
    }
}

/// Nearest vocabulary term within `max_distance` edits.
pub fn closest_term(snapshot: &Snapshot, term: &str, max_distance: usize) -> Option<String> {
    let mut best: Option<(usize, usize, &str)> = None;

    // Vocabulary iterates in lexicographic order, so on a full tie the
    // earlier candidate is kept
    for candidate in snapshot.vocabulary() {
        let Some(distance) = levenshtein_distance(term, candidate, max_distance) else {
            continue;
        };
        let doc_freq = snapshot.doc_freq(candidate);
        let better = match best {
            None => true,
            Some((best_dist, best_df, _)) => {
                distance < best_dist || (distance == best_dist && doc_freq > best_df)
            }
        };
        if better {
            best = Some((distance, doc_freq, candidate));
        }
    }

    best.map(|(_, _, term)| term.to_string())
}
