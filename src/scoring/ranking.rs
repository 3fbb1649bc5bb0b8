// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result ranking: how search results get sorted.
//!
//! Score descending, then key ascending. Keys are unique within a namespace,
//! so the order is total and the same query always lists results the same way.

use std::cmp::Ordering;

use crate::types::ScoredMatch;

/// Compare two search results for ranking.
///
/// Sort order:
/// 1. **Score** - higher wins (NaN never occurs; treated as equal if it did)
/// 2. **Key** - alphabetical tiebreaker for determinism
pub fn compare_results(a: &ScoredMatch, b: &ScoredMatch) -> Ordering {
    match b.score.partial_cmp(&a.score) {
        Some(ord) if ord != Ordering::Equal => ord,
        _ => a.key.cmp(&b.key),
    }
}

/// Sort results in ranking order.
pub fn rank(results: &mut [ScoredMatch]) {
    results.sort_by(compare_results);
}
