// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Edit distance with an early-exit optimization.
//!
//! The key insight: `|len(a) - len(b)|` is a lower bound on edit distance.
//! If two strings differ in length by more than the threshold, skip the O(nm) DP.
//! When correcting a misspelled query term against the whole vocabulary, most
//! candidates are rejected before allocating anything.

/// Bounded edit distance, counting an adjacent transposition as one edit.
///
/// This is the optimal string alignment variant of Levenshtein: `functoin` is
/// one edit from `function`, not two. Returns `Some(d)` when `d <= max`,
/// `None` otherwise. Two early-exit paths:
/// 1. If length difference exceeds `max`, return immediately
/// 2. If minimum row value exceeds `max`, abandon the DP early
///
/// Both are sound: the length difference and every row minimum are lower
/// bounds on the final distance.
pub fn levenshtein_distance(a: &str, b: &str, max: usize) -> Option<usize> {
    // Use characters, not bytes, for Unicode correctness
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // Early-exit: length difference is a lower bound on edit distance
    if a.len().abs_diff(b.len()) > max {
        return None;
    }

    let mut prev_prev: Vec<usize> = vec![0; b.len() + 1];
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        let mut min_row = curr[0];

        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            let mut best = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = best.min(prev_prev[j - 2] + 1);
            }
            curr[j] = best;
            min_row = min_row.min(best);
        }

        // Early-exit: if minimum in this row exceeds max, no point continuing
        if min_row > max {
            return None;
        }

        std::mem::swap(&mut prev_prev, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }

    let distance = prev[b.len()];
    (distance <= max).then_some(distance)
}

/// Are these strings within `max` edits of each other?
#[inline]
pub fn levenshtein_within(a: &str, b: &str, max: usize) -> bool {
    levenshtein_distance(a, b, max).is_some()
}
