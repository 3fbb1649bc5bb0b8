// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The math behind search ranking.
//!
//! Plain TF-IDF with sublinear term frequency:
//!
//! ```text
//! score(t, d) = (1 + ln tf(t, d)) * ln(1 + N / df(t))
//! ```
//!
//! - `tf` is how often the term occurs in the document (>= 1 for a match)
//! - `N` is the number of documents in the namespace
//! - `df` is the number of documents containing the term
//!
//! # Key Properties
//!
//! - **Monotone in tf**: more occurrences never lower the score. A document
//!   mentioning a term five times ranks no lower than one mentioning it once.
//! - **Rare terms weigh more**: idf falls as df rises.
//! - **Always positive**: `ln(1 + N/df) > 0` whenever `df <= N`, so every
//!   matched positive leaf adds something.
//!
//! Phrases score like a single term: `tf` is the number of places the whole
//! phrase occurs, and the idf is the sum of its terms' idfs.

/// Inverse document frequency, smoothed so it never reaches zero.
///
/// Returns 0.0 for a term that occurs nowhere (`df == 0`).
#[inline]
pub fn idf(doc_count: usize, doc_freq: usize) -> f64 {
    if doc_freq == 0 || doc_count == 0 {
        return 0.0;
    }
    (1.0 + doc_count as f64 / doc_freq as f64).ln()
}

/// Sublinear term frequency weight. 0.0 when the term is absent.
#[inline]
pub fn tf_weight(term_freq: usize) -> f64 {
    if term_freq == 0 {
        0.0
    } else {
        1.0 + (term_freq as f64).ln()
    }
}

/// Score one leaf match in one document.
#[inline]
pub fn tf_idf(term_freq: usize, idf: f64) -> f64 {
    tf_weight(term_freq) * idf
}
