// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzzy matching: typo tolerance via edit distance.
//!
//! A bounded edit distance for one-off comparisons, and the query corrector
//! built on it that runs when a search comes back empty.

mod levenshtein;
pub mod correct;

pub use correct::{closest_term, suggest, CorrectedQuery, DEFAULT_MAX_DISTANCE};
pub use levenshtein::*;
