// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Accent folding for search terms.
//!
//! This enables matching between ASCII and accented versions:
//! - "café" → "cafe"
//! - "naïve" → "naive"
//! - "señor" → "senor"

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::UnicodeNormalization;

/// Strip diacritics from a word.
///
/// # Algorithm (with unicode-normalization feature)
///
/// 1. NFD normalize (decompose characters into base + combining marks)
/// 2. Filter out combining marks (category Mn = Mark, Nonspacing)
///
/// Without the feature this is the identity, so an index built with the
/// feature must be queried with it too.
#[cfg(feature = "unicode-normalization")]
pub fn fold_diacritics(value: &str) -> String {
    if value.is_ascii() {
        return value.to_string();
    }
    value.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

#[cfg(not(feature = "unicode-normalization"))]
pub fn fold_diacritics(value: &str) -> String {
    value.to_string()
}

/// Check if a character is a combining mark (diacritic).
///
/// Examples: ́ (acute), ̄ (macron), ̣ (dot below)
#[cfg(feature = "unicode-normalization")]
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1AB0}'..='\u{1AFF}' |  // Combining Diacritical Marks Extended
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}
