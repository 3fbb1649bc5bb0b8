// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Excerpts of matched documents with the matching words marked.
//!
//! Content is cut into sentence-like units at `.`, `!`, `?` and newlines. The
//! units with the most matched tokens win; ties go to the unit with more
//! distinct matched terms, then to the earlier one. Winners come back in
//! document order so the excerpt reads naturally.
//!
//! Extraction and presentation are separate. A [`Fragment`] only records byte
//! spans; [`Fragment::render`] applies whatever [`EmphasisFormatter`] the
//! caller hands it: ANSI colors in a terminal, brackets in a test, HTML tags
//! on a web page.

use std::collections::HashSet;
use std::ops::Range;

use serde::Serialize;

use crate::index::tokenizer::Analyzer;

/// Default number of fragments per document.
pub const DEFAULT_MAX_FRAGMENTS: usize = 3;

const BOUNDARIES: &[char] = &['.', '!', '?', '\n'];

/// Decides how an emphasized span is presented.
pub trait EmphasisFormatter {
    fn format_emphasis(&self, text: &str) -> String;
}

impl<F> EmphasisFormatter for F
where
    F: Fn(&str) -> String,
{
    fn format_emphasis(&self, text: &str) -> String {
        self(text)
    }
}

/// Wraps emphasized text in square brackets: `[term]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BracketEmphasis;

impl EmphasisFormatter for BracketEmphasis {
    fn format_emphasis(&self, text: &str) -> String {
        format!("[{}]", text)
    }
}

/// One excerpt and the byte ranges of its matched words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub text: String,
    /// Sorted, non-overlapping byte ranges into `text`.
    pub spans: Vec<Range<usize>>,
}

impl Fragment {
    /// Text with every span passed through the formatter.
    pub fn render(&self, formatter: &dyn EmphasisFormatter) -> String {
        let mut out = String::with_capacity(self.text.len() + self.spans.len() * 8);
        let mut cursor = 0;
        for span in &self.spans {
            out.push_str(&self.text[cursor..span.start]);
            out.push_str(&formatter.format_emphasis(&self.text[span.clone()]));
            cursor = span.end;
        }
        out.push_str(&self.text[cursor..]);
        out
    }
}

/// Split content into trimmed sentence-like units. The boundary character
/// stays with the unit it ends.
fn sentences(content: &str) -> Vec<&str> {
    content
        .split_inclusive(BOUNDARIES)
        .map(str::trim)
        .filter(|unit| !unit.is_empty())
        .collect()
}

/// Pick the best fragments of `content` for the given normalized terms.
///
/// Returns at most `max_fragments` fragments in document order; empty when
/// no unit contains a matched term.
pub fn highlight(
    content: &str,
    matched_terms: &[&str],
    analyzer: &Analyzer,
    max_fragments: usize,
) -> Vec<Fragment> {
    if matched_terms.is_empty() || max_fragments == 0 {
        return Vec::new();
    }
    let wanted: HashSet<&str> = matched_terms.iter().copied().collect();

    // (index, matched tokens, distinct terms, fragment)
    let mut candidates: Vec<(usize, usize, usize, Fragment)> = Vec::new();
    for (index, unit) in sentences(content).into_iter().enumerate() {
        let mut spans = Vec::new();
        let mut distinct: HashSet<String> = HashSet::new();
        for token in analyzer.tokenize(unit) {
            if wanted.contains(token.term.as_str()) {
                spans.push(token.start..token.end);
                distinct.insert(token.term);
            }
        }
        if !spans.is_empty() {
            candidates.push((
                index,
                spans.len(),
                distinct.len(),
                Fragment {
                    text: unit.to_string(),
                    spans,
                },
            ));
        }
    }

    candidates.sort_by(|a, b| b.1.cmp(&a.1).then(b.2.cmp(&a.2)).then(a.0.cmp(&b.0)));
    candidates.truncate(max_fragments);
    candidates.sort_by_key(|c| c.0);
    candidates.into_iter().map(|c| c.3).collect()
}
