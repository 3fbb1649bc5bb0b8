// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text analysis: raw text in, normalized terms with positions out.
//!
//! Splitting is fixed: any character that is not alphanumeric (or a combining
//! mark attached to one) is a delimiter. Normalization is a pipeline of
//! [`TokenFilter`] stages owned by an [`Analyzer`]. The default pipeline
//! lowercases and folds diacritics. Stemming or stop words would be one more
//! filter; the segment format only ever sees the resulting strings.
//!
//! The same analyzer MUST be used at write time and at query time. A term
//! that is normalized differently on the two sides silently never matches.

use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::util::normalize::fold_diacritics;

/// A normalized term and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub term: String,
    /// Ordinal among the tokens kept by the analyzer. Contiguous from 0.
    pub position: u32,
    /// Byte range of the raw word in the input text.
    pub start: usize,
    pub end: usize,
}

/// One normalization stage. Returning `None` drops the token.
pub trait TokenFilter: Send + Sync + fmt::Debug {
    fn apply(&self, term: String) -> Option<String>;
}

/// Unicode-aware lowercasing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lowercase;

impl TokenFilter for Lowercase {
    fn apply(&self, term: String) -> Option<String> {
        if term.chars().any(char::is_uppercase) {
            Some(term.to_lowercase())
        } else {
            Some(term)
        }
    }
}

/// Strips accents so `café` and `cafe` are the same term.
#[derive(Debug, Clone, Copy, Default)]
pub struct FoldDiacritics;

impl TokenFilter for FoldDiacritics {
    fn apply(&self, term: String) -> Option<String> {
        let folded = fold_diacritics(&term);
        if folded.is_empty() {
            None
        } else {
            Some(folded)
        }
    }
}

/// Word splitter plus a filter pipeline.
#[derive(Clone)]
pub struct Analyzer {
    filters: Vec<Arc<dyn TokenFilter>>,
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.filters.iter()).finish()
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::bare().with_filter(Lowercase).with_filter(FoldDiacritics)
    }
}

impl Analyzer {
    /// An analyzer that splits words and applies no normalization.
    pub fn bare() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Append a stage to the pipeline.
    pub fn with_filter(mut self, filter: impl TokenFilter + 'static) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Run one raw word through the pipeline.
    pub fn normalize_word(&self, word: &str) -> Option<String> {
        let mut term = word.to_string();
        for filter in &self.filters {
            term = filter.apply(term)?;
        }
        if term.is_empty() {
            None
        } else {
            Some(term)
        }
    }

    /// Tokenize text into normalized terms with positions and byte spans.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut position = 0u32;

        for (start, end) in word_spans(text) {
            if let Some(term) = self.normalize_word(&text[start..end]) {
                tokens.push(Token {
                    term,
                    position,
                    start,
                    end,
                });
                position += 1;
            }
        }

        tokens
    }

    /// Just the terms, in order.
    pub fn terms(&self, text: &str) -> Vec<String> {
        self.tokenize(text).into_iter().map(|t| t.term).collect()
    }
}

static DEFAULT_ANALYZER: LazyLock<Analyzer> = LazyLock::new(Analyzer::default);

/// Tokenize with the default analyzer.
pub fn tokenize(text: &str) -> Vec<Token> {
    DEFAULT_ANALYZER.tokenize(text)
}

/// Word boundary detection: combining marks stay with the letter they modify.
#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || ('\u{0300}'..='\u{036F}').contains(&c)
}

/// Byte ranges of maximal runs of word characters.
fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        match (is_word_char(c), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }

    spans
}
