//! Tokenizer properties.

use proptest::prelude::*;
use scour::index::{tokenize, Analyzer};

use crate::common::{search_keys, snapshot_of};

fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9]{1,8}").unwrap()
}

fn separator_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ .,;:!?()\\-/\"'\n\t]{1,3}").unwrap()
}

fn unicode_word_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "café".to_string(),
        "naïve".to_string(),
        "Résumé".to_string(),
        "über".to_string(),
        "tōkyō".to_string(),
        "తెలుగు".to_string(),
        "hello".to_string(),
        "WORLD".to_string(),
    ])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Same input, same tokens.
    #[test]
    fn prop_tokenize_is_deterministic(text in "\\PC{0,64}") {
        prop_assert_eq!(tokenize(&text), tokenize(&text));
    }

    /// Positions count up from zero and spans point at the raw words.
    #[test]
    fn prop_positions_and_spans_are_consistent(text in "\\PC{0,64}") {
        let analyzer = Analyzer::default();
        let tokens = analyzer.tokenize(&text);
        for (i, token) in tokens.iter().enumerate() {
            prop_assert_eq!(token.position as usize, i);
            prop_assert!(token.start < token.end);
            prop_assert!(text.is_char_boundary(token.start));
            prop_assert!(text.is_char_boundary(token.end));
            let raw = &text[token.start..token.end];
            prop_assert_eq!(analyzer.normalize_word(raw), Some(token.term.clone()));
        }
    }

    /// Terms never contain whitespace or ASCII upper-case letters.
    #[test]
    fn prop_terms_are_normalized(text in "\\PC{0,64}") {
        for token in tokenize(&text) {
            prop_assert!(!token.term.is_empty());
            prop_assert!(!token.term.chars().any(char::is_whitespace));
            prop_assert!(!token.term.chars().any(|c| c.is_ascii_uppercase()));
        }
    }

    /// Punctuation between words does not change the terms.
    #[test]
    fn prop_separators_are_interchangeable(
        words in prop::collection::vec(word_strategy(), 1..8),
        sep in separator_strategy(),
    ) {
        let spaced = words.join(" ");
        let punctuated = words.join(&sep);
        let terms = |s: &str| tokenize(s).into_iter().map(|t| t.term).collect::<Vec<_>>();
        prop_assert_eq!(terms(&spaced), terms(&punctuated));
    }

    /// Case variants tokenize identically.
    #[test]
    fn prop_case_insensitive(words in prop::collection::vec(unicode_word_strategy(), 1..6)) {
        let text = words.join(" ");
        let terms = |s: &str| tokenize(s).into_iter().map(|t| t.term).collect::<Vec<_>>();
        prop_assert_eq!(terms(&text.to_uppercase()), terms(&text.to_lowercase()));
    }

    /// A word and its shouted, punctuated form find the same documents.
    #[test]
    fn prop_variants_match_same_query(word in "[a-z]{2,8}") {
        let shouted = format!("{}!", word.to_uppercase());
        let snap = snapshot_of(&[("plain", word.as_str()), ("shout", shouted.as_str())]);
        let mut keys = search_keys(&snap, &word);
        keys.sort();
        prop_assert_eq!(keys, vec!["plain".to_string(), "shout".to_string()]);
    }
}
