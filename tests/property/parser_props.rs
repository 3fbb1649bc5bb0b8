//! Query parser properties.

use proptest::prelude::*;
use scour::{parse, Analyzer, Query, SearchError};

/// Query-ish strings: words, operators, quotes, parentheses and fields.
fn query_strategy() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        4 => prop::string::string_regex("[a-z]{1,6}").unwrap(),
        1 => Just("AND".to_string()),
        1 => Just("OR".to_string()),
        1 => Just("NOT".to_string()),
        1 => Just("(".to_string()),
        1 => Just(")".to_string()),
        1 => Just("\"".to_string()),
        1 => Just("content:".to_string()),
        1 => Just("-".to_string()),
    ];
    prop::collection::vec(piece, 1..12).prop_map(|pieces| pieces.join(" "))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Arbitrary input never panics; errors point inside the input.
    #[test]
    fn prop_parse_never_panics(input in "\\PC{0,48}") {
        match parse(&input, &Analyzer::default()) {
            Ok(_) => {}
            Err(SearchError::QuerySyntax { position, .. }) => {
                prop_assert!(position <= input.chars().count());
            }
            Err(other) => prop_assert!(false, "unexpected error kind: {:?}", other),
        }
    }

    /// Rendering a parsed query and parsing it again gives the same tree.
    #[test]
    fn prop_display_round_trips(input in query_strategy()) {
        let Ok(query) = input.parse::<Query>() else {
            return Ok(());
        };
        let rendered = query.to_string();
        let reparsed: Query = rendered
            .parse()
            .map_err(|e| TestCaseError::fail(format!("{:?} -> {:?}: {}", input, rendered, e)))?;
        prop_assert_eq!(reparsed, query);
    }

    /// Parsing is a pure function of its input.
    #[test]
    fn prop_parse_is_deterministic(input in query_strategy()) {
        let a = input.parse::<Query>().ok();
        let b = input.parse::<Query>().ok();
        prop_assert_eq!(a, b);
    }

    /// Positive terms are never empty for a successful parse.
    #[test]
    fn prop_positive_terms_are_normalized(input in query_strategy()) {
        if let Ok(query) = input.parse::<Query>() {
            for term in query.positive_terms() {
                prop_assert!(!term.is_empty());
                prop_assert_eq!(term.to_lowercase(), term);
            }
        }
    }
}
