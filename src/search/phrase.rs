// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Phrase matching over positional postings.

use crate::types::{Posting, PostingList};

/// Count the places where the phrase occurs in one document.
///
/// `postings[i]` is the posting of the i-th phrase term in this document.
/// An occurrence starts at position `p` when term `i` sits at `p + i` for
/// every `i`.
pub fn phrase_freq(postings: &[&Posting]) -> usize {
    let Some((first, rest)) = postings.split_first() else {
        return 0;
    };

    first
        .positions
        .iter()
        .filter(|&&start| {
            rest.iter().enumerate().all(|(i, posting)| {
                start
                    .checked_add(i as u32 + 1)
                    .is_some_and(|want| posting.positions.binary_search(&want).is_ok())
            })
        })
        .count()
}

/// Documents containing every term of the phrase contiguously, with the
/// phrase frequency in each. Sorted by doc_id.
pub fn phrase_matches(lists: &[&PostingList]) -> Vec<(u32, usize)> {
    let Some((shortest_idx, shortest)) = lists
        .iter()
        .enumerate()
        .min_by_key(|(_, list)| list.doc_freq())
    else {
        return Vec::new();
    };

    let mut out = Vec::new();
    'docs: for candidate in &shortest.postings {
        let mut per_term: Vec<&Posting> = Vec::with_capacity(lists.len());
        for (i, list) in lists.iter().enumerate() {
            let posting = if i == shortest_idx {
                candidate
            } else {
                match list.get(candidate.doc_id) {
                    Some(p) => p,
                    None => continue 'docs,
                }
            };
            per_term.push(posting);
        }

        let freq = phrase_freq(&per_term);
        if freq > 0 {
            out.push((candidate.doc_id, freq));
        }
    }
    out
}
