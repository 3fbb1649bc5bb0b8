// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Posting list encoding/decoding.
//!
//! For each term: which documents contain it, and at which token positions.
//! Both doc_ids and positions are strictly increasing, so we store gaps. If
//! documents 100, 102, 105 contain "rust", we store [100, 2, 3] instead of
//! [100, 102, 105]. Small gaps fit in one varint byte.
//!
//! Positions are what make phrase queries possible. Dropping them would make
//! the file smaller and `"exact phrase"` impossible, so they are always there.
//!
//! # References
//!
//! - **Delta Encoding for Postings**: Classic Information Retrieval technique.
//!   See Croft, Metzler, Strohman (2009): "Search Engines: Information Retrieval
//!   in Practice", Chapter 5 "Ranking with Indexes". Also Zobel & Moffat (2006):
//!   "Inverted Files for Text Search Engines", ACM Computing Surveys.

use std::io;

use super::encoding::{encode_varint, read_varint};
use super::header::MAX_POSTING_SIZE;
use crate::types::{Posting, PostingList};

/// Encode a posting list with delta+varint compression.
///
/// Format:
/// - doc_freq: varint
/// - For each posting (sorted by doc_id):
///   - doc_id_delta: varint (first is absolute, then gap from previous)
///   - term_freq: varint (>= 1)
///   - For each position: varint (first is absolute, then gap from previous)
pub fn encode_postings(list: &PostingList, buf: &mut Vec<u8>) {
    encode_varint(list.postings.len() as u64, buf);

    let mut prev_doc_id = 0u32;
    for posting in &list.postings {
        encode_varint((posting.doc_id - prev_doc_id) as u64, buf);
        prev_doc_id = posting.doc_id;

        encode_varint(posting.positions.len() as u64, buf);
        let mut prev_pos = 0u32;
        for &pos in &posting.positions {
            encode_varint((pos - prev_pos) as u64, buf);
            prev_pos = pos;
        }
    }
}

fn invalid(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

/// Decode one posting list starting at `*pos`, advancing past it.
///
/// Gaps after the first entry must be non-zero, so a decoded list is always
/// strictly increasing. `doc_count` bounds every doc_id.
pub fn decode_postings(bytes: &[u8], pos: &mut usize, doc_count: u32) -> io::Result<PostingList> {
    let doc_freq = read_varint(bytes, pos)? as usize;
    if doc_freq == 0 {
        return Err(invalid("Empty posting list".to_string()));
    }
    if doc_freq > MAX_POSTING_SIZE || doc_freq > doc_count as usize {
        return Err(invalid(format!(
            "Posting list size {} exceeds limit (doc_count {})",
            doc_freq, doc_count
        )));
    }

    let mut postings = Vec::with_capacity(doc_freq);
    let mut doc_id = 0u32;

    for i in 0..doc_freq {
        let delta = read_varint(bytes, pos)?;
        if i > 0 && delta == 0 {
            return Err(invalid("Duplicate doc_id in posting list".to_string()));
        }
        doc_id = u32::try_from(delta)
            .ok()
            .and_then(|d| doc_id.checked_add(d))
            .filter(|&id| id < doc_count)
            .ok_or_else(|| invalid(format!("doc_id out of range (doc_count {})", doc_count)))?;

        let term_freq = read_varint(bytes, pos)? as usize;
        // Every position costs at least one byte
        if term_freq == 0 || term_freq > bytes.len().saturating_sub(*pos) {
            return Err(invalid(format!(
                "Invalid term frequency {} for doc {}",
                term_freq, doc_id
            )));
        }

        let mut positions = Vec::with_capacity(term_freq);
        let mut position = 0u32;
        for j in 0..term_freq {
            let gap = read_varint(bytes, pos)?;
            if j > 0 && gap == 0 {
                return Err(invalid(format!("Duplicate position in doc {}", doc_id)));
            }
            position = u32::try_from(gap)
                .ok()
                .and_then(|g| position.checked_add(g))
                .ok_or_else(|| invalid(format!("Position overflow in doc {}", doc_id)))?;
            positions.push(position);
        }

        postings.push(Posting { doc_id, positions });
    }

    Ok(PostingList { postings })
}
