// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! On-disk segment format for a namespace.
//!
//! One namespace is one segment file. A commit writes the whole snapshot to a
//! temp file and renames it over the old one, so a reader of the directory
//! sees either the previous generation or the new one, never a mix.
//!
//! # Security Considerations
//!
//! Segments are parsed as if they came from an untrusted source:
//! - All size fields are validated against MAX_* constants
//! - Bounds checking prevents buffer overreads
//! - CRC32 footer detects corruption/truncation
//! - Varint decoder has maximum iteration limits
//! - The decoded snapshot is checked against every structural invariant
//!
//! # Format Overview (v1)
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ HEADER (48 bytes)                                          │
//! │   magic: [u8; 4] = "SCUR"                                  │
//! │   version: u8 = 1                                          │
//! │   flags: u8                                                │
//! │   reserved: [u8; 2]                                        │
//! │   doc_count: u32, term_count: u32                          │
//! │   generation: u64, committed_at_ms: u64                    │
//! │   docs_len: u32, vocab_len: u32, postings_len: u32         │
//! │   reserved: [u8; 4]                                        │
//! ├────────────────────────────────────────────────────────────┤
//! │ 1. DOCS (key, url, optional title, content; key order)     │
//! ├────────────────────────────────────────────────────────────┤
//! │ 2. VOCABULARY (front-compressed, sorted)                   │
//! ├────────────────────────────────────────────────────────────┤
//! │ 3. POSTINGS (delta+varint, one list per vocabulary term)   │
//! ├────────────────────────────────────────────────────────────┤
//! │ FOOTER (8 bytes)                                           │
//! │   crc32: u32 (over header + all sections)                  │
//! │   magic: [u8; 4] = "RUCS"                                  │
//! └────────────────────────────────────────────────────────────┘
//! ```

mod encoding;
mod header;
mod postings;

pub use encoding::{
    decode_docs, decode_string, decode_varint, decode_vocabulary, encode_docs, encode_string,
    encode_varint, encode_vocabulary,
};
pub use header::{
    millis_to_system_time, system_time_to_millis, FormatFlags, SectionOffsets, SegmentFooter,
    SegmentHeader, FOOTER_MAGIC, MAGIC, MAX_DOC_COUNT, MAX_FILE_SIZE, MAX_POSTING_SIZE,
    MAX_TERM_COUNT, MAX_VARINT_BYTES, VERSION,
};
pub use postings::{decode_postings, encode_postings};

use std::collections::BTreeMap;
use std::io;

use crate::index::snapshot::Snapshot;
use crate::types::{Namespace, PostingList};

/// File name of the segment inside a namespace directory.
pub const SEGMENT_FILE: &str = "segment.scour";

fn section_len(len: usize, name: &str) -> io::Result<u32> {
    u32::try_from(len).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} section too large: {} bytes", name, len),
        )
    })
}

/// Serialize a snapshot into a complete segment (header, sections, footer).
pub fn encode_segment(snapshot: &Snapshot) -> io::Result<Vec<u8>> {
    let mut docs_bytes = Vec::new();
    encode_docs(snapshot.documents(), &mut docs_bytes);

    let mut vocab_bytes = Vec::new();
    encode_vocabulary(snapshot.vocabulary(), &mut vocab_bytes);

    let mut postings_bytes = Vec::new();
    for list in snapshot.terms().values() {
        encode_postings(list, &mut postings_bytes);
    }

    let header = SegmentHeader {
        version: VERSION,
        flags: FormatFlags::new().with_positions(),
        doc_count: section_len(snapshot.doc_count(), "docs count")?,
        term_count: section_len(snapshot.term_count(), "term count")?,
        generation: snapshot.generation(),
        committed_at_ms: system_time_to_millis(snapshot.committed_at()),
        docs_len: section_len(docs_bytes.len(), "docs")?,
        vocab_len: section_len(vocab_bytes.len(), "vocabulary")?,
        postings_len: section_len(postings_bytes.len(), "postings")?,
    };

    let total_size = header.section_offsets().total_size();
    let mut buf = Vec::with_capacity(total_size);
    header.write(&mut buf)?;
    buf.extend_from_slice(&docs_bytes);
    buf.extend_from_slice(&vocab_bytes);
    buf.extend_from_slice(&postings_bytes);

    // Compute CRC32 over everything written so far
    let crc32 = SegmentFooter::compute_crc32(&buf);
    SegmentFooter { crc32 }.write(&mut buf)?;

    Ok(buf)
}

/// Parse and validate just the header.
///
/// Cheap: no checksum, no section decoding. Used for listing namespaces.
pub fn read_header(bytes: &[u8]) -> io::Result<SegmentHeader> {
    let header = SegmentHeader::read(&mut io::Cursor::new(bytes))?;
    if header.version != VERSION {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Unsupported version: {} (expected {})",
                header.version, VERSION
            ),
        ));
    }
    Ok(header)
}

/// Deserialize a segment into a snapshot (with CRC32 validation)
///
/// # Validation
///
/// 1. File size is within limits (MAX_FILE_SIZE)
/// 2. Footer magic is valid ("RUCS") and CRC32 checksum matches
/// 3. Header magic is valid ("SCUR") and version is supported
/// 4. Counts are within limits and section lengths add up to the file size
/// 5. Every section is consumed exactly
/// 6. The resulting snapshot satisfies every structural invariant
pub fn decode_segment(namespace: Namespace, bytes: &[u8]) -> io::Result<Snapshot> {
    // Security: Check file size limits
    if bytes.len() > MAX_FILE_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "File too large: {} bytes (max {})",
                bytes.len(),
                MAX_FILE_SIZE
            ),
        ));
    }

    // Minimum size: header + footer
    let min_size = SegmentHeader::SIZE + SegmentFooter::SIZE;
    if bytes.len() < min_size {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "File too small: {} bytes (minimum {})",
                bytes.len(),
                min_size
            ),
        ));
    }

    // Verify footer magic and read CRC32
    let footer = SegmentFooter::read(bytes)?;
    let content = &bytes[..bytes.len() - SegmentFooter::SIZE];
    let computed_crc32 = SegmentFooter::compute_crc32(content);

    if footer.crc32 != computed_crc32 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "CRC32 mismatch: expected {:#010x}, got {:#010x} (file corrupted)",
                footer.crc32, computed_crc32
            ),
        ));
    }

    let header = read_header(bytes)?;

    if header.doc_count > MAX_DOC_COUNT {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Too many documents: {} (max {})",
                header.doc_count, MAX_DOC_COUNT
            ),
        ));
    }

    if header.term_count > MAX_TERM_COUNT {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Too many terms: {} (max {})",
                header.term_count, MAX_TERM_COUNT
            ),
        ));
    }

    // Get section offsets from SINGLE SOURCE OF TRUTH
    let offsets = header.section_offsets();

    if offsets.content_size() != content.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Section lengths mismatch: header claims {} bytes, got {} bytes",
                offsets.content_size(),
                content.len()
            ),
        ));
    }

    let extract_section = |section: (usize, usize), name: &str| -> io::Result<&[u8]> {
        offsets.slice(bytes, section).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("{} section out of bounds", name),
            )
        })
    };

    let docs = decode_docs(
        extract_section(offsets.docs, "Docs")?,
        header.doc_count as usize,
    )?;
    let vocabulary = decode_vocabulary(
        extract_section(offsets.vocabulary, "Vocabulary")?,
        header.term_count as usize,
    )?;

    let postings_bytes = extract_section(offsets.postings, "Postings")?;
    let mut pos = 0;
    let mut terms: BTreeMap<String, PostingList> = BTreeMap::new();
    for term in vocabulary {
        let list = decode_postings(postings_bytes, &mut pos, header.doc_count)?;
        terms.insert(term, list);
    }
    if pos != postings_bytes.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "{} trailing bytes in postings section",
                postings_bytes.len() - pos
            ),
        ));
    }

    let snapshot = Snapshot::from_parts(
        namespace,
        header.generation,
        header.committed_at(),
        docs,
        terms,
    );
    snapshot
        .check_well_formed()
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidData, msg))?;

    Ok(snapshot)
}
