// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary encoding primitives: varint, length-prefixed strings, front
//! compression, and the stored-fields section.
//!
//! # References
//!
//! - **Varint (LEB128)**: Little-endian base-128 variable-length integer encoding.
//!   See Google Protocol Buffers encoding: <https://protobuf.dev/programming-guides/encoding/>
//!
//! - **Front Compression**: Incremental encoding for sorted string sequences.
//!   Witten, Moffat, Bell (1999): "Managing Gigabytes", §3.3 "Front Coding".

use std::io;

use super::header::MAX_VARINT_BYTES;
use crate::types::Document;

// ============================================================================
// VARINT ENCODING
// ============================================================================

/// Encode a varint to bytes
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        } else {
            buf.push(byte | 0x80);
        }
    }
}

/// Decode a varint from bytes, returning (value, bytes_consumed)
///
/// Returns an error if:
/// - Buffer is empty
/// - Varint exceeds MAX_VARINT_BYTES (malformed/malicious input)
pub fn decode_varint(bytes: &[u8]) -> io::Result<(u64, usize)> {
    if bytes.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Empty buffer for varint",
        ));
    }

    let mut result: u64 = 0;
    let mut shift = 0;
    let mut i = 0;

    while i < bytes.len() && i < MAX_VARINT_BYTES {
        let byte = bytes[i];
        result |= ((byte & 0x7F) as u64) << shift;
        i += 1;
        if byte & 0x80 == 0 {
            return Ok((result, i));
        }
        shift += 7;
    }

    if i >= MAX_VARINT_BYTES {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "Varint exceeds maximum length (possible corruption)",
        ))
    } else {
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Incomplete varint",
        ))
    }
}

/// Read a varint at `*pos` and advance.
pub(crate) fn read_varint(bytes: &[u8], pos: &mut usize) -> io::Result<u64> {
    let rest = bytes.get(*pos..).ok_or_else(|| {
        io::Error::new(io::ErrorKind::UnexpectedEof, "Read past end of section")
    })?;
    let (value, consumed) = decode_varint(rest)?;
    *pos += consumed;
    Ok(value)
}

// ============================================================================
// STRINGS
// ============================================================================

/// Encode a length-prefixed UTF-8 string
pub fn encode_string(value: &str, buf: &mut Vec<u8>) {
    encode_varint(value.len() as u64, buf);
    buf.extend_from_slice(value.as_bytes());
}

/// Decode a length-prefixed UTF-8 string at `*pos` and advance.
pub fn decode_string(bytes: &[u8], pos: &mut usize, what: &str) -> io::Result<String> {
    let len = read_varint(bytes, pos)? as usize;

    // Use checked arithmetic to prevent overflow
    let end_pos = pos.checked_add(len).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} length {} causes overflow", what, len),
        )
    })?;
    if end_pos > bytes.len() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("Truncated {} (expected {} bytes)", what, len),
        ));
    }

    let value = String::from_utf8(bytes[*pos..end_pos].to_vec()).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Invalid UTF-8 in {}: {}", what, e),
        )
    })?;
    *pos = end_pos;
    Ok(value)
}

// ============================================================================
// STORED FIELDS
// ============================================================================

/// Encode stored fields for every document.
///
/// Format per document:
/// - key: string
/// - url: string
/// - has_title: u8 (0 or 1), then title: string if 1
/// - content: string
pub fn encode_docs(docs: &[Document], buf: &mut Vec<u8>) {
    for doc in docs {
        encode_string(&doc.key, buf);
        encode_string(&doc.url, buf);
        match &doc.title {
            Some(title) => {
                buf.push(1);
                encode_string(title, buf);
            }
            None => buf.push(0),
        }
        encode_string(&doc.content, buf);
    }
}

/// Decode `doc_count` documents. The section must be consumed exactly.
pub fn decode_docs(bytes: &[u8], doc_count: usize) -> io::Result<Vec<Document>> {
    // Each document needs at least 4 bytes (three empty strings + title flag)
    if doc_count > bytes.len() / 4 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Document count {} exceeds available bytes {}",
                doc_count,
                bytes.len()
            ),
        ));
    }

    let mut docs = Vec::with_capacity(doc_count);
    let mut pos = 0;

    for i in 0..doc_count {
        let key = decode_string(bytes, &mut pos, "document key")?;
        let url = decode_string(bytes, &mut pos, "document url")?;

        let flag = *bytes.get(pos).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("Truncated title flag for document {}", i),
            )
        })?;
        pos += 1;
        let title = match flag {
            0 => None,
            1 => Some(decode_string(bytes, &mut pos, "document title")?),
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Invalid title flag {} for document {}", other, i),
                ))
            }
        };

        let content = decode_string(bytes, &mut pos, "document content")?;
        docs.push(Document {
            key,
            url,
            title,
            content,
        });
    }

    if pos != bytes.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} trailing bytes in docs section", bytes.len() - pos),
        ));
    }

    Ok(docs)
}

// ============================================================================
// VOCABULARY ENCODING (front compression)
// ============================================================================

/// Calculate the common prefix length between two byte slices.
fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

/// Encode vocabulary with front compression.
///
/// Since vocabulary is sorted, consecutive terms share prefixes.
/// Format: [shared_prefix_len: varint][suffix_len: varint][suffix: bytes]
///
/// Example:
/// - "function" -> [0][8]["function"]
/// - "functions" -> [8][1]["s"]
/// - "fundamental" -> [3][8]["damental"]
pub fn encode_vocabulary<'a>(vocabulary: impl IntoIterator<Item = &'a str>, out: &mut Vec<u8>) {
    let mut prev: &[u8] = &[];

    for term in vocabulary {
        let bytes = term.as_bytes();
        let shared = common_prefix_len(prev, bytes);
        let suffix = &bytes[shared..];

        encode_varint(shared as u64, out);
        encode_varint(suffix.len() as u64, out);
        out.extend_from_slice(suffix);

        prev = bytes;
    }
}

/// Decode vocabulary with front compression.
pub fn decode_vocabulary(bytes: &[u8], term_count: usize) -> io::Result<Vec<String>> {
    // Each term needs at least 2 bytes (two varints)
    if term_count > bytes.len() / 2 + 1 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Term count {} exceeds available bytes {}",
                term_count,
                bytes.len()
            ),
        ));
    }

    let mut terms = Vec::with_capacity(term_count);
    let mut pos = 0;
    let mut prev_bytes: Vec<u8> = Vec::new();

    for i in 0..term_count {
        let shared = read_varint(bytes, &mut pos)? as usize;
        if shared > prev_bytes.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Invalid shared prefix length {} (prev term len {})",
                    shared,
                    prev_bytes.len()
                ),
            ));
        }

        let suffix_len = read_varint(bytes, &mut pos)? as usize;
        let end_pos = pos.checked_add(suffix_len).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Term {} suffix length {} causes overflow", i, suffix_len),
            )
        })?;
        if end_pos > bytes.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("Truncated term {} suffix (expected {} bytes)", i, suffix_len),
            ));
        }

        // Reconstruct term: shared prefix + suffix
        let mut term_bytes = prev_bytes[..shared].to_vec();
        term_bytes.extend_from_slice(&bytes[pos..end_pos]);
        pos = end_pos;

        let term = String::from_utf8(term_bytes.clone()).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid UTF-8 in term {}: {}", i, e),
            )
        })?;
        if terms.last().is_some_and(|prev: &String| prev >= &term) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Vocabulary not strictly sorted at term {}", i),
            ));
        }
        terms.push(term);
        prev_bytes = term_bytes;
    }

    if pos != bytes.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} trailing bytes in vocabulary section", bytes.len() - pos),
        ));
    }

    Ok(terms)
}
