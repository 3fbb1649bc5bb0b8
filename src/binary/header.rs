// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Segment header and footer structures.
//!
//! The header is 48 bytes of fixed-size fields, designed to be parsed in one
//! read before anything else. It tells you exactly where every section lives
//! and carries the commit metadata (generation, timestamp), so listing
//! namespaces never has to decode postings.
//!
//! The footer is 8 bytes: a CRC32 checksum over everything before it, plus a
//! magic number ("RUCS", the header magic reversed). If the footer is wrong,
//! something got corrupted or truncated. Don't trust the data.
//!
//! `SectionOffsets` is the single source of truth for the file layout. Every
//! piece of code that reads or writes sections MUST use it.

use std::io::{self, Read, Write};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crc32fast::Hasher as Crc32Hasher;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Magic bytes: "SCUR" in ASCII (header)
pub const MAGIC: [u8; 4] = [0x53, 0x43, 0x55, 0x52];

/// Footer magic: "RUCS" (reversed, marks valid file end)
pub const FOOTER_MAGIC: [u8; 4] = [0x52, 0x55, 0x43, 0x53];

/// Current format version
pub const VERSION: u8 = 1;

// ============================================================================
// SECURITY LIMITS (prevent resource exhaustion from malicious input)
// ============================================================================

/// Maximum segment size: 1 GiB
pub const MAX_FILE_SIZE: usize = 1024 * 1024 * 1024;

/// Maximum number of documents
pub const MAX_DOC_COUNT: u32 = 10_000_000;

/// Maximum number of terms
pub const MAX_TERM_COUNT: u32 = 10_000_000;

/// Maximum posting list size per term
pub const MAX_POSTING_SIZE: usize = 10_000_000;

/// Maximum varint bytes (u64 needs at most 10 bytes)
pub const MAX_VARINT_BYTES: usize = 10;

// ============================================================================
// FLAGS
// ============================================================================

/// Format flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags(pub(crate) u8);

impl FormatFlags {
    pub const HAS_POSITIONS: u8 = 0b0000_0001;

    pub fn new() -> Self {
        Self(0)
    }

    pub fn with_positions(mut self) -> Self {
        self.0 |= Self::HAS_POSITIONS;
        self
    }

    pub fn has_positions(self) -> bool {
        self.0 & Self::HAS_POSITIONS != 0
    }
}

// ============================================================================
// HEADER
// ============================================================================

/// Segment header (48 bytes fixed size)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentHeader {
    pub version: u8,
    pub flags: FormatFlags,
    pub doc_count: u32,
    pub term_count: u32,
    /// Commit counter, 0 for a freshly created namespace
    pub generation: u64,
    /// Commit time in milliseconds since the Unix epoch
    pub committed_at_ms: u64,
    pub docs_len: u32,
    pub vocab_len: u32,
    pub postings_len: u32,
}

impl SegmentHeader {
    // 4 (magic) + 1 (version) + 1 (flags) + 2 (reserved) + 2*4 (counts)
    // + 2*8 (generation, timestamp) + 3*4 (section lengths) + 4 (reserved) = 48
    pub const SIZE: usize = 48;

    /// Compute section byte offsets for this header.
    pub fn section_offsets(&self) -> SectionOffsets {
        SectionOffsets::from_header(self)
    }

    pub fn committed_at(&self) -> SystemTime {
        millis_to_system_time(self.committed_at_ms)
    }

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&MAGIC)?;
        w.write_all(&[self.version])?;
        w.write_all(&[self.flags.0])?;
        w.write_all(&[0u8; 2])?; // reserved
        w.write_all(&self.doc_count.to_le_bytes())?;
        w.write_all(&self.term_count.to_le_bytes())?;
        w.write_all(&self.generation.to_le_bytes())?;
        w.write_all(&self.committed_at_ms.to_le_bytes())?;
        w.write_all(&self.docs_len.to_le_bytes())?;
        w.write_all(&self.vocab_len.to_le_bytes())?;
        w.write_all(&self.postings_len.to_le_bytes())?;
        w.write_all(&[0u8; 4])?; // reserved
        Ok(())
    }

    pub fn read<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid magic: expected SCUR, got {:?}", magic),
            ));
        }

        let mut buf = [0u8; 44]; // 48 - 4 (magic) = 44
        r.read_exact(&mut buf)?;

        let u32_at = |i: usize| u32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]);
        let u64_at = |i: usize| {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&buf[i..i + 8]);
            u64::from_le_bytes(bytes)
        };

        Ok(Self {
            version: buf[0],
            flags: FormatFlags(buf[1]),
            // buf[2..4] is reserved
            doc_count: u32_at(4),
            term_count: u32_at(8),
            generation: u64_at(12),
            committed_at_ms: u64_at(20),
            docs_len: u32_at(28),
            vocab_len: u32_at(32),
            postings_len: u32_at(36),
            // buf[40..44] is reserved
        })
    }
}

// ============================================================================
// FOOTER (8 bytes)
// ============================================================================

/// Footer with CRC32 checksum and magic number
#[derive(Debug, Clone)]
pub struct SegmentFooter {
    /// CRC32 checksum of header + all sections (everything before footer)
    pub crc32: u32,
}

impl SegmentFooter {
    pub const SIZE: usize = 8; // 4 bytes CRC32 + 4 bytes magic

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.crc32.to_le_bytes())?;
        w.write_all(&FOOTER_MAGIC)?;
        Ok(())
    }

    pub fn read(bytes: &[u8]) -> io::Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "File too short for footer",
            ));
        }

        let footer_start = bytes.len() - Self::SIZE;

        let magic = &bytes[footer_start + 4..];
        if magic != FOOTER_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid footer magic: expected RUCS, got {:?}", magic),
            ));
        }

        let crc32 = u32::from_le_bytes([
            bytes[footer_start],
            bytes[footer_start + 1],
            bytes[footer_start + 2],
            bytes[footer_start + 3],
        ]);

        Ok(Self { crc32 })
    }

    /// Compute CRC32 over the given bytes
    pub fn compute_crc32(data: &[u8]) -> u32 {
        let mut hasher = Crc32Hasher::new();
        hasher.update(data);
        hasher.finalize()
    }
}

// ============================================================================
// SECTION OFFSETS (SINGLE SOURCE OF TRUTH for the layout)
// ============================================================================

/// Section byte offsets.
///
/// Layout order:
/// 1. HEADER      [48B]
/// 2. DOCS        [docs_len]     - stored fields, sorted by key
/// 3. VOCABULARY  [vocab_len]    - front-compressed sorted terms
/// 4. POSTINGS    [postings_len] - one list per vocabulary term, same order
/// 5. FOOTER      [8B]           - CRC32 validation
#[derive(Debug, Clone, Copy)]
pub struct SectionOffsets {
    pub docs: (usize, usize),
    pub vocabulary: (usize, usize),
    pub postings: (usize, usize),
    pub footer: (usize, usize),
}

impl SectionOffsets {
    pub fn from_header(h: &SegmentHeader) -> Self {
        let mut pos = SegmentHeader::SIZE;

        let docs_start = pos;
        pos += h.docs_len as usize;
        let docs_end = pos;

        let vocab_start = pos;
        pos += h.vocab_len as usize;
        let vocab_end = pos;

        let postings_start = pos;
        pos += h.postings_len as usize;
        let postings_end = pos;

        Self {
            docs: (docs_start, docs_end),
            vocabulary: (vocab_start, vocab_end),
            postings: (postings_start, postings_end),
            footer: (pos, pos + SegmentFooter::SIZE),
        }
    }

    /// Expected content size (everything before footer)
    pub fn content_size(&self) -> usize {
        self.footer.0
    }

    /// Total file size including footer
    pub fn total_size(&self) -> usize {
        self.footer.1
    }

    /// Get a slice for a section from the bytes
    #[inline]
    pub fn slice<'a>(&self, bytes: &'a [u8], section: (usize, usize)) -> Option<&'a [u8]> {
        bytes.get(section.0..section.1)
    }
}

// ============================================================================
// TIMESTAMPS
// ============================================================================

/// Milliseconds since the Unix epoch, saturating at 0 for pre-epoch clocks.
pub fn system_time_to_millis(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub fn millis_to_system_time(ms: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_millis(ms)
}
