// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index construction and storage.
//!
//! - **tokenizer**: text in, normalized terms with positions out
//! - **snapshot**: the immutable committed view readers search
//! - **store**: one namespace on disk, publishing snapshots atomically
//! - **writer**: staged upserts that become visible on commit

pub mod snapshot;
pub mod store;
pub mod tokenizer;
pub mod writer;

pub use snapshot::Snapshot;
pub use store::{
    discover_namespaces, read_last_modified, read_segment_info, segment_path, SegmentInfo, Store,
};
pub use tokenizer::{tokenize, Analyzer, FoldDiacritics, Lowercase, Token, TokenFilter};
pub use writer::{UpsertOutcome, WriteSession};
