// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Namespaced full-text search with incremental indexing.
//!
//! Each namespace is an isolated inverted index persisted as a single
//! checksummed segment file. Documents are upserted by key inside a write
//! session and become visible atomically on commit. Queries support boolean
//! operators, phrases and field scoping, are ranked by TF-IDF, fall back to
//! a spelling-corrected query when nothing matches, and come back with
//! highlighted excerpts.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  tokenizer  │────▶│   snapshot   │────▶│   binary    │
//! │ (Analyzer)  │     │ (postings)   │     │  (segment)  │
//! └─────────────┘     └──────────────┘     └─────────────┘
//!        │                   │                    │
//!        ▼                   ▼                    ▼
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │    query    │────▶│    search    │────▶│  highlight  │
//! │  (parser)   │     │  (scoring)   │     │ (fragments) │
//! └─────────────┘     └──────────────┘     └─────────────┘
//!                            │
//!                            ▼
//!                     ┌──────────────┐
//!                     │    fuzzy     │
//!                     │ (correction) │
//!                     └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use scour::{Document, Engine, EngineConfig, Namespace};
//!
//! let engine = Engine::new(EngineConfig::default().with_index_dir("/tmp/scour"))?;
//! let go = Namespace::new("go")?;
//! engine.index(&go, vec![Document::new("maps", "https://go.dev/maps", "Maps are hash tables.")])?;
//!
//! let report = engine.query(&go, "hash AND tables")?;
//! for hit in &report.matches {
//!     println!("{} {:.3}", hit.key, hit.score);
//! }
//! # Ok::<(), scour::SearchError>(())
//! ```

pub mod binary;
pub mod config;
pub mod engine;
pub mod error;
pub mod fuzzy;
pub mod highlight;
pub mod index;
pub mod query;
pub mod scoring;
pub mod search;
pub mod source;
pub mod testing;
pub mod types;
pub mod util;

pub use config::EngineConfig;
pub use engine::{Engine, IndexObserver, SilentObserver};
pub use error::{Result, SearchError};
pub use fuzzy::{suggest, CorrectedQuery};
pub use highlight::{highlight, BracketEmphasis, EmphasisFormatter, Fragment};
pub use index::{Analyzer, Snapshot, Store, Token, TokenFilter, UpsertOutcome, WriteSession};
pub use query::{parse, Field, Query};
pub use search::{search, search_with_limit};
pub use source::{DocumentSource, JsonDirSource, MemorySource};
pub use types::{
    Document, IndexReport, MatchReport, Namespace, Posting, PostingList, QueryReport, ScoredMatch,
};
