// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the scour command-line interface.
//!
//! Four subcommands: `index` pulls documents from a source directory into
//! namespaces, `namespaces` lists what has been indexed, `search` queries one
//! or more namespaces, and `inspect` shows the layout of a namespace's
//! segment file.
//!
//! Settings layer in order: built-in defaults, then `--config <file>`, then
//! `--index-dir` / `SCOUR_INDEX_DIR` and `--limit`.

pub mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "scour",
    about = "Namespaced full-text search with spelling correction",
    version
)]
pub struct Cli {
    /// JSON config file (index_dir, max_edit_distance, result_limit, max_fragments)
    #[arg(short, long, global = true, env = "SCOUR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding one subdirectory per namespace
    #[arg(long, global = true, env = "SCOUR_INDEX_DIR")]
    pub index_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Index documents from a source directory
    Index {
        /// Directory containing manifest.json and documents/<key>.json
        #[arg(short, long)]
        source: PathBuf,

        /// Namespaces to index (default: every namespace in the manifest)
        #[arg(short = 'l', long = "namespace")]
        namespaces: Vec<String>,
    },

    /// List indexed namespaces, ordered by last index time
    Namespaces,

    /// Search one or more namespaces
    Search {
        /// Query, e.g. `goroutine AND "wait group" NOT mutex`
        query: String,

        /// Namespaces to search (default: all indexed namespaces)
        #[arg(short = 'l', long = "namespace")]
        namespaces: Vec<String>,

        /// Maximum number of results per namespace
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Print reports as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Inspect a namespace's segment file
    Inspect {
        /// Namespace to inspect
        namespace: String,
    },
}
