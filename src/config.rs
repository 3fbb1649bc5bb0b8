// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Engine configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "index_dir": "/var/lib/scour", "result_limit": 20 }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::fuzzy::DEFAULT_MAX_DISTANCE;
use crate::highlight::DEFAULT_MAX_FRAGMENTS;

/// Default directory holding one subdirectory per namespace.
pub const DEFAULT_INDEX_DIR: &str = "indexdir";

/// Default number of matches returned per namespace.
pub const DEFAULT_RESULT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Root directory of all namespaces.
    pub index_dir: PathBuf,
    /// Maximum edit distance for spelling suggestions.
    pub max_edit_distance: usize,
    /// Matches returned per namespace.
    pub result_limit: usize,
    /// Highlighted fragments per match.
    pub max_fragments: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            index_dir: PathBuf::from(DEFAULT_INDEX_DIR),
            max_edit_distance: DEFAULT_MAX_DISTANCE,
            result_limit: DEFAULT_RESULT_LIMIT,
            max_fragments: DEFAULT_MAX_FRAGMENTS,
        }
    }
}

impl EngineConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| SearchError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: EngineConfig = serde_json::from_str(&content)
            .map_err(|e| SearchError::Config(format!("Invalid config {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_index_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.index_dir = dir.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_fragments == 0 {
            return Err(SearchError::Config("max_fragments must be at least 1".into()));
        }
        if self.result_limit == 0 {
            return Err(SearchError::Config("result_limit must be at least 1".into()));
        }
        if self.index_dir.as_os_str().is_empty() {
            return Err(SearchError::Config("index_dir must not be empty".into()));
        }
        Ok(())
    }
}
