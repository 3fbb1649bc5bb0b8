// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use serde::Deserialize;

/// Manifest format version this crate understands.
pub const MANIFEST_VERSION: u32 = 1;

/// `manifest.json` at the root of a source directory.
///
/// ```json
/// { "version": 1, "namespaces": { "go": ["goroutines", "maps"] } }
/// ```
#[derive(Deserialize, Clone, Debug)]
pub struct SourceManifest {
    pub version: u32,
    #[serde(default)]
    pub namespaces: BTreeMap<String, Vec<String>>,
}

/// A `documents/<key>.json` file. The file name is the key, so `key` in the
/// body is optional and ignored.
#[derive(Deserialize, Clone, Debug)]
pub struct StoredDocument {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Missing or null content means "no content": the document is skipped.
    #[serde(default)]
    pub content: Option<String>,
}
