// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Where documents come from.
//!
//! The engine never fetches content itself. A [`DocumentSource`] says which
//! keys belong to which namespace and hands over one document per key. A
//! source that has nothing for a key returns `Ok(None)`; that key is counted
//! as skipped, not as a failure.
//!
//! Keys are global to a source. A key listed under two namespaces names one
//! document, which is indexed into both.
//!
//! [`JsonDirSource`] reads a directory laid out as:
//!
//! ```text
//! <dir>/
//!   manifest.json          { "version": 1, "namespaces": { "<ns>": ["<key>", ...] } }
//!   documents/<key>.json   { "url": ..., "title": ..., "content": ... }
//! ```

pub mod manifest;

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, SearchError};
use crate::types::{Document, Namespace};

pub use manifest::{SourceManifest, StoredDocument, MANIFEST_VERSION};

/// Keys per namespace, as reported by a source.
pub type KeyMap = BTreeMap<Namespace, BTreeSet<String>>;

/// Supplies documents to index.
pub trait DocumentSource {
    /// Keys to (re-)index for the selected namespaces. An empty selector
    /// means every namespace the source knows about.
    fn enumerate_keys(&self, namespaces: &[Namespace]) -> Result<KeyMap>;

    /// The document for `key`, or `None` to skip it. Keys are unique
    /// across all namespaces of the source.
    fn fetch_document(&self, key: &str) -> Result<Option<Document>>;
}

/// Documents stored as JSON files next to a manifest.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
    manifest: SourceManifest,
}

impl JsonDirSource {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let manifest_path = dir.join("manifest.json");
        let content = fs::read_to_string(&manifest_path).map_err(|e| {
            SearchError::Source(format!("Failed to read {}: {}", manifest_path.display(), e))
        })?;
        let manifest: SourceManifest = serde_json::from_str(&content)
            .map_err(|e| SearchError::Source(format!("Invalid manifest JSON: {}", e)))?;

        if manifest.version != MANIFEST_VERSION {
            return Err(SearchError::Source(format!(
                "Unsupported manifest version {} (expected {})",
                manifest.version, MANIFEST_VERSION
            )));
        }

        Ok(Self { dir, manifest })
    }

    pub fn manifest(&self) -> &SourceManifest {
        &self.manifest
    }

    fn document_path(&self, key: &str) -> Option<PathBuf> {
        // Keys become file names; anything that could escape the directory is rejected
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            return None;
        }
        Some(self.dir.join("documents").join(format!("{}.json", key)))
    }
}

impl DocumentSource for JsonDirSource {
    fn enumerate_keys(&self, namespaces: &[Namespace]) -> Result<KeyMap> {
        let mut out = KeyMap::new();
        for (name, keys) in &self.manifest.namespaces {
            let namespace = match Namespace::new(name.as_str()) {
                Ok(ns) => ns,
                Err(e) => {
                    warn!(error = %e, "ignoring manifest entry");
                    continue;
                }
            };
            if !namespaces.is_empty() && !namespaces.contains(&namespace) {
                continue;
            }
            out.entry(namespace)
                .or_default()
                .extend(keys.iter().cloned());
        }
        Ok(out)
    }

    fn fetch_document(&self, key: &str) -> Result<Option<Document>> {
        let Some(path) = self.document_path(key) else {
            warn!(key = %key, "key is not a valid file name, skipping");
            return Ok(None);
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(key = %key, "no document file");
                return Ok(None);
            }
            Err(e) => {
                return Err(SearchError::Source(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let stored: StoredDocument = serde_json::from_str(&content).map_err(|e| {
            SearchError::Source(format!("Invalid JSON in {}: {}", path.display(), e))
        })?;

        Ok(Some(Document {
            key: key.to_string(),
            url: stored.url,
            title: stored.title,
            content: stored.content.unwrap_or_default(),
        }))
    }
}

/// In-memory source, handy for tests and embedding.
///
/// Like a source directory, it holds one document per key. Registering a key
/// again (in any namespace) replaces the document everywhere it is listed.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    keys: KeyMap,
    documents: BTreeMap<String, Document>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(mut self, namespace: Namespace, documents: Vec<Document>) -> Self {
        let listed = self.keys.entry(namespace.clone()).or_default();
        for document in documents {
            listed.insert(document.key.clone());
            if let Some(previous) = self.documents.get(&document.key) {
                if *previous != document {
                    warn!(
                        namespace = %namespace,
                        key = %document.key,
                        "key registered twice, keeping the later document"
                    );
                }
            }
            self.documents.insert(document.key.clone(), document);
        }
        self
    }
}

impl DocumentSource for MemorySource {
    fn enumerate_keys(&self, namespaces: &[Namespace]) -> Result<KeyMap> {
        Ok(self
            .keys
            .iter()
            .filter(|(ns, _)| namespaces.is_empty() || namespaces.contains(ns))
            .map(|(ns, keys)| (ns.clone(), keys.clone()))
            .collect())
    }

    fn fetch_document(&self, key: &str) -> Result<Option<Document>> {
        Ok(self.documents.get(key).cloned())
    }
}
