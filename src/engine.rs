// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The engine: namespaces, indexing runs and queries behind one handle.
//!
//! ```text
//! ┌─────────────┐  documents  ┌─────────────┐  commit  ┌──────────────┐
//! │ DocumentSrc │────────────▶│ WriteSession│─────────▶│ Store (Arc<  │
//! └─────────────┘             └─────────────┘          │  Snapshot>)  │
//!                                                      └──────┬───────┘
//!  query string ──▶ parse ──▶ search ──▶ (suggest) ──▶ highlight ──▶ QueryReport
//! ```
//!
//! Stores are opened lazily and cached, so every query against a namespace
//! in this process sees the latest commit made through the same engine.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{Result, SearchError};
use crate::fuzzy::suggest;
use crate::highlight::highlight;
use crate::index::snapshot::Snapshot;
use crate::index::store::{
    discover_namespaces, read_last_modified, read_segment_info, SegmentInfo, Store,
};
use crate::index::tokenizer::Analyzer;
use crate::query::{parse, Query};
use crate::search::search_with_limit;
use crate::source::DocumentSource;
use crate::types::{Document, IndexReport, MatchReport, Namespace, QueryReport};

/// Progress callbacks for [`Engine::index_from_source`].
///
/// All methods default to doing nothing.
pub trait IndexObserver {
    /// About to fetch `total` keys for `namespace`.
    fn namespace_started(&self, _namespace: &Namespace, _total: usize) {}

    /// One key was fetched. `found` is false when the source had nothing.
    fn document_fetched(&self, _namespace: &Namespace, _key: &str, _found: bool) {}

    /// The namespace was committed.
    fn namespace_finished(&self, _namespace: &Namespace, _report: &IndexReport) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl IndexObserver for SilentObserver {}

/// Namespaced search engine rooted at `config.index_dir`.
pub struct Engine {
    config: EngineConfig,
    analyzer: Analyzer,
    stores: Mutex<HashMap<Namespace, Arc<Store>>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("analyzer", &self.analyzer)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_analyzer(config, Analyzer::default())
    }

    /// Engine with a custom analysis pipeline. Indexes written with one
    /// analyzer must be queried with the same one.
    pub fn with_analyzer(config: EngineConfig, analyzer: Analyzer) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            analyzer,
            stores: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    pub fn root(&self) -> &Path {
        &self.config.index_dir
    }

    /// Cached store for `namespace`. With `create`, a missing namespace is
    /// initialized; otherwise it is `NotIndexed`.
    fn store(&self, namespace: &Namespace, create: bool) -> Result<Arc<Store>> {
        if let Some(store) = self.stores.lock().get(namespace) {
            return Ok(Arc::clone(store));
        }

        // Opening reads the whole segment; keep the map unlocked meanwhile
        let opened = if create {
            Store::open_or_create_with(self.root(), namespace.clone(), self.analyzer.clone())?
        } else {
            Store::open_existing(self.root(), namespace.clone(), self.analyzer.clone())?
        };

        let mut stores = self.stores.lock();
        let store = stores
            .entry(namespace.clone())
            .or_insert_with(|| Arc::new(opened));
        Ok(Arc::clone(store))
    }

    /// The committed snapshot of a namespace.
    pub fn snapshot(&self, namespace: &Namespace) -> Result<Arc<Snapshot>> {
        Ok(self.store(namespace, false)?.snapshot())
    }

    /// Segment metadata, read straight from disk.
    pub fn segment_info(&self, namespace: &Namespace) -> Result<SegmentInfo> {
        read_segment_info(self.root(), namespace)
    }

    /// Upsert documents into a namespace and commit them as one generation.
    ///
    /// Documents without indexable content are skipped and listed in the
    /// report. Fails with `WriteConflict` if another write session is open.
    pub fn index(&self, namespace: &Namespace, documents: Vec<Document>) -> Result<IndexReport> {
        let store = self.store(namespace, true)?;
        let mut session = store.begin_write()?;
        let outcome = session.upsert_all(documents);
        let snapshot = session.commit()?;

        let report = IndexReport {
            indexed: outcome.indexed.len(),
            skipped: outcome.skipped.len(),
            skipped_keys: outcome.skipped,
        };
        info!(
            namespace = %namespace,
            generation = snapshot.generation(),
            indexed = report.indexed,
            skipped = report.skipped,
            "indexed documents"
        );
        Ok(report)
    }

    /// Pull documents from a source and index every selected namespace.
    ///
    /// An empty selector indexes everything the source knows about. Each
    /// namespace is committed independently; an error aborts the run and
    /// leaves the failing namespace at its previous generation.
    pub fn index_from_source(
        &self,
        source: &dyn DocumentSource,
        namespaces: &[Namespace],
        observer: &dyn IndexObserver,
    ) -> Result<Vec<(Namespace, IndexReport)>> {
        let keys = source.enumerate_keys(namespaces)?;
        if keys.is_empty() {
            warn!("source has no documents for the selected namespaces");
            return Ok(Vec::new());
        }

        let mut reports = Vec::with_capacity(keys.len());
        for (namespace, namespace_keys) in keys {
            observer.namespace_started(&namespace, namespace_keys.len());

            let mut documents = Vec::with_capacity(namespace_keys.len());
            let mut missing = Vec::new();
            for key in namespace_keys {
                match source.fetch_document(&key)? {
                    Some(document) => {
                        observer.document_fetched(&namespace, &key, true);
                        documents.push(document);
                    }
                    None => {
                        observer.document_fetched(&namespace, &key, false);
                        missing.push(key);
                    }
                }
            }

            let mut report = self.index(&namespace, documents)?;
            if !missing.is_empty() {
                debug!(namespace = %namespace, count = missing.len(), "source had no document");
                report.skipped += missing.len();
                report.skipped_keys.extend(missing);
                report.skipped_keys.sort();
            }

            observer.namespace_finished(&namespace, &report);
            reports.push((namespace, report));
        }
        Ok(reports)
    }

    /// Run a query against one namespace.
    ///
    /// If the query matches nothing and a spelling correction exists, the
    /// corrected query is run instead and reported in `used_correction`.
    pub fn query(&self, namespace: &Namespace, query: &str) -> Result<QueryReport> {
        let parsed = parse(query, &self.analyzer)?;
        self.run_query(namespace, query, &parsed)
    }

    /// Run one query against several namespaces; an empty selector means all
    /// indexed namespaces.
    ///
    /// A syntax error fails the whole call. Anything else is reported per
    /// namespace, in selector order (or name order for "all").
    pub fn query_many(
        &self,
        namespaces: &[Namespace],
        query: &str,
    ) -> Result<Vec<(Namespace, Result<QueryReport>)>> {
        let parsed = parse(query, &self.analyzer)?;
        let targets: Vec<Namespace> = if namespaces.is_empty() {
            self.list_namespaces()?.into_keys().collect()
        } else {
            namespaces.to_vec()
        };

        Ok(targets
            .into_iter()
            .map(|ns| {
                let result = self.run_query(&ns, query, &parsed);
                (ns, result)
            })
            .collect())
    }

    fn run_query(&self, namespace: &Namespace, raw: &str, parsed: &Query) -> Result<QueryReport> {
        let snapshot = self.store(namespace, false)?.snapshot();
        let limit = self.config.result_limit;

        let mut effective = parsed;
        let mut results = search_with_limit(&snapshot, parsed, limit);
        let mut used_correction = None;

        let corrected;
        if results.is_empty() {
            if let Some(suggestion) = suggest(&snapshot, parsed, self.config.max_edit_distance) {
                debug!(
                    namespace = %namespace,
                    original = %raw,
                    corrected = %suggestion.string,
                    "retrying with corrected query"
                );
                corrected = suggestion;
                results = search_with_limit(&snapshot, &corrected.query, limit);
                effective = &corrected.query;
                used_correction = Some(corrected.string.clone());
            }
        }

        let terms = effective.positive_terms();
        let matches = results
            .into_iter()
            .filter_map(|hit| {
                let document = snapshot.document(hit.doc_id)?;
                Some(MatchReport {
                    key: hit.key,
                    url: document.url.clone(),
                    title: document.title.clone(),
                    score: hit.score,
                    fragments: highlight(
                        &document.content,
                        &terms,
                        &self.analyzer,
                        self.config.max_fragments,
                    ),
                })
            })
            .collect();

        Ok(QueryReport {
            namespace: namespace.clone(),
            query: raw.to_string(),
            matches,
            used_correction,
        })
    }

    /// Every namespace with a committed segment, with its last commit time.
    pub fn list_namespaces(&self) -> Result<BTreeMap<Namespace, SystemTime>> {
        discover_namespaces(self.root())
    }

    /// Last commit time of one namespace, if it has been indexed.
    pub fn last_modified(&self, namespace: &Namespace) -> Result<Option<SystemTime>> {
        if let Some(store) = self.stores.lock().get(namespace) {
            return Ok(Some(store.last_modified_time()));
        }
        read_last_modified(self.root(), namespace)
    }
}
