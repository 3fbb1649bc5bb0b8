// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Per-namespace store: the committed snapshot plus its segment on disk.
//!
//! Readers call [`Store::snapshot`] and get an `Arc` they can keep for as long
//! as they like. A commit builds the next snapshot off to the side, writes it
//! to disk, and only then swaps the pointer. The lock is held for the swap
//! and nothing else.
//!
//! Directory layout:
//!
//! ```text
//! <root>/
//!   <namespace>/
//!     segment.scour      committed generation
//!     segment.scour.tmp  only while a commit is being written
//! ```

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::binary::{
    decode_segment, encode_segment, millis_to_system_time, read_header, system_time_to_millis,
    SegmentFooter, SegmentHeader, SEGMENT_FILE,
};
use crate::error::{Result, SearchError};
use crate::index::snapshot::Snapshot;
use crate::index::tokenizer::Analyzer;
use crate::index::writer::WriteSession;
use crate::types::Namespace;

/// Path of a namespace's segment under `root`.
pub fn segment_path(root: &Path, namespace: &Namespace) -> PathBuf {
    root.join(namespace.as_str()).join(SEGMENT_FILE)
}

/// Current time, truncated to what the segment header can represent.
pub(crate) fn commit_timestamp() -> SystemTime {
    millis_to_system_time(system_time_to_millis(SystemTime::now()))
}

fn storage_err(namespace: &Namespace, action: &str, err: io::Error) -> SearchError {
    SearchError::storage(format!("{} namespace '{}'", action, namespace), err)
}

/// Committed state of one namespace.
pub struct Store {
    namespace: Namespace,
    dir: PathBuf,
    analyzer: Analyzer,
    current: RwLock<Arc<Snapshot>>,
    writer_active: AtomicBool,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("namespace", &self.namespace)
            .field("dir", &self.dir)
            .field("generation", &self.current.read().generation())
            .finish()
    }
}

impl Store {
    /// Open a namespace, creating an empty one if it does not exist yet.
    pub fn open_or_create(root: impl AsRef<Path>, namespace: Namespace) -> Result<Self> {
        Self::open_or_create_with(root, namespace, Analyzer::default())
    }

    pub fn open_or_create_with(
        root: impl AsRef<Path>,
        namespace: Namespace,
        analyzer: Analyzer,
    ) -> Result<Self> {
        let dir = root.as_ref().join(namespace.as_str());
        fs::create_dir_all(&dir).map_err(|e| storage_err(&namespace, "creating", e))?;

        let path = dir.join(SEGMENT_FILE);
        let snapshot = if path.exists() {
            load_segment(&path, &namespace)?
        } else {
            let empty = Snapshot::empty(namespace.clone(), commit_timestamp());
            write_segment(&dir, &empty)?;
            debug!(namespace = %namespace, "created empty namespace");
            empty
        };

        Ok(Self::from_snapshot(namespace, dir, analyzer, snapshot))
    }

    /// Open a namespace that must already have a segment.
    pub fn open_existing(
        root: impl AsRef<Path>,
        namespace: Namespace,
        analyzer: Analyzer,
    ) -> Result<Self> {
        let dir = root.as_ref().join(namespace.as_str());
        let path = dir.join(SEGMENT_FILE);
        if !path.is_file() {
            return Err(SearchError::NotIndexed(namespace));
        }
        let snapshot = load_segment(&path, &namespace)?;
        Ok(Self::from_snapshot(namespace, dir, analyzer, snapshot))
    }

    fn from_snapshot(
        namespace: Namespace,
        dir: PathBuf,
        analyzer: Analyzer,
        snapshot: Snapshot,
    ) -> Self {
        Self {
            namespace,
            dir,
            analyzer,
            current: RwLock::new(Arc::new(snapshot)),
            writer_active: AtomicBool::new(false),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    pub fn segment_path(&self) -> PathBuf {
        self.dir.join(SEGMENT_FILE)
    }

    /// The latest committed snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read())
    }

    /// Time of the last successful commit.
    pub fn last_modified_time(&self) -> SystemTime {
        self.current.read().committed_at()
    }

    /// Start a write session. Fails fast if one is already open.
    pub fn begin_write(&self) -> Result<WriteSession<'_>> {
        if self
            .writer_active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SearchError::WriteConflict(self.namespace.clone()));
        }
        Ok(WriteSession::new(self))
    }

    pub(crate) fn release_writer(&self) {
        self.writer_active.store(false, Ordering::Release);
    }

    /// Write `snapshot` durably, then make it visible.
    pub(crate) fn persist_and_publish(&self, snapshot: Snapshot) -> Result<Arc<Snapshot>> {
        write_segment(&self.dir, &snapshot)?;

        let snapshot = Arc::new(snapshot);
        *self.current.write() = Arc::clone(&snapshot);
        debug!(
            namespace = %self.namespace,
            generation = snapshot.generation(),
            "published snapshot"
        );
        Ok(snapshot)
    }
}

fn load_segment(path: &Path, namespace: &Namespace) -> Result<Snapshot> {
    let bytes = fs::read(path).map_err(|e| storage_err(namespace, "reading", e))?;
    let snapshot = decode_segment(namespace.clone(), &bytes)
        .map_err(|e| storage_err(namespace, "decoding", e))?;
    debug!(
        namespace = %namespace,
        generation = snapshot.generation(),
        docs = snapshot.doc_count(),
        terms = snapshot.term_count(),
        "loaded segment"
    );
    Ok(snapshot)
}

/// Temp file, fsync, rename. The old segment stays intact until the rename.
fn write_segment(dir: &Path, snapshot: &Snapshot) -> Result<()> {
    let namespace = snapshot.namespace();
    let bytes = encode_segment(snapshot).map_err(|e| storage_err(namespace, "encoding", e))?;

    let final_path = dir.join(SEGMENT_FILE);
    let tmp_path = dir.join(format!("{}.tmp", SEGMENT_FILE));

    let result = (|| -> io::Result<()> {
        let mut file = File::create(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp_path, &final_path)
    })();

    if let Err(e) = result {
        // Best effort: a stale temp file is harmless but untidy
        let _ = fs::remove_file(&tmp_path);
        return Err(storage_err(namespace, "writing", e));
    }

    if let Err(e) = sync_dir(dir) {
        warn!(namespace = %namespace, error = %e, "could not sync namespace directory");
    }

    Ok(())
}

/// Make a rename durable. Directories cannot be opened for sync on Windows.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

/// Read a namespace's last commit time from the segment header alone.
///
/// Returns `Ok(None)` when the namespace has never been indexed.
pub fn read_last_modified(root: impl AsRef<Path>, namespace: &Namespace) -> Result<Option<SystemTime>> {
    let path = segment_path(root.as_ref(), namespace);
    let mut file = match File::open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(storage_err(namespace, "opening", e)),
    };

    let mut buf = [0u8; SegmentHeader::SIZE];
    file.read_exact(&mut buf)
        .map_err(|e| storage_err(namespace, "reading header of", e))?;
    let header = read_header(&buf).map_err(|e| storage_err(namespace, "reading header of", e))?;
    Ok(Some(header.committed_at()))
}

/// Every namespace under `root` with a readable segment header.
///
/// Directories that are not valid namespace names, have no segment, or whose
/// header cannot be read are skipped (the latter with a warning).
pub fn discover_namespaces(root: impl AsRef<Path>) -> Result<BTreeMap<Namespace, SystemTime>> {
    let root = root.as_ref();
    let mut found = BTreeMap::new();

    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(found),
        Err(e) => {
            return Err(SearchError::storage(
                format!("listing index directory {}", root.display()),
                e,
            ))
        }
    };

    for entry in entries {
        let entry = entry.map_err(|e| {
            SearchError::storage(format!("listing index directory {}", root.display()), e)
        })?;
        if !entry.path().is_dir() {
            continue;
        }
        let Some(namespace) = entry
            .file_name()
            .to_str()
            .and_then(|name| Namespace::new(name).ok())
        else {
            continue;
        };

        match read_last_modified(root, &namespace) {
            Ok(Some(time)) => {
                found.insert(namespace, time);
            }
            Ok(None) => {}
            Err(e) => warn!(namespace = %namespace, error = %e, "skipping unreadable namespace"),
        }
    }

    Ok(found)
}

/// Header, checksum and size of a namespace's segment file.
#[derive(Debug, Clone)]
pub struct SegmentInfo {
    pub header: SegmentHeader,
    pub crc32: u32,
    pub file_size: u64,
}

/// Read segment metadata without decoding documents or postings.
pub fn read_segment_info(root: impl AsRef<Path>, namespace: &Namespace) -> Result<SegmentInfo> {
    let path = segment_path(root.as_ref(), namespace);
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(SearchError::NotIndexed(namespace.clone()))
        }
        Err(e) => return Err(storage_err(namespace, "reading", e)),
    };

    let header = read_header(&bytes).map_err(|e| storage_err(namespace, "inspecting", e))?;
    let footer = SegmentFooter::read(&bytes).map_err(|e| storage_err(namespace, "inspecting", e))?;
    Ok(SegmentInfo {
        header,
        crc32: footer.crc32,
        file_size: bytes.len() as u64,
    })
}
