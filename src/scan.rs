//! Directory snapshot: enumeration, per-file probing, and validation queries.
//!
//! A [`DirectorySnapshot`] is taken once per source directory. It walks the
//! tree recursively at construction time and never looks at the file system
//! listing again; files added or removed afterwards are not seen.
//!
//! ## Entries
//!
//! Each [`FileEntry`] is one regular file, kept in enumeration order. Two
//! things are derived from it lazily and memoized for the life of the
//! snapshot:
//!
//! - its **original name** ([`naming::resolve_original_name`] on the file name)
//! - its **probe** ([`Probe`]): whether it is an image, and if so its capture
//!   time (embedded metadata first, file timestamp as fallback)
//!
//! A file is probed at most once. Later queries read the cached result, so
//! validation, archiving, and page generation all agree even if the file
//! changes on disk mid-run.
//!
//! ## Validation queries
//!
//! | Query | True when |
//! |---|---|
//! | [`DirectorySnapshot::all_valid_images`] | every entry is an image |
//! | [`DirectorySnapshot::has_any_image`] | at least one entry is an image |
//! | [`DirectorySnapshot::has_duplicate_names`] | two original names are equal ignoring case |
//! | [`DirectorySnapshot::missing_capture_time`] | an image had no usable embedded capture time |
//!
//! The order in which these gate the pipeline lives in
//! [`process::validate`](crate::process::validate).

use crate::imaging::{ImageBackend, RustBackend};
use crate::metadata::{self, Probe};
use crate::naming;
use chrono::NaiveDateTime;
use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// One regular file under the snapshot root.
#[derive(Debug)]
pub struct FileEntry {
    path: PathBuf,
    original_name: OnceCell<String>,
    probe: OnceCell<Probe>,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            original_name: OnceCell::new(),
            probe: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Export name, computed on first use.
    pub fn original_name(&self) -> &str {
        self.original_name.get_or_init(|| {
            let file_name = self
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            naming::resolve_original_name(&file_name)
        })
    }

    /// Probe result, computed on first use with `backend`.
    ///
    /// Backend failures of any kind classify the file as not an image.
    pub fn probe(&self, backend: &impl ImageBackend) -> &Probe {
        self.probe.get_or_init(|| match backend.probe(&self.path) {
            Ok(probed) => Probe::Image(metadata::resolve_capture_time(
                probed.date_taken.as_deref(),
                metadata::local_from_system_time(probed.modified),
            )),
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "not an image");
                Probe::NotAnImage
            }
        })
    }
}

/// A source directory and the files found under it at construction time.
pub struct DirectorySnapshot<B = RustBackend> {
    root: PathBuf,
    entries: Vec<FileEntry>,
    backend: B,
}

impl DirectorySnapshot<RustBackend> {
    /// Snapshot `root` using the production image backend.
    pub fn scan(root: &Path) -> Result<Self, ScanError> {
        Self::scan_with_backend(root, RustBackend::new())
    }
}

impl<B: ImageBackend> DirectorySnapshot<B> {
    /// Snapshot `root` with a specific backend (allows testing with mock).
    pub fn scan_with_backend(root: &Path, backend: B) -> Result<Self, ScanError> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry?;
            if entry.file_type().is_file() {
                paths.push(entry.into_path());
            }
        }
        tracing::debug!(root = %root.display(), files = paths.len(), "directory enumerated");
        Ok(Self::from_paths(root, paths, backend))
    }

    /// Build a snapshot from an already-enumerated file list, in that order.
    pub fn from_paths(root: &Path, paths: Vec<PathBuf>, backend: B) -> Self {
        Self {
            root: root.to_path_buf(),
            entries: paths.into_iter().map(FileEntry::new).collect(),
            backend,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Entries in enumeration order.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Probe `entry` with this snapshot's backend. The result lives in the entry.
    pub fn probe<'a>(&self, entry: &'a FileEntry) -> &'a Probe {
        entry.probe(&self.backend)
    }

    pub fn is_valid_image(&self, entry: &FileEntry) -> bool {
        self.probe(entry).is_valid_image()
    }

    /// Capture time of a valid image; `None` for anything else.
    pub fn local_date_taken(&self, entry: &FileEntry) -> Option<NaiveDateTime> {
        self.probe(entry).capture_time().map(|t| t.local)
    }

    pub fn all_valid_images(&self) -> bool {
        self.entries.iter().all(|e| self.is_valid_image(e))
    }

    pub fn has_any_image(&self) -> bool {
        self.entries.iter().any(|e| self.is_valid_image(e))
    }

    /// Entries that are not decodable images, in enumeration order.
    pub fn invalid_images(&self) -> Vec<&FileEntry> {
        self.entries
            .iter()
            .filter(|e| !self.is_valid_image(e))
            .collect()
    }

    pub fn has_duplicate_names(&self) -> bool {
        !self.duplicate_names().is_empty()
    }

    /// Original names shared by two or more entries, compared ignoring case.
    ///
    /// Each group is reported once, under the spelling of its first entry,
    /// sorted by the case-folded name.
    pub fn duplicate_names(&self) -> Vec<String> {
        let mut groups: BTreeMap<String, (&str, usize)> = BTreeMap::new();
        for entry in &self.entries {
            let name = entry.original_name();
            groups
                .entry(name.to_uppercase())
                .or_insert((name, 0))
                .1 += 1;
        }
        groups
            .into_values()
            .filter(|&(_, count)| count > 1)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    pub fn missing_capture_time(&self, entry: &FileEntry) -> bool {
        self.probe(entry).lacks_embedded_capture_time()
    }

    /// Images without a usable embedded capture time, ordered by full path
    /// ignoring case.
    pub fn entries_missing_capture_time(&self) -> Vec<&FileEntry> {
        let mut missing: Vec<&FileEntry> = self
            .entries
            .iter()
            .filter(|e| self.missing_capture_time(e))
            .collect();
        missing.sort_by_cached_key(|e| e.path().to_string_lossy().to_uppercase());
        missing
    }
}
