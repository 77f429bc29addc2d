//! Bundle orchestration: validate a snapshot, then write its output bundle.
//!
//! ## Validation gate
//!
//! [`validate`] applies the directory checks in a fixed order and stops at
//! the first that fails:
//!
//! 1. every file must be a decodable image ([`Rejection::UnreadableImages`])
//! 2. at least one image must exist ([`Rejection::NoImages`])
//! 3. no two original names may be equal ignoring case ([`Rejection::DuplicateNames`])
//!
//! A passing directory may still have images without embedded capture time;
//! those come back as [`MissingCaptureTime`] warnings, not failures.
//!
//! ## Output bundle
//!
//! [`build_bundle`] writes, in this order:
//!
//! ```text
//! <output_dir>/
//! ├── Photos.zip      # every file, original names, images stored uncompressed
//! ├── Original/       # byte-identical copies under original names
//! ├── Resized/        # bounded JPEG copies under original names
//! └── Default.htm     # gallery page, capture-time order
//! ```
//!
//! Names come from [`OutputConfig`](crate::config::OutputConfig). The first
//! I/O or codec failure aborts the directory. Artifacts already written stay
//! where they are; there is no rollback across artifacts.
//!
//! Progress is reported as [`ProcessEvent`]s over an optional channel, so the
//! caller decides how (and whether) to display it.

use crate::archive::{self, ArchiveError};
use crate::config::BundleConfig;
use crate::generate::{self, GalleryItem, GenerateError};
use crate::imaging::{BackendError, ImageBackend, ResizeParams};
use crate::scan::{DirectorySnapshot, ScanError};
use chrono::NaiveDateTime;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Why a directory was not processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("not all files are valid images")]
    UnreadableImages(Vec<PathBuf>),
    #[error("no images found")]
    NoImages,
    #[error("duplicate file names")]
    DuplicateNames(Vec<String>),
}

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Archive failed: {0}")]
    Archive(#[from] ArchiveError),
    #[error("Page generation failed: {0}")]
    Generate(#[from] GenerateError),
    #[error("Directory rejected: {0}")]
    Rejected(#[from] Rejection),
}

/// A valid image whose capture time fell back to its file timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCaptureTime {
    pub path: PathBuf,
    pub fallback: NaiveDateTime,
}

/// Progress events emitted while building a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    ArchiveWritten {
        path: PathBuf,
        entries: usize,
    },
    /// One image copied and resized. `index` is 1-based.
    ImageProcessed {
        index: usize,
        total: usize,
        name: String,
        width: u32,
        height: u32,
    },
    PageWritten {
        path: PathBuf,
        images: usize,
    },
}

/// Summary of a finished bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleReport {
    pub output_dir: PathBuf,
    pub images: usize,
    pub missing_capture_time: Vec<MissingCaptureTime>,
}

/// Run the directory checks in order.
///
/// On success, returns the images lacking embedded capture time, ordered by
/// path ignoring case.
pub fn validate<B: ImageBackend>(
    snapshot: &DirectorySnapshot<B>,
) -> Result<Vec<MissingCaptureTime>, Rejection> {
    if !snapshot.all_valid_images() {
        return Err(Rejection::UnreadableImages(
            snapshot
                .invalid_images()
                .iter()
                .map(|e| e.path().to_path_buf())
                .collect(),
        ));
    }
    if !snapshot.has_any_image() {
        return Err(Rejection::NoImages);
    }
    if snapshot.has_duplicate_names() {
        return Err(Rejection::DuplicateNames(snapshot.duplicate_names()));
    }

    Ok(snapshot
        .entries_missing_capture_time()
        .into_iter()
        .filter_map(|entry| {
            Some(MissingCaptureTime {
                path: entry.path().to_path_buf(),
                fallback: snapshot.local_date_taken(entry)?,
            })
        })
        .collect())
}

/// Create a fresh directory for `source`'s bundle under `parent`.
///
/// Tries `<name>`, then `<name>-2`, `<name>-3`, ... and creates the first
/// that does not exist yet. Existing directories are never reused.
pub fn allocate_output_dir(parent: &Path, source: &Path) -> io::Result<PathBuf> {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bundle".to_string());

    for n in 1u32.. {
        let candidate = if n == 1 {
            parent.join(&name)
        } else {
            parent.join(format!("{name}-{n}"))
        };
        match fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::other(format!(
        "no free output directory name for {name}"
    )))
}

/// Validate `snapshot` and write its bundle into `output_dir`.
///
/// `output_dir` must already exist. A rejected snapshot writes nothing.
pub fn build_bundle<B: ImageBackend>(
    snapshot: &DirectorySnapshot<B>,
    output_dir: &Path,
    config: &BundleConfig,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<BundleReport, ProcessError> {
    let missing_capture_time = validate(snapshot)?;
    let names = &config.output;
    let emit = |event: ProcessEvent| {
        if let Some(tx) = &progress {
            // Receiver gone means nobody is listening; keep working
            let _ = tx.send(event);
        }
    };

    let archive_path = output_dir.join(&names.archive_name);
    let entries = archive::write_archive(snapshot, &archive_path)?;
    tracing::info!(path = %archive_path.display(), entries, "archive written");
    emit(ProcessEvent::ArchiveWritten {
        path: archive_path,
        entries,
    });

    let original_dir = output_dir.join(&names.original_dir);
    let resized_dir = output_dir.join(&names.resized_dir);
    fs::create_dir_all(&original_dir)?;
    fs::create_dir_all(&resized_dir)?;

    let total = snapshot.entries().len();
    let mut items = Vec::with_capacity(total);
    for (i, entry) in snapshot.entries().iter().enumerate() {
        let name = entry.original_name();
        fs::copy(entry.path(), original_dir.join(name))?;

        let dims = snapshot.backend().resize(&ResizeParams {
            source: entry.path().to_path_buf(),
            output: resized_dir.join(name),
            max_width: config.resize.max_width,
            max_height: config.resize.max_height,
            quality: config.resize.quality(),
        })?;
        tracing::info!(name, width = dims.width, height = dims.height, "image processed");
        emit(ProcessEvent::ImageProcessed {
            index: i + 1,
            total,
            name: name.to_string(),
            width: dims.width,
            height: dims.height,
        });

        if let Some(taken) = snapshot.local_date_taken(entry) {
            items.push(GalleryItem { name, taken });
        }
    }

    let page_path = output_dir.join(&names.page_name);
    generate::write_page(&page_path, &items, names, &config.page)?;
    emit(ProcessEvent::PageWritten {
        path: page_path,
        images: items.len(),
    });

    Ok(BundleReport {
        output_dir: output_dir.to_path_buf(),
        images: items.len(),
        missing_capture_time,
    })
}
