//! Zip archive of every file in a snapshot.
//!
//! Each entry is stored at the archive root under its original name. Images
//! are stored uncompressed since JPEG/PNG/WebP data does not deflate
//! meaningfully; anything else is deflated.
//!
//! The archive is written next to its final path as `<name>.partial` and
//! renamed into place only after the central directory is flushed. On any
//! failure the partial file is removed and the error is returned, so a
//! half-written archive never appears under the final name.

use crate::imaging::ImageBackend;
use crate::scan::DirectorySnapshot;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Compression method for an entry.
pub fn compression_for(is_image: bool) -> CompressionMethod {
    if is_image {
        CompressionMethod::Stored
    } else {
        CompressionMethod::Deflated
    }
}

/// Write every entry of `snapshot` into a zip archive at `path`.
///
/// Returns the number of entries written.
pub fn write_archive<B: ImageBackend>(
    snapshot: &DirectorySnapshot<B>,
    path: &Path,
) -> Result<usize, ArchiveError> {
    let partial = partial_path(path);

    let result = write_entries(snapshot, &partial).and_then(|count| {
        fs::rename(&partial, path).map_err(|e| io_error(path, e))?;
        Ok(count)
    });

    if result.is_err() {
        let _ = fs::remove_file(&partial);
    }
    result
}

/// Sibling of `path` used while its content is still being written.
pub(crate) fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

fn io_error(path: &Path, source: io::Error) -> ArchiveError {
    ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn write_entries<B: ImageBackend>(
    snapshot: &DirectorySnapshot<B>,
    path: &Path,
) -> Result<usize, ArchiveError> {
    let file = File::create(path).map_err(|e| io_error(path, e))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));

    for entry in snapshot.entries() {
        let method = compression_for(snapshot.is_valid_image(entry));
        let mut source = File::open(entry.path()).map_err(|e| io_error(entry.path(), e))?;
        let size = source
            .metadata()
            .map_err(|e| io_error(entry.path(), e))?
            .len();

        let options = SimpleFileOptions::default()
            .compression_method(method)
            .large_file(size >= u32::MAX as u64);

        tracing::debug!(
            name = entry.original_name(),
            ?method,
            size,
            "adding archive entry"
        );
        zip.start_file(entry.original_name(), options)?;
        io::copy(&mut source, &mut zip).map_err(|e| io_error(entry.path(), e))?;
    }

    let mut writer = zip.finish()?;
    writer.flush().map_err(|e| io_error(path, e))?;
    Ok(snapshot.entries().len())
}
