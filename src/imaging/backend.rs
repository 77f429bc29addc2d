//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the pipeline needs
//! from an image codec: `probe` (recognize the container, read dimensions
//! and the embedded capture time) and `resize` (bounded re-encode).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! and `kamadak-exif` crates.

use super::params::ResizeParams;
use std::path::Path;
use std::time::SystemTime;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// What a successful probe learned about a file.
///
/// `date_taken` is the raw embedded `DateTimeOriginal` text, unparsed;
/// interpreting it is [`metadata`](crate::metadata)'s job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbedImage {
    pub dimensions: Dimensions,
    pub date_taken: Option<String>,
    pub modified: SystemTime,
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Recognize the file as an image without decoding its pixels.
    ///
    /// Any error means "not an image" to the caller.
    fn probe(&self, path: &Path) -> Result<ProbedImage, BackendError>;

    /// Decode, scale down to fit, and write a JPEG. Returns the output size.
    fn resize(&self, params: &ResizeParams) -> Result<Dimensions, BackendError>;
}
