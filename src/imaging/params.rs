//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They sit between
//! the pipeline (which decides which copies to make) and the
//! [`backend`](super::backend) (which does the pixel work), so the pipeline
//! can be tested against a mock backend.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
///
/// Out-of-range values are clamped, so a configured 0 encodes as 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(75)
    }
}

/// Parameters for a bounded resize + JPEG re-encode.
///
/// The output fits inside `max_width` x `max_height` with the aspect ratio
/// preserved. Images already inside the box keep their size.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub max_width: u32,
    pub max_height: u32,
    pub quality: Quality,
}
