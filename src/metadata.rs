//! Capture-time resolution.
//!
//! Every valid image gets a local capture time. Two sources exist:
//!
//! - **Embedded metadata**: the EXIF `DateTimeOriginal` field, written by the
//!   camera in local time as `YYYY:MM:DD HH:MM:SS`.
//! - **File timestamp**: the file's last-write time, converted to local time.
//!
//! The embedded value wins when it is present and parses. When it is absent,
//! empty, or malformed, the file timestamp is used and the entry is flagged
//! so the caller can warn about it. A malformed value is never an error.
//!
//! ## One format, both directions
//!
//! Capture times are rendered and parsed with [`CAPTURE_TIME_FORMAT`] only,
//! through [`format_capture_time`] and [`parse_capture_time`]. Nothing here
//! depends on the process locale, so a value rendered by one run always
//! re-parses to the same instant in another.
//!
//! ## Classification, not errors
//!
//! [`Probe`] is the result of looking at a file: either it is not an image,
//! or it is one with a [`CaptureTime`]. It carries no error type on purpose;
//! I/O and decode failures during probing are folded into
//! [`Probe::NotAnImage`] by the caller.

use chrono::{DateTime, Local, NaiveDateTime};
use std::time::SystemTime;

/// The EXIF date-time layout, used for every render and parse of a capture time.
pub const CAPTURE_TIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Render a capture time with [`CAPTURE_TIME_FORMAT`].
pub fn format_capture_time(time: &NaiveDateTime) -> String {
    time.format(CAPTURE_TIME_FORMAT).to_string()
}

/// Parse a capture time written with [`CAPTURE_TIME_FORMAT`].
///
/// Surrounding whitespace and NUL padding (common in EXIF ASCII fields) are
/// ignored. Returns `None` for empty or malformed input.
pub fn parse_capture_time(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    if trimmed.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(trimmed, CAPTURE_TIME_FORMAT).ok()
}

/// Convert a file-system timestamp to local wall-clock time.
pub fn local_from_system_time(time: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(time).naive_local()
}

/// Where a capture time came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSource {
    /// Parsed from embedded `DateTimeOriginal`.
    Metadata,
    /// Fallback: the file's last-write time.
    FileModified,
}

/// A resolved local capture time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureTime {
    pub local: NaiveDateTime,
    pub source: CaptureSource,
}

/// Outcome of probing one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    NotAnImage,
    Image(CaptureTime),
}

impl Probe {
    pub fn is_valid_image(&self) -> bool {
        matches!(self, Probe::Image(_))
    }

    pub fn capture_time(&self) -> Option<&CaptureTime> {
        match self {
            Probe::Image(time) => Some(time),
            Probe::NotAnImage => None,
        }
    }

    /// True for images whose capture time fell back to the file timestamp.
    pub fn lacks_embedded_capture_time(&self) -> bool {
        matches!(
            self,
            Probe::Image(CaptureTime {
                source: CaptureSource::FileModified,
                ..
            })
        )
    }
}

/// Resolve a capture time: embedded value first, file timestamp as fallback.
///
/// `embedded` is the raw metadata string if the file has one.
pub fn resolve_capture_time(embedded: Option<&str>, modified: NaiveDateTime) -> CaptureTime {
    let fallback = CaptureTime {
        local: modified,
        source: CaptureSource::FileModified,
    };

    let Some(raw) = embedded else {
        tracing::debug!("no embedded capture time, using file timestamp");
        return fallback;
    };

    match parse_capture_time(raw) {
        Some(local) => CaptureTime {
            local,
            source: CaptureSource::Metadata,
        },
        None => {
            tracing::debug!(raw, "unparseable embedded capture time, using file timestamp");
            fallback
        }
    }
}
