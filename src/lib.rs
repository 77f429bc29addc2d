//! # photo-page
//!
//! Turns a directory of photographs into a shareable bundle: a zip archive of
//! the originals, a verbatim copy and a resized JPEG copy of every image, and
//! a static gallery page linking them in capture-time order.
//!
//! # Pipeline
//!
//! Each source directory is processed on its own, start to finish:
//!
//! ```text
//! 1. Scan      source/  →  DirectorySnapshot   (enumerate once, probe lazily)
//! 2. Validate  snapshot →  warnings | rejection (images only, some image, unique names)
//! 3. Bundle    snapshot →  <out>/               (archive → copies + resizes → page)
//! ```
//!
//! A rejected directory produces no output at all. A failure while bundling
//! aborts that directory only; the binary moves on to the next one.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | Recovers the original name from a `YYYYMMDD-HHMMSS (name).ext` file name |
//! | [`metadata`] | Capture-time resolution: EXIF first, file timestamp fallback, one invariant format |
//! | [`imaging`] | Image backend trait, pure-Rust probe and bounded JPEG resize |
//! | [`scan`] | Directory snapshot, memoized per-file state, validation queries |
//! | [`archive`] | Zip archive with per-entry compression |
//! | [`generate`] | Gallery page rendered with Maud |
//! | [`process`] | Validation gate, output directory allocation, bundle orchestration |
//! | [`config`] | `photo-page.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Classification Is Not Failure
//!
//! Looking at a file answers "is this an image, and when was it taken?". The
//! answer is a [`metadata::Probe`] value, never an error: unreadable files are
//! simply not images, and missing or malformed EXIF dates fall back to the
//! file timestamp. Real I/O and codec failures while *writing* the bundle are
//! separate error types that propagate to the caller. Validation never has to
//! tell "the probe broke" apart from "the probe said no".
//!
//! ## Probe Once
//!
//! Every per-file fact (original name, image-ness, capture time) is computed
//! on first use and cached in the [`scan::FileEntry`]. Validation, archiving,
//! and page generation all read the same answers, even if the file changes
//! on disk during the run.
//!
//! ## Deterministic Page
//!
//! The gallery page is a pure function of the entries and their capture
//! times: stable sort, embedded stylesheet, no timestamps. Rebuilding the
//! same directory yields the same bytes.

pub mod archive;
pub mod config;
pub mod generate;
pub mod imaging;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod process;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
