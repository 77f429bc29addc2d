//! CLI output formatting.
//!
//! Every directory on the command line gets a block of output:
//!
//! ```text
//! ==> /photos/Holiday
//! Warning: 1 image without capture time, using file timestamp
//!     /photos/Holiday/scan.jpg (2020:05:05 05:05:05)
//! Photos.zip (3 files)
//!     001/003 IMG_5.JPG (1280x960)
//!     002/003 IMG_6.JPG (960x1280)
//!     003/003 scan.jpg (800x600)
//! Default.htm (3 images)
//! Done: /out/Holiday
//! ```
//!
//! A rejected directory names the reason and the offending files:
//!
//! ```text
//! ==> /photos/Mixed
//! Rejected: not all files are valid images
//!     /photos/Mixed/notes.txt
//! ```
//!
//! A failed directory shows the error and its causes:
//!
//! ```text
//! ==> /photos/Broken
//! Failed: /photos/Broken
//!     Archive failed: IO error on /photos/Broken/a.jpg: Permission denied (os error 13)
//!         IO error on /photos/Broken/a.jpg: Permission denied (os error 13)
//!         Permission denied (os error 13)
//! ```
//!
//! # Architecture
//!
//! Each message has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes it out. Format functions
//! are pure: no I/O, no side effects.

use crate::metadata::format_capture_time;
use crate::process::{BundleReport, MissingCaptureTime, ProcessEvent, Rejection};
use std::error::Error;
use std::path::Path;

/// Format a 1-based position as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn eprint_lines(lines: &[String]) {
    for line in lines {
        eprintln!("{}", line);
    }
}

// ============================================================================
// Per-directory messages
// ============================================================================

pub fn format_directory_header(source: &Path) -> String {
    format!("==> {}", source.display())
}

pub fn print_directory_header(source: &Path) {
    println!("{}", format_directory_header(source));
}

/// Format a validation rejection.
///
/// ```text
/// Rejected: duplicate file names
///     IMG_1.JPG
/// ```
pub fn format_rejection(rejection: &Rejection) -> Vec<String> {
    let mut lines = vec![format!("Rejected: {}", rejection)];
    match rejection {
        Rejection::UnreadableImages(paths) => {
            lines.extend(paths.iter().map(|p| format!("{}{}", indent(1), p.display())));
        }
        Rejection::NoImages => {}
        Rejection::DuplicateNames(names) => {
            lines.extend(names.iter().map(|n| format!("{}{}", indent(1), n)));
        }
    }
    lines
}

pub fn print_rejection(rejection: &Rejection) {
    eprint_lines(&format_rejection(rejection));
}

/// Format the missing-capture-time warning. Empty input gives no lines.
pub fn format_missing_capture_time(missing: &[MissingCaptureTime]) -> Vec<String> {
    if missing.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![format!(
        "Warning: {} without capture time, using file timestamp",
        plural(missing.len(), "image", "images")
    )];
    for m in missing {
        lines.push(format!(
            "{}{} ({})",
            indent(1),
            m.path.display(),
            format_capture_time(&m.fallback)
        ));
    }
    lines
}

pub fn print_missing_capture_time(missing: &[MissingCaptureTime]) {
    eprint_lines(&format_missing_capture_time(missing));
}

/// Format a progress event from [`build_bundle`](crate::process::build_bundle).
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::ArchiveWritten { path, entries } => {
            vec![format!(
                "{} ({})",
                file_name(path),
                plural(*entries, "file", "files")
            )]
        }
        ProcessEvent::ImageProcessed {
            index,
            total,
            name,
            width,
            height,
        } => {
            vec![format!(
                "{}{}/{} {} ({}x{})",
                indent(1),
                format_index(*index),
                format_index(*total),
                name,
                width,
                height
            )]
        }
        ProcessEvent::PageWritten { path, images } => {
            vec![format!(
                "{} ({})",
                file_name(path),
                plural(*images, "image", "images")
            )]
        }
    }
}

pub fn format_bundle_report(report: &BundleReport) -> Vec<String> {
    vec![format!("Done: {}", report.output_dir.display())]
}

pub fn print_bundle_report(report: &BundleReport) {
    print_lines(&format_bundle_report(report));
}

/// Format the result of a passing `check`.
pub fn format_check_passed(images: usize) -> Vec<String> {
    vec![format!("OK: {} ready", plural(images, "image", "images"))]
}

pub fn print_check_passed(images: usize) {
    print_lines(&format_check_passed(images));
}

/// Format a fatal error with its cause chain.
///
/// The error itself is indented one level, each cause two levels.
pub fn format_error(source: &Path, error: &dyn Error) -> Vec<String> {
    let mut lines = vec![
        format!("Failed: {}", source.display()),
        format!("{}{}", indent(1), error),
    ];
    let mut cause = error.source();
    while let Some(e) = cause {
        lines.push(format!("{}{}", indent(2), e));
        cause = e.source();
    }
    lines
}

pub fn print_error(source: &Path, error: &dyn Error) {
    eprint_lines(&format_error(source, error));
}

/// Final line after all directories: how many failed or were rejected.
pub fn format_summary(total: usize, failed: usize) -> Vec<String> {
    if failed == 0 {
        Vec::new()
    } else {
        vec![format!(
            "{} of {} not processed",
            failed,
            plural(total, "directory", "directories")
        )]
    }
}

pub fn print_summary(total: usize, failed: usize) {
    eprint_lines(&format_summary(total, failed));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveError;
    use crate::process::ProcessError;
    use crate::test_helpers::local;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn index_is_zero_padded() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(1234), "1234");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(1), "    ");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn directory_header() {
        assert_eq!(
            format_directory_header(Path::new("/photos/Holiday")),
            "==> /photos/Holiday"
        );
    }

    // =========================================================================
    // Rejections and warnings
    // =========================================================================

    #[test]
    fn rejection_lists_unreadable_files() {
        let lines = format_rejection(&Rejection::UnreadableImages(vec![
            PathBuf::from("/p/notes.txt"),
            PathBuf::from("/p/broken.jpg"),
        ]));
        assert_eq!(
            lines,
            vec![
                "Rejected: not all files are valid images",
                "    /p/notes.txt",
                "    /p/broken.jpg",
            ]
        );
    }

    #[test]
    fn rejection_no_images_is_one_line() {
        assert_eq!(
            format_rejection(&Rejection::NoImages),
            vec!["Rejected: no images found"]
        );
    }

    #[test]
    fn rejection_lists_duplicate_names() {
        let lines = format_rejection(&Rejection::DuplicateNames(vec!["IMG_1.JPG".into()]));
        assert_eq!(lines, vec!["Rejected: duplicate file names", "    IMG_1.JPG"]);
    }

    #[test]
    fn missing_capture_time_warning() {
        let lines = format_missing_capture_time(&[MissingCaptureTime {
            path: PathBuf::from("/p/a.jpg"),
            fallback: local(2020, 5, 5, 5, 5, 5),
        }]);
        assert_eq!(
            lines,
            vec![
                "Warning: 1 image without capture time, using file timestamp",
                "    /p/a.jpg (2020:05:05 05:05:05)",
            ]
        );
    }

    #[test]
    fn missing_capture_time_empty_prints_nothing() {
        assert!(format_missing_capture_time(&[]).is_empty());
    }

    // =========================================================================
    // Progress events
    // =========================================================================

    #[test]
    fn format_archive_written() {
        let lines = format_process_event(&ProcessEvent::ArchiveWritten {
            path: PathBuf::from("/out/Holiday/Photos.zip"),
            entries: 3,
        });
        assert_eq!(lines, vec!["Photos.zip (3 files)"]);
    }

    #[test]
    fn format_image_processed() {
        let lines = format_process_event(&ProcessEvent::ImageProcessed {
            index: 2,
            total: 12,
            name: "IMG_5.JPG".to_string(),
            width: 1280,
            height: 960,
        });
        assert_eq!(lines, vec!["    002/012 IMG_5.JPG (1280x960)"]);
    }

    #[test]
    fn format_page_written() {
        let lines = format_process_event(&ProcessEvent::PageWritten {
            path: PathBuf::from("/out/Holiday/Default.htm"),
            images: 1,
        });
        assert_eq!(lines, vec!["Default.htm (1 image)"]);
    }

    #[test]
    fn format_report_and_check() {
        let report = BundleReport {
            output_dir: PathBuf::from("/out/Holiday"),
            images: 3,
            missing_capture_time: Vec::new(),
        };
        assert_eq!(format_bundle_report(&report), vec!["Done: /out/Holiday"]);
        assert_eq!(format_check_passed(3), vec!["OK: 3 images ready"]);
    }

    // =========================================================================
    // Errors
    // =========================================================================

    #[test]
    fn error_includes_cause_chain() {
        let error = ProcessError::Archive(ArchiveError::Io {
            path: PathBuf::from("/p/a.jpg"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        });
        let lines = format_error(Path::new("/p"), &error);
        assert_eq!(
            lines,
            vec![
                "Failed: /p",
                "    Archive failed: IO error on /p/a.jpg: denied",
                "        IO error on /p/a.jpg: denied",
                "        denied",
            ]
        );
    }

    #[test]
    fn summary_only_when_something_failed() {
        assert!(format_summary(3, 0).is_empty());
        assert_eq!(format_summary(3, 1), vec!["1 of 3 directories not processed"]);
    }
}
