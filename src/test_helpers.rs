//! Shared test utilities for the photo-page test suite.
//!
//! Provides synthetic image writers (plain JPEG, RGBA PNG, JPEGs carrying an
//! EXIF `DateTimeOriginal` or `Orientation`), modification-time control for
//! the capture-time fallback, and a small date constructor.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! write_jpeg_with_date_taken(&tmp.path().join("a.jpg"), 64, 48, "2023:01:01 12:00:00");
//! write_jpeg(&tmp.path().join("b.jpg"), 64, 48);
//! set_modified(&tmp.path().join("b.jpg"), local(2023, 6, 1, 9, 0, 0));
//! ```

use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone};
use filetime::FileTime;
use image::{ImageEncoder, RgbImage, RgbaImage};
use std::path::Path;
use std::time::SystemTime;

// =========================================================================
// Image writers
// =========================================================================

fn encode_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut bytes = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut bytes)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}

/// Write a small valid JPEG with the given dimensions and no EXIF.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, encode_jpeg(width, height)).unwrap();
}

/// Write a small valid RGBA PNG.
pub fn write_png(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, _| image::Rgba([255, 0, 0, (x % 256) as u8]));
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

/// Write a JPEG whose EXIF block carries `DateTimeOriginal = date_taken`.
///
/// The APP1 segment is assembled by hand: a little-endian TIFF header, an
/// IFD0 holding only the Exif-IFD pointer, and an Exif IFD holding only
/// `DateTimeOriginal` (tag 0x9003, ASCII).
pub fn write_jpeg_with_date_taken(path: &Path, width: u32, height: u32, date_taken: &str) {
    write_jpeg_with_exif(path, width, height, &tiff_with_date_taken(date_taken));
}

/// Write a JPEG whose IFD0 carries `Orientation = orientation` (tag 0x0112).
///
/// The pixel data is stored as `width` x `height`; a viewer honoring the tag
/// may display it rotated.
pub fn write_jpeg_with_orientation(path: &Path, width: u32, height: u32, orientation: u16) {
    write_jpeg_with_exif(path, width, height, &tiff_with_orientation(orientation));
}

fn write_jpeg_with_exif(path: &Path, width: u32, height: u32, tiff: &[u8]) {
    let jpeg = encode_jpeg(width, height);

    let mut out = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    out.extend_from_slice(&[0xFF, 0xD8]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(tiff);
    // Skip the encoder's own SOI
    out.extend_from_slice(&jpeg[2..]);
    std::fs::write(path, out).unwrap();
}

fn tiff_with_orientation(orientation: u16) -> Vec<u8> {
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());

    // IFD0: Orientation, SHORT, value inline and zero-padded
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x0112u16.to_le_bytes());
    tiff.extend_from_slice(&3u16.to_le_bytes());
    tiff.extend_from_slice(&1u32.to_le_bytes());
    tiff.extend_from_slice(&orientation.to_le_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_le_bytes());
    tiff
}

fn tiff_with_date_taken(date_taken: &str) -> Vec<u8> {
    const IFD0_OFFSET: u32 = 8;
    const EXIF_IFD_OFFSET: u32 = IFD0_OFFSET + 2 + 12 + 4;
    const DATA_OFFSET: u32 = EXIF_IFD_OFFSET + 2 + 12 + 4;

    let mut value = date_taken.as_bytes().to_vec();
    value.push(0);
    let count = value.len() as u32;

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&IFD0_OFFSET.to_le_bytes());

    // IFD0: ExifIFDPointer
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x8769u16.to_le_bytes());
    tiff.extend_from_slice(&4u16.to_le_bytes());
    tiff.extend_from_slice(&1u32.to_le_bytes());
    tiff.extend_from_slice(&EXIF_IFD_OFFSET.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());

    // Exif IFD: DateTimeOriginal
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x9003u16.to_le_bytes());
    tiff.extend_from_slice(&2u16.to_le_bytes());
    tiff.extend_from_slice(&count.to_le_bytes());
    if count <= 4 {
        let mut inline = [0u8; 4];
        inline[..value.len()].copy_from_slice(&value);
        tiff.extend_from_slice(&inline);
    } else {
        tiff.extend_from_slice(&DATA_OFFSET.to_le_bytes());
    }
    tiff.extend_from_slice(&0u32.to_le_bytes());

    if count > 4 {
        tiff.extend_from_slice(&value);
    }
    tiff
}

// =========================================================================
// Timestamps
// =========================================================================

/// Build a local wall-clock time.
pub fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

/// Convert a local wall-clock time to a `SystemTime`.
pub fn system_time(time: NaiveDateTime) -> SystemTime {
    SystemTime::from(Local.from_local_datetime(&time).single().unwrap())
}

/// Set a file's last-write time to the given local wall-clock time.
pub fn set_modified(path: &Path, time: NaiveDateTime) {
    filetime::set_file_mtime(path, FileTime::from_system_time(system_time(time))).unwrap();
}
