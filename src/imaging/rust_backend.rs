//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Recognize container | `image::ImageReader::with_guessed_format` (magic bytes, not extension) |
//! | Dimensions | `ImageReader::into_dimensions` (header only) |
//! | Capture time | `kamadak-exif` `DateTimeOriginal` |
//! | Decode | `image` crate decoders (JPEG, PNG, TIFF, WebP, GIF, BMP) |
//! | Orientation | `ImageDecoder::orientation` + `DynamicImage::apply_orientation` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |

use super::backend::{BackendError, Dimensions, ImageBackend, ProbedImage};
use super::calculations::fit_within;
use super::params::ResizeParams;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Open a file and sniff its format from content.
fn open_reader(path: &Path) -> Result<ImageReader<BufReader<File>>, BackendError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    if reader.format().is_none() {
        return Err(BackendError::ProcessingFailed(format!(
            "Unrecognized image format: {}",
            path.display()
        )));
    }
    Ok(reader)
}

/// Read the raw EXIF `DateTimeOriginal` text, if any.
///
/// Missing or unreadable EXIF is not an error; the caller falls back to the
/// file timestamp.
fn read_date_taken(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;
    let field = exif.get_field(exif::Tag::DateTimeOriginal, exif::In::PRIMARY)?;
    match &field.value {
        exif::Value::Ascii(values) => values
            .first()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

/// Decode an image with its EXIF orientation applied.
fn load_oriented(path: &Path) -> Result<DynamicImage, BackendError> {
    let mut decoder = open_reader(path)?.into_decoder().map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
    })?;
    let orientation = decoder
        .orientation()
        .unwrap_or(Orientation::NoTransforms);
    let mut img = DynamicImage::from_decoder(decoder).map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
    })?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Encode as baseline JPEG at the given quality, replacing any existing file.
fn save_jpeg(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(writer, quality as u8);
    // JPEG has no alpha channel
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

impl ImageBackend for RustBackend {
    fn probe(&self, path: &Path) -> Result<ProbedImage, BackendError> {
        let (width, height) = open_reader(path)?.into_dimensions().map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        let modified = std::fs::metadata(path)?.modified()?;

        Ok(ProbedImage {
            dimensions: Dimensions { width, height },
            date_taken: read_date_taken(path),
            modified,
        })
    }

    fn resize(&self, params: &ResizeParams) -> Result<Dimensions, BackendError> {
        let img = load_oriented(&params.source)?;
        let (width, height) = fit_within(
            (img.width(), img.height()),
            (params.max_width, params.max_height),
        );

        let resized = if (width, height) == (img.width(), img.height()) {
            img
        } else {
            img.resize_exact(width, height, FilterType::Lanczos3)
        };

        save_jpeg(&resized, &params.output, params.quality.value())?;
        Ok(Dimensions { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::Quality;
    use crate::test_helpers::*;

    #[test]
    fn probe_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        write_jpeg(&path, 200, 150);

        let probed = RustBackend::new().probe(&path).unwrap();
        assert_eq!(probed.dimensions.width, 200);
        assert_eq!(probed.dimensions.height, 150);
        assert_eq!(probed.date_taken, None);
    }

    #[test]
    fn probe_recognizes_format_by_content() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("misnamed.dat");
        write_png(&path, 32, 16);

        let probed = RustBackend::new().probe(&path).unwrap();
        assert_eq!(probed.dimensions.width, 32);
    }

    #[test]
    fn probe_reads_date_time_original() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("exif.jpg");
        write_jpeg_with_date_taken(&path, 64, 48, "2023:01:01 12:00:00");

        let probed = RustBackend::new().probe(&path).unwrap();
        assert_eq!(probed.dimensions.width, 64);
        assert_eq!(probed.date_taken.as_deref(), Some("2023:01:01 12:00:00"));
    }

    #[test]
    fn probe_text_file_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        assert!(RustBackend::new().probe(&path).is_err());
    }

    #[test]
    fn probe_truncated_jpeg_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();

        assert!(RustBackend::new().probe(&path).is_err());
    }

    #[test]
    fn probe_nonexistent_file_errors() {
        let result = RustBackend::new().probe(Path::new("/nonexistent/image.jpg"));
        assert!(result.is_err());
    }

    fn resize_params(source: &Path, output: &Path, max: u32) -> ResizeParams {
        ResizeParams {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            max_width: max,
            max_height: max,
            quality: Quality::new(75),
        }
    }

    #[test]
    fn resize_scales_down_to_bounds() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("big.jpg");
        let output = tmp.path().join("small.jpg");
        write_jpeg(&source, 400, 300);

        let dims = RustBackend::new()
            .resize(&resize_params(&source, &output, 100))
            .unwrap();
        assert_eq!((dims.width, dims.height), (100, 75));
        assert_eq!(image::image_dimensions(&output).unwrap(), (100, 75));
    }

    #[test]
    fn resize_does_not_upscale() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("tiny.jpg");
        let output = tmp.path().join("out.jpg");
        write_jpeg(&source, 40, 30);

        let dims = RustBackend::new()
            .resize(&resize_params(&source, &output, 1280))
            .unwrap();
        assert_eq!((dims.width, dims.height), (40, 30));
        assert_eq!(image::image_dimensions(&output).unwrap(), (40, 30));
    }

    #[test]
    fn resize_applies_orientation_before_fitting() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("rotated.jpg");
        let output = tmp.path().join("out.jpg");
        // Stored landscape, displayed portrait (rotate 90 clockwise)
        write_jpeg_with_orientation(&source, 80, 40, 6);

        let dims = RustBackend::new()
            .resize(&ResizeParams {
                max_width: 20,
                max_height: 1000,
                ..resize_params(&source, &output, 0)
            })
            .unwrap();
        assert_eq!((dims.width, dims.height), (20, 40));
        assert_eq!(image::image_dimensions(&output).unwrap(), (20, 40));
    }

    #[test]
    fn resize_always_writes_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("alpha.png");
        let output = tmp.path().join("alpha.png.out");
        write_png(&source, 50, 20);

        RustBackend::new()
            .resize(&resize_params(&source, &output, 25))
            .unwrap();

        let format = ImageReader::open(&output)
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .format();
        assert_eq!(format, Some(image::ImageFormat::Jpeg));
        assert_eq!(image::image_dimensions(&output).unwrap(), (25, 10));
    }

    #[test]
    fn resize_overwrites_existing_output() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("a.jpg");
        let output = tmp.path().join("out.jpg");
        write_jpeg(&source, 80, 60);
        std::fs::write(&output, "stale").unwrap();

        RustBackend::new()
            .resize(&resize_params(&source, &output, 40))
            .unwrap();
        assert_eq!(image::image_dimensions(&output).unwrap(), (40, 30));
    }

    #[test]
    fn resize_non_image_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("notes.txt");
        std::fs::write(&source, "hello").unwrap();

        let result =
            RustBackend::new().resize(&resize_params(&source, &tmp.path().join("o.jpg"), 10));
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }
}
