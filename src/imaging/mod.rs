//! Image probing and resizing in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Probe** | `image::ImageReader` (format sniffing + header dimensions) |
//! | **Capture time** | `kamadak-exif` (`DateTimeOriginal`) |
//! | **Resize → JPEG** | Lanczos3 + `JpegEncoder` at a fixed quality |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, ProbedImage};
pub use calculations::fit_within;
pub use params::{Quality, ResizeParams};
pub use rust_backend::RustBackend;
