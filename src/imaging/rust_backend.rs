//! Header-only identification with the `image` crate.
//!
//! | Input | How |
//! |---|---|
//! | JPEG, PNG, GIF, TIFF, WebP | `ImageReader::with_guessed_format` + `into_dimensions` |
//! | anything else | file extension for the format, error for the size |
//!
//! `into_dimensions` reads only as much of the file as the decoder needs for
//! its header; no pixel data is decoded.

use std::path::Path;

use image::ImageReader;

use super::backend::{BackendError, ImageBackend, SourceInfo};
use crate::geometry::Dimensions;
use crate::modifier::ImageFormat;

/// Pure Rust backend using the `image` crate's header readers.
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

fn map_format(format: image::ImageFormat) -> Option<ImageFormat> {
    match format {
        image::ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
        image::ImageFormat::Png => Some(ImageFormat::Png),
        image::ImageFormat::Gif => Some(ImageFormat::Gif),
        image::ImageFormat::WebP => Some(ImageFormat::Webp),
        image::ImageFormat::Tiff => Some(ImageFormat::Tiff),
        image::ImageFormat::Avif => Some(ImageFormat::Avif),
        _ => None,
    }
}

fn format_from_extension(path: &Path) -> Option<ImageFormat> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(ImageFormat::from_extension)
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<SourceInfo, BackendError> {
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let format = reader
            .format()
            .and_then(map_format)
            .or_else(|| format_from_extension(path));

        let (width, height) = reader.into_dimensions().map_err(|e| {
            BackendError::Identify(format!("{}: {}", path.display(), e))
        })?;

        Ok(SourceInfo {
            dimensions: Dimensions::new(width, height),
            format,
        })
    }
}
