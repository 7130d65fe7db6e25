//! Source image identification.
//!
//! The engine never touches pixels, but it needs the real size of the
//! source image to normalize crops and requests against. The
//! [`ImageBackend`] trait is the seam to whatever reads that information;
//! [`RustBackend`](super::rust_backend::RustBackend) reads image headers with
//! the `image` crate.

use std::path::Path;

use thiserror::Error;

use crate::geometry::Dimensions;
use crate::modifier::ImageFormat;
use crate::selection::SourceImage;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot identify image: {0}")]
    Identify(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceInfo {
    pub dimensions: Dimensions,
    pub format: Option<ImageFormat>,
}

/// Reads what the engine needs to know about a source file.
pub trait ImageBackend: Sync {
    /// Real dimensions and (if recognised) format of the image at `path`.
    fn identify(&self, path: &Path) -> Result<SourceInfo, BackendError>;
}

/// Identify `path` and describe it as the source image `id`.
pub fn load_source(
    backend: &impl ImageBackend,
    id: u64,
    path: &Path,
) -> Result<SourceImage, BackendError> {
    let info = backend.identify(path)?;
    tracing::debug!(
        image = id,
        dimensions = %info.dimensions,
        format = ?info.format,
        "identified {}",
        path.display()
    );
    Ok(SourceImage::new(id, info.dimensions).with_format(info.format))
}
