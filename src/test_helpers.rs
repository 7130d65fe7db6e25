//! Shared builders for the unit tests.
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let candidates = [
//!     candidate(5, 1024, 768),
//!     candidate_with_crop(7, 640, 480, Crop::new(0, 0, 1200, 900)),
//! ];
//! ```

use std::path::Path;

use crate::geometry::Crop;
use crate::modifier::ImageModifier;
use crate::selection::{Candidate, ImageModification, Resolution};

pub const IMAGE_ID: u64 = 1;
pub const CONTEXT_ID: u64 = 1;

// =========================================================================
// Candidates
// =========================================================================

/// A candidate registered for resolution `id` (`width x height`), no crop.
pub fn candidate(id: u64, width: u32, height: u32) -> Candidate {
    Candidate::new(
        ImageModification {
            image_id: IMAGE_ID,
            context_id: CONTEXT_ID,
            resolution_id: id,
            modifier: ImageModifier::new(width, height),
        },
        Resolution::new(id, width, height),
    )
}

/// Like [`candidate`], with the editor's crop set.
pub fn candidate_with_crop(id: u64, width: u32, height: u32, crop: Crop) -> Candidate {
    let base = candidate(id, width, height);
    let modifier = base.modification.modifier.with_crop(crop);
    Candidate::new(base.modification.with_modifier(modifier), base.resolution)
}

// =========================================================================
// Files
// =========================================================================

/// Write a solid-colour PNG of the given size.
pub fn write_png(path: &Path, width: u32, height: u32) {
    image::RgbImage::from_pixel(width, height, image::Rgb([40, 80, 120]))
        .save(path)
        .unwrap();
}
