//! Choosing a registered modification for a requested resolution.
//!
//! Editors register [`ImageModification`]s: a crop and flags tied to one
//! output [`Resolution`] of one image in one context. When a resolution is
//! requested that has no modification of its own, the platform tries to
//! reuse (or geometrically adapt) an existing one so the editor's framing
//! carries over.
//!
//! # Selector chain
//!
//! | Priority | Selector | Picks |
//! |---|---|---|
//! | 1 | [`ExactRegistrationSelector`] | same resolution id, else identical width/height |
//! | 2 | [`SameAspectRatioSelector`] | same aspect ratio, closest larger first |
//! | 3 | [`AspectRatioAdaptationSelector`] | different ratio, crop extended or shrunk to fit |
//!
//! [`ImageModificationResolver`] runs them in that order; the first `Some`
//! wins. Priority is the order of construction, not a property of the
//! selectors.
//!
//! # Freshness
//!
//! Nothing in this module remembers a previous answer. Modifications are
//! edited by other server instances, so every call works only from the
//! candidates it is handed.

mod adapt;
mod exact;
mod resolver;
mod same_ratio;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::geometry::{AspectRatio, Dimensions};
use crate::modifier::{ImageFormat, ImageModifier};

pub use adapt::AspectRatioAdaptationSelector;
pub use exact::ExactRegistrationSelector;
pub use resolver::{ImageModificationResolver, Selection};
pub use same_ratio::SameAspectRatioSelector;

/// A registered output size within a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub id: u64,
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(id: u64, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Aspect ratio, or `None` when it is undefined or not representable.
    pub fn aspect_ratio(&self) -> Option<AspectRatio> {
        match self.dimensions().aspect_ratio() {
            Ok(ratio) if !ratio.is_undefined() => Some(ratio),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(resolution = self.id, "unusable aspect ratio: {e}");
                None
            }
        }
    }
}

/// A persisted transform tying one image to one registered resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageModification {
    pub image_id: u64,
    pub context_id: u64,
    pub resolution_id: u64,
    pub modifier: ImageModifier,
}

impl ImageModification {
    /// Copy of this modification carrying a different modifier.
    pub fn with_modifier(&self, modifier: ImageModifier) -> Self {
        Self { modifier, ..*self }
    }
}

/// What the selectors know about the original image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceImage {
    pub id: u64,
    #[serde(flatten)]
    pub dimensions: Dimensions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ImageFormat>,
}

impl SourceImage {
    pub const fn new(id: u64, dimensions: Dimensions) -> Self {
        Self {
            id,
            dimensions,
            format: None,
        }
    }

    pub fn with_format(self, format: Option<ImageFormat>) -> Self {
        Self { format, ..self }
    }
}

/// An existing modification together with the resolution it was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub modification: ImageModification,
    pub resolution: Resolution,
}

impl Candidate {
    pub fn new(modification: ImageModification, resolution: Resolution) -> Self {
        Self {
            modification,
            resolution,
        }
    }
}

/// One strategy in the selector chain.
pub trait ImageModificationSelector: Send + Sync {
    /// Short identifier used in logs and plans.
    fn name(&self) -> &'static str;

    /// Pick a modification from `candidates` for `requested`, or `None`.
    fn select(
        &self,
        source: &SourceImage,
        candidates: &[Candidate],
        requested: &Resolution,
    ) -> Option<ImageModification>;
}

/// Orders candidates by how well their size serves `requested`.
///
/// Candidates at least as wide as the request come first, closest first
/// (they only need downscaling). Smaller candidates follow, again closest
/// first.
pub(crate) fn compare_size_distance(
    a: &Resolution,
    b: &Resolution,
    requested: &Resolution,
) -> Ordering {
    size_distance_key(a, requested).cmp(&size_distance_key(b, requested))
}

fn size_distance_key(candidate: &Resolution, requested: &Resolution) -> (bool, u64) {
    let d = signed_size_distance(candidate, requested);
    (d < 0, d.unsigned_abs())
}

/// `candidate.width - requested.width`.
pub(crate) fn signed_size_distance(candidate: &Resolution, requested: &Resolution) -> i64 {
    candidate.width as i64 - requested.width as i64
}
