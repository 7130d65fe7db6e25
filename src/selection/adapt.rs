//! Fallback: adapt a modification made for a different aspect ratio.
//!
//! The editor's crop marks the part of the image that matters. To serve a
//! different ratio we first try to *extend* that crop (grow it around its
//! center until it has the requested ratio) because that keeps everything
//! the editor framed. Only if no candidate can be extended within the
//! source image do we *shrink* a crop, which cuts into the framing.

use super::{
    Candidate, ImageModification, ImageModificationSelector, Resolution, SourceImage,
    compare_size_distance,
};
use crate::geometry::{AspectRatio, Crop};

#[derive(Debug, Clone, Copy, Default)]
pub struct AspectRatioAdaptationSelector;

struct Adaptable<'a> {
    candidate: &'a Candidate,
    ratio: AspectRatio,
    crop: Crop,
}

impl AspectRatioAdaptationSelector {
    fn adapted(candidate: &Candidate, crop: Crop) -> ImageModification {
        let modifier = candidate.modification.modifier.with_crop(crop);
        candidate.modification.with_modifier(modifier)
    }
}

impl ImageModificationSelector for AspectRatioAdaptationSelector {
    fn name(&self) -> &'static str {
        "adapt"
    }

    fn select(
        &self,
        source: &SourceImage,
        candidates: &[Candidate],
        requested: &Resolution,
    ) -> Option<ImageModification> {
        let target = requested.aspect_ratio()?;
        if !source.dimensions.is_complete() {
            tracing::debug!(image = source.id, "source size unknown, cannot adapt crops");
            return None;
        }

        let mut adaptable: Vec<Adaptable<'_>> = candidates
            .iter()
            .filter_map(|candidate| {
                let ratio = candidate.resolution.aspect_ratio()?;
                (ratio != target).then(|| Adaptable {
                    candidate,
                    ratio,
                    crop: candidate
                        .modification
                        .modifier
                        .effective_crop(source.dimensions),
                })
            })
            .collect();
        adaptable.sort_by(|a, b| {
            a.ratio
                .distance(target)
                .cmp(&b.ratio.distance(target))
                .then_with(|| {
                    compare_size_distance(&a.candidate.resolution, &b.candidate.resolution, requested)
                })
        });

        for entry in &adaptable {
            match entry.crop.extend_to(target) {
                Some(extended) if extended.fits_within(source.dimensions) => {
                    tracing::debug!(
                        resolution = entry.candidate.resolution.id,
                        from = %entry.crop,
                        to = %extended,
                        "extended crop to {target}"
                    );
                    return Some(Self::adapted(entry.candidate, extended));
                }
                _ => tracing::trace!(
                    resolution = entry.candidate.resolution.id,
                    "crop cannot be extended to {target} inside the source"
                ),
            }
        }

        let wanted = requested.dimensions();
        for entry in &adaptable {
            match entry.crop.shrink_to(target) {
                Some(shrunk) if wanted.fits_within(&shrunk.dimensions()) => {
                    tracing::debug!(
                        resolution = entry.candidate.resolution.id,
                        from = %entry.crop,
                        to = %shrunk,
                        "shrunk crop to {target}"
                    );
                    return Some(Self::adapted(entry.candidate, shrunk));
                }
                _ => tracing::trace!(
                    resolution = entry.candidate.resolution.id,
                    "shrunk crop too small for {wanted}"
                ),
            }
        }

        None
    }
}
