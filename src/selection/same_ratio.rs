//! Reuse a modification made for another size with the same aspect ratio.

use super::{
    Candidate, ImageModification, ImageModificationSelector, Resolution, SourceImage,
    compare_size_distance, signed_size_distance,
};

/// Among candidates with the requested aspect ratio, returns the closest one
/// that is at least as large as the request.
///
/// A smaller candidate is only acceptable when its crop was taken at a high
/// enough source resolution to hold the requested size, so reusing it does
/// not mean upscaling source pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct SameAspectRatioSelector;

impl ImageModificationSelector for SameAspectRatioSelector {
    fn name(&self) -> &'static str {
        "same-ratio"
    }

    fn select(
        &self,
        source: &SourceImage,
        candidates: &[Candidate],
        requested: &Resolution,
    ) -> Option<ImageModification> {
        let ratio = requested.aspect_ratio()?;

        let mut matching: Vec<&Candidate> = candidates
            .iter()
            .filter(|c| c.resolution.aspect_ratio() == Some(ratio))
            .collect();
        matching.sort_by(|a, b| compare_size_distance(&a.resolution, &b.resolution, requested));

        matching
            .into_iter()
            .find(|c| {
                if signed_size_distance(&c.resolution, requested) >= 0 {
                    return true;
                }
                let crop = c.modification.modifier.effective_crop(source.dimensions);
                let fits = requested.dimensions().fits_within(&crop.dimensions());
                if !fits {
                    tracing::trace!(
                        resolution = c.resolution.id,
                        %crop,
                        "smaller candidate crop cannot hold {}x{}",
                        requested.width,
                        requested.height
                    );
                }
                fits
            })
            .map(|c| c.modification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Crop, Dimensions};
    use crate::test_helpers::{candidate, candidate_with_crop};

    const SOURCE: SourceImage = SourceImage::new(1, Dimensions::new(2000, 1500));
    const REQUESTED: Resolution = Resolution::new(9, 800, 600);

    fn select(candidates: &[Candidate]) -> Option<u64> {
        SameAspectRatioSelector
            .select(&SOURCE, candidates, &REQUESTED)
            .map(|m| m.resolution_id)
    }

    #[test]
    fn closest_larger_candidate_wins() {
        let candidates = [candidate(5, 1024, 768), candidate(7, 640, 480)];
        assert_eq!(select(&candidates), Some(5));
    }

    #[test]
    fn closest_larger_beats_earlier_larger() {
        let candidates = [
            candidate(1, 1600, 1200),
            candidate(2, 1024, 768),
            candidate(3, 1200, 900),
        ];
        assert_eq!(select(&candidates), Some(2));
    }

    #[test]
    fn other_ratios_are_ignored() {
        let candidates = [candidate(1, 1920, 1080), candidate(2, 1000, 1000)];
        assert_eq!(select(&candidates), None);
    }

    #[test]
    fn smaller_candidate_without_crop_uses_whole_source() {
        // no crop: the whole 2000x1500 source can serve 800x600
        let candidates = [candidate(7, 640, 480)];
        assert_eq!(select(&candidates), Some(7));
    }

    #[test]
    fn smaller_candidate_with_large_crop_is_accepted() {
        let candidates = [candidate_with_crop(7, 640, 480, Crop::new(0, 0, 1200, 900))];
        assert_eq!(select(&candidates), Some(7));
    }

    #[test]
    fn smaller_candidate_with_tight_crop_is_rejected() {
        let candidates = [candidate_with_crop(7, 640, 480, Crop::new(100, 100, 640, 480))];
        assert_eq!(select(&candidates), None);
    }

    #[test]
    fn closest_smaller_is_tried_first() {
        let candidates = [
            candidate_with_crop(1, 400, 300, Crop::new(0, 0, 1600, 1200)),
            candidate_with_crop(2, 640, 480, Crop::new(0, 0, 640, 480)),
            candidate_with_crop(3, 720, 540, Crop::new(0, 0, 1000, 750)),
        ];
        assert_eq!(select(&candidates), Some(3));
    }

    #[test]
    fn undefined_request_is_none() {
        let candidates = [candidate(5, 1024, 768)];
        let requested = Resolution::new(9, 800, 0);
        assert_eq!(
            SameAspectRatioSelector.select(&SOURCE, &candidates, &requested),
            None
        );
    }

    #[test]
    fn equal_ratio_in_different_terms_matches() {
        // 880x660 reduces to 4:3
        let candidates = [candidate(5, 880, 660)];
        assert_eq!(select(&candidates), Some(5));
    }
}
