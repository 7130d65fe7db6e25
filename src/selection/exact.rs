//! Highest priority: a modification registered for this very resolution.

use super::{Candidate, ImageModification, ImageModificationSelector, Resolution, SourceImage};

/// Returns the candidate registered under the requested resolution id, or
/// failing that the first candidate whose resolution has the same
/// width and height.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactRegistrationSelector;

impl ImageModificationSelector for ExactRegistrationSelector {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn select(
        &self,
        _source: &SourceImage,
        candidates: &[Candidate],
        requested: &Resolution,
    ) -> Option<ImageModification> {
        candidates
            .iter()
            .find(|c| c.resolution.id == requested.id)
            .or_else(|| {
                candidates.iter().find(|c| {
                    c.resolution.width == requested.width
                        && c.resolution.height == requested.height
                })
            })
            .map(|c| c.modification)
    }
}
