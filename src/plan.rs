//! From a request to the modifier the executor runs.
//!
//! The resolver only says *which* registered modification to reuse. This
//! module turns that answer into the final, normalized [`ImageModifier`]:
//!
//! - **hit**: the chosen modifier (crop, flags) sized for the requested
//!   resolution;
//! - **miss**: a fresh modifier of the requested size, built straight from
//!   the original image.
//!
//! Density only matters for scalable sources; for known raster sources it
//! is reset to 1x1 so the executor never renders at a multiplier.

use serde::Serialize;

use crate::modifier::{DEFAULT_DENSITY, ImageModifier};
use crate::selection::{Candidate, ImageModificationResolver, Resolution, SourceImage};

/// Where a planned modifier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PlanOrigin {
    /// Reused (possibly adapted) from a registered modification.
    Registered {
        selector: &'static str,
        resolution_id: u64,
    },
    /// Built from the original image; nothing registered applied.
    Fresh,
}

/// The executor's instructions for one requested resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub image_id: u64,
    pub resolution: Resolution,
    pub origin: PlanOrigin,
    pub modifier: ImageModifier,
}

/// Plan the transform that serves `requested` for `source`.
pub fn plan(
    resolver: &ImageModificationResolver,
    source: &SourceImage,
    candidates: &[Candidate],
    requested: &Resolution,
) -> Plan {
    let (origin, base) = match resolver.select(source, candidates, requested) {
        Some(selection) => (
            PlanOrigin::Registered {
                selector: selection.selector,
                resolution_id: selection.modification.resolution_id,
            },
            selection.modification.modifier,
        ),
        None => (PlanOrigin::Fresh, ImageModifier::EMPTY),
    };

    let mut modifier = base
        .with_size(requested.width, requested.height)
        .normalize(Some(source.dimensions));
    if source.format.is_some_and(|f| !f.is_scalable()) {
        modifier = modifier.with_density(DEFAULT_DENSITY);
    }

    Plan {
        image_id: source.id,
        resolution: *requested,
        origin,
        modifier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Crop, Dimensions};
    use crate::modifier::ImageFormat;
    use crate::test_helpers::{candidate, candidate_with_crop};

    const SOURCE: SourceImage = SourceImage::new(7, Dimensions::new(1000, 1000));

    #[test]
    fn miss_plans_fresh_modifier() {
        let resolver = ImageModificationResolver::standard();
        let plan = plan(&resolver, &SOURCE, &[], &Resolution::new(9, 200, 100));
        assert_eq!(plan.origin, PlanOrigin::Fresh);
        assert_eq!(plan.image_id, 7);
        assert_eq!(plan.modifier.dimensions(), Dimensions::new(200, 100));
        assert_eq!(plan.modifier.crop(), None);
    }

    #[test]
    fn hit_reuses_crop_at_requested_size() {
        let resolver = ImageModificationResolver::standard();
        let candidates = [candidate_with_crop(4, 100, 100, Crop::new(450, 450, 100, 100))];
        let plan = plan(&resolver, &SOURCE, &candidates, &Resolution::new(9, 200, 100));

        assert_eq!(
            plan.origin,
            PlanOrigin::Registered {
                selector: "adapt",
                resolution_id: 4
            }
        );
        assert_eq!(plan.modifier.crop(), Some(Crop::new(400, 450, 200, 100)));
        assert_eq!(plan.modifier.dimensions(), Dimensions::new(200, 100));
    }

    #[test]
    fn raster_source_density_is_reset() {
        let resolver = ImageModificationResolver::standard();
        let registered = candidate(9, 3000, 3000);
        let stretched = ImageModifier::new(3000, 3000).with_stretch(true);
        let candidates = [Candidate::new(
            registered.modification.with_modifier(stretched),
            registered.resolution,
        )];
        let requested = registered.resolution;

        let raster = SOURCE.with_format(Some(ImageFormat::Png));
        let plan_raster = plan(&resolver, &raster, &candidates, &requested);
        assert_eq!(plan_raster.modifier.density(), DEFAULT_DENSITY);

        let vector = SOURCE.with_format(Some(ImageFormat::Svg));
        let plan_vector = plan(&resolver, &vector, &candidates, &requested);
        assert_eq!(plan_vector.modifier.dimensions(), Dimensions::new(3000, 3000));
        assert_eq!(plan_vector.modifier.density(), Dimensions::new(3, 3));
    }

    #[test]
    fn plan_serializes_origin_tag() {
        let resolver = ImageModificationResolver::standard();
        let plan = plan(&resolver, &SOURCE, &[], &Resolution::new(9, 10, 10));
        let json = serde_json::to_value(plan).unwrap();
        assert_eq!(json["origin"]["kind"], "fresh");
    }
}
