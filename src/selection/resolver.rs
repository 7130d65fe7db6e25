//! Runs the selector chain in priority order.

use super::{
    AspectRatioAdaptationSelector, Candidate, ExactRegistrationSelector, ImageModification,
    ImageModificationSelector, Resolution, SameAspectRatioSelector, SourceImage,
};
use crate::config::SelectionConfig;

/// A modification picked by the chain, with the selector that picked it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub selector: &'static str,
    pub modification: ImageModification,
}

/// An ordered list of selectors; earlier entries take priority.
pub struct ImageModificationResolver {
    selectors: Vec<Box<dyn ImageModificationSelector>>,
}

impl Default for ImageModificationResolver {
    fn default() -> Self {
        Self::standard()
    }
}

impl ImageModificationResolver {
    /// Exact registration, then same aspect ratio, then adaptation.
    pub fn standard() -> Self {
        Self::with_selectors(vec![
            Box::new(ExactRegistrationSelector),
            Box::new(SameAspectRatioSelector),
            Box::new(AspectRatioAdaptationSelector),
        ])
    }

    /// The standard chain, minus adaptation if the config disables it.
    pub fn from_config(config: &SelectionConfig) -> Self {
        let mut selectors: Vec<Box<dyn ImageModificationSelector>> = vec![
            Box::new(ExactRegistrationSelector),
            Box::new(SameAspectRatioSelector),
        ];
        if config.adaptation {
            selectors.push(Box::new(AspectRatioAdaptationSelector));
        }
        Self::with_selectors(selectors)
    }

    pub fn with_selectors(selectors: Vec<Box<dyn ImageModificationSelector>>) -> Self {
        Self { selectors }
    }

    pub fn selector_names(&self) -> Vec<&'static str> {
        self.selectors.iter().map(|s| s.name()).collect()
    }

    /// First non-empty answer from the chain, with its selector.
    pub fn select(
        &self,
        source: &SourceImage,
        candidates: &[Candidate],
        requested: &Resolution,
    ) -> Option<Selection> {
        let found = self.selectors.iter().find_map(|selector| {
            selector
                .select(source, candidates, requested)
                .map(|modification| Selection {
                    selector: selector.name(),
                    modification,
                })
        });

        match &found {
            Some(selection) => tracing::debug!(
                image = source.id,
                requested = requested.id,
                selector = selection.selector,
                chosen = selection.modification.resolution_id,
                "selected registered modification"
            ),
            None => tracing::debug!(
                image = source.id,
                requested = requested.id,
                candidates = candidates.len(),
                "no registered modification applies"
            ),
        }
        found
    }

    /// First non-empty answer from the chain.
    pub fn resolve(
        &self,
        source: &SourceImage,
        candidates: &[Candidate],
        requested: &Resolution,
    ) -> Option<ImageModification> {
        self.select(source, candidates, requested)
            .map(|selection| selection.modification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Crop, Dimensions};
    use crate::test_helpers::{candidate, candidate_with_crop};

    const SOURCE: SourceImage = SourceImage::new(1, Dimensions::new(1000, 1000));

    struct Fixed(&'static str, Option<u64>);

    impl ImageModificationSelector for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn select(
            &self,
            _source: &SourceImage,
            candidates: &[Candidate],
            _requested: &Resolution,
        ) -> Option<ImageModification> {
            let id = self.1?;
            candidates
                .iter()
                .find(|c| c.resolution.id == id)
                .map(|c| c.modification)
        }
    }

    #[test]
    fn standard_chain_order() {
        assert_eq!(
            ImageModificationResolver::standard().selector_names(),
            vec!["exact", "same-ratio", "adapt"]
        );
    }

    #[test]
    fn config_can_disable_adaptation() {
        let resolver = ImageModificationResolver::from_config(&SelectionConfig { adaptation: false });
        assert_eq!(resolver.selector_names(), vec!["exact", "same-ratio"]);
    }

    #[test]
    fn first_non_empty_selector_wins() {
        let resolver = ImageModificationResolver::with_selectors(vec![
            Box::new(Fixed("none", None)),
            Box::new(Fixed("second", Some(2))),
            Box::new(Fixed("third", Some(3))),
        ]);
        let candidates = [candidate(2, 10, 10), candidate(3, 20, 20)];
        let selection = resolver
            .select(&SOURCE, &candidates, &Resolution::new(9, 1, 1))
            .unwrap();
        assert_eq!(selection.selector, "second");
        assert_eq!(selection.modification.resolution_id, 2);
    }

    #[test]
    fn exact_match_beats_same_ratio() {
        let candidates = [candidate(5, 1024, 768), candidate(9, 640, 480)];
        let selection = ImageModificationResolver::standard()
            .select(&SOURCE, &candidates, &Resolution::new(9, 800, 600))
            .unwrap();
        assert_eq!(selection.selector, "exact");
        assert_eq!(selection.modification.resolution_id, 9);
    }

    #[test]
    fn falls_through_to_adaptation() {
        let candidates = [candidate_with_crop(4, 100, 100, Crop::new(450, 450, 100, 100))];
        let selection = ImageModificationResolver::standard()
            .select(&SOURCE, &candidates, &Resolution::new(9, 200, 100))
            .unwrap();
        assert_eq!(selection.selector, "adapt");
        assert_eq!(
            selection.modification.modifier.crop(),
            Some(Crop::new(400, 450, 200, 100))
        );
    }

    #[test]
    fn adaptation_disabled_returns_none() {
        let candidates = [candidate_with_crop(4, 100, 100, Crop::new(450, 450, 100, 100))];
        let resolver = ImageModificationResolver::from_config(&SelectionConfig { adaptation: false });
        assert_eq!(
            resolver.resolve(&SOURCE, &candidates, &Resolution::new(9, 200, 100)),
            None
        );
    }

    #[test]
    fn repeated_calls_see_new_candidates() {
        let resolver = ImageModificationResolver::standard();
        let requested = Resolution::new(9, 800, 600);
        assert_eq!(resolver.resolve(&SOURCE, &[], &requested), None);
        let candidates = [candidate(9, 800, 600)];
        assert!(resolver.resolve(&SOURCE, &candidates, &requested).is_some());
    }
}
