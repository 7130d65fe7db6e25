//! # Reframe
//!
//! Picks the image transformation that serves a requested output size.
//!
//! Images are stored once, at full resolution. Every derived rendition is
//! described by an [`ImageModifier`](modifier::ImageModifier): a target size,
//! an optional crop into the original, and a handful of flags. Editors
//! register modifiers for specific resolutions ("this crop at 1024x768").
//! When some other resolution is requested, the engine decides which
//! registered modifier to reuse, and how to adapt it, so the art direction
//! carries over instead of falling back to a plain scale of the full image.
//!
//! # Architecture: Selector Chain
//!
//! ```text
//! request ─┬─ exact        registered for exactly this resolution?
//!          ├─ same-ratio   registered for the same aspect ratio?
//!          ├─ adapt        extend or shrink a crop to the new ratio
//!          └─ (none)       fresh modifier from the original image
//! ```
//!
//! Each stage is an [`ImageModificationSelector`](selection::ImageModificationSelector);
//! the [`ImageModificationResolver`](selection::ImageModificationResolver)
//! returns the first answer. [`plan`](plan::plan) turns that answer into the
//! normalized modifier an executor would run.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`geometry`] | Exact fractions and aspect ratios, `WxH` dimensions, crop rectangles |
//! | [`modifier`] | `ImageModifier` value type and its normalization |
//! | [`selection`] | Candidate model, the three selectors and the resolver |
//! | [`plan`] | Hit or miss → final normalized modifier |
//! | [`imaging`] | Reading source dimensions and format with the `image` crate |
//! | [`manifest`] | JSON manifest input and parallel batch planning |
//! | [`config`] | `reframe.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Exact Arithmetic
//!
//! Aspect ratios are compared as reduced fractions, never as floats. `4:3`
//! and `1024:768` are the same key; `16:9` and `1.7777` are not. Every
//! product goes through a widened intermediate and reports overflow instead
//! of wrapping.
//!
//! ## Immutable Values
//!
//! Modifiers, crops and fractions are `Copy`. Every operation returns a new
//! value, so selectors can run on any thread without coordination, and
//! `batch` fans requests out over `rayon` without locks.
//!
//! ## Normalization Is Total
//!
//! A crop that lies outside the image, a request larger than the source, a
//! `0x0` size: none of these are errors. Normalization clips, fills and
//! clamps until the modifier is executable, or returns
//! [`ImageModifier::EMPTY`](modifier::ImageModifier::EMPTY) when there is
//! nothing left to do.

pub mod config;
pub mod geometry;
pub mod imaging;
pub mod manifest;
pub mod modifier;
pub mod output;
pub mod plan;
pub mod selection;

#[cfg(test)]
pub(crate) mod test_helpers;
