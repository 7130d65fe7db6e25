//! Exact geometry for requested image transforms.
//!
//! | Type | Role |
//! |---|---|
//! | [`Fraction`] / [`AspectRatio`] | overflow-checked rationals, canonical reduced form |
//! | [`Dimensions`] | width/height request, `0` = unspecified |
//! | [`Crop`] | rectangle in source pixel space, clipped by `normalize` |
//!
//! Everything here is pure and `Copy`; nothing allocates except text
//! rendering.

mod crop;
mod dimensions;
mod rational;

pub use crop::Crop;
pub use dimensions::Dimensions;
pub(crate) use dimensions::mul_div;
pub use rational::{AspectRatio, Fraction, RatioDistance, RationalError};
