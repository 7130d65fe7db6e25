//! Width/height pairs where `0` means "unspecified".
//!
//! A [`Dimensions`] value is usually a *request*: `800x0` asks for an
//! 800 pixel wide output whose height follows from some reference aspect
//! ratio. [`Dimensions::normalize`] fills the gaps, and
//! [`Dimensions::scale_to_fit_in`] shrinks a request so it never exceeds a
//! boundary.

use serde::{Deserialize, Serialize};

use super::rational::{AspectRatio, Fraction, RationalError};

/// A width/height pair. Either axis may be `0` (unspecified).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// `value * numerator / denominator`, floored, saturating at `u32::MAX`.
pub(crate) fn mul_div(value: u32, numerator: u32, denominator: u32) -> u32 {
    let wide = value as u64 * numerator as u64 / denominator as u64;
    u32::try_from(wide).unwrap_or(u32::MAX)
}

impl Dimensions {
    pub const UNSPECIFIED: Dimensions = Dimensions::new(0, 0);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both axes specified.
    pub fn is_complete(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn is_unspecified(&self) -> bool {
        self.width == 0 && self.height == 0
    }

    /// Width:height, or [`Fraction::UNDEFINED`] if an axis is unspecified.
    pub fn aspect_ratio(&self) -> Result<AspectRatio, RationalError> {
        Fraction::from_dimensions(self.width, self.height)
    }

    /// True when neither axis exceeds `other`'s.
    pub fn fits_within(&self, other: &Dimensions) -> bool {
        self.width <= other.width && self.height <= other.height
    }

    /// Fill unspecified axes from `reference`.
    ///
    /// - No usable reference (missing or with a zero axis): unchanged.
    /// - Both axes unspecified: the reference itself.
    /// - One axis unspecified: derived from the reference's aspect ratio.
    ///
    /// ```
    /// # use reframe::geometry::Dimensions;
    /// let request = Dimensions::new(800, 0);
    /// let original = Dimensions::new(1600, 1200);
    /// assert_eq!(request.normalize(Some(original)), Dimensions::new(800, 600));
    /// ```
    pub fn normalize(self, reference: Option<Dimensions>) -> Dimensions {
        let Some(reference) = reference.filter(Dimensions::is_complete) else {
            return self;
        };

        match (self.width, self.height) {
            (0, 0) => reference,
            (width, 0) => Dimensions::new(width, mul_div(width, reference.height, reference.width)),
            (0, height) => {
                Dimensions::new(mul_div(height, reference.width, reference.height), height)
            }
            _ => self,
        }
    }

    /// Shrink (never grow) to fit inside `boundary`, keeping the aspect ratio.
    ///
    /// The request is normalized against the boundary first. Both axes are
    /// divided by the larger of the per-axis overshoot factors, so one axis
    /// lands exactly on the boundary and the other is floored.
    ///
    /// ```
    /// # use reframe::geometry::Dimensions;
    /// let big = Dimensions::new(3200, 1000);
    /// let boundary = Dimensions::new(1600, 1200);
    /// assert_eq!(big.scale_to_fit_in(boundary), Dimensions::new(1600, 500));
    /// ```
    pub fn scale_to_fit_in(self, boundary: Dimensions) -> Dimensions {
        let dims = self.normalize(Some(boundary));

        let width_over = boundary.width > 0 && dims.width > boundary.width;
        let height_over = boundary.height > 0 && dims.height > boundary.height;

        // Compare width/bw against height/bh without leaving integers.
        let width_dominates = match (width_over, height_over) {
            (false, false) => return dims,
            (true, false) => true,
            (false, true) => false,
            (true, true) => {
                dims.width as u64 * boundary.height as u64
                    >= dims.height as u64 * boundary.width as u64
            }
        };

        if width_dominates {
            Dimensions::new(
                boundary.width,
                mul_div(dims.height, boundary.width, dims.width),
            )
        } else {
            Dimensions::new(
                mul_div(dims.width, boundary.height, dims.height),
                boundary.height,
            )
        }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parses `WxH`; `800x0` leaves the height unspecified.
impl std::str::FromStr for Dimensions {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("invalid dimensions '{s}', expected WxH");
        let (width, height) = s.split_once('x').ok_or_else(invalid)?;
        Ok(Dimensions::new(
            width.parse().map_err(|_| invalid())?,
            height.parse().map_err(|_| invalid())?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGINAL: Dimensions = Dimensions::new(1600, 1200);

    #[test]
    fn parse_width_by_height() {
        assert_eq!("1600x1200".parse(), Ok(ORIGINAL));
        assert_eq!("800x0".parse(), Ok(Dimensions::new(800, 0)));
        assert!("800".parse::<Dimensions>().is_err());
        assert!("-1x5".parse::<Dimensions>().is_err());
    }

    // =========================================================================
    // normalize
    // =========================================================================

    #[test]
    fn normalize_derives_missing_height() {
        assert_eq!(
            Dimensions::new(800, 0).normalize(Some(ORIGINAL)),
            Dimensions::new(800, 600)
        );
    }

    #[test]
    fn normalize_derives_missing_width() {
        assert_eq!(
            Dimensions::new(0, 300).normalize(Some(ORIGINAL)),
            Dimensions::new(400, 300)
        );
    }

    #[test]
    fn normalize_floors_derived_axis() {
        // 100 * 3 / 4 = 75, 101 * 3 / 4 = 75.75
        assert_eq!(
            Dimensions::new(101, 0).normalize(Some(Dimensions::new(4, 3))),
            Dimensions::new(101, 75)
        );
    }

    #[test]
    fn normalize_both_unspecified_returns_reference() {
        assert_eq!(Dimensions::UNSPECIFIED.normalize(Some(ORIGINAL)), ORIGINAL);
    }

    #[test]
    fn normalize_both_specified_unchanged() {
        let request = Dimensions::new(10, 999);
        assert_eq!(request.normalize(Some(ORIGINAL)), request);
    }

    #[test]
    fn normalize_without_usable_reference_unchanged() {
        let request = Dimensions::new(800, 0);
        assert_eq!(request.normalize(None), request);
        assert_eq!(request.normalize(Some(Dimensions::new(0, 1200))), request);
        assert_eq!(request.normalize(Some(Dimensions::new(1600, 0))), request);
    }

    #[test]
    fn normalize_saturates_on_extreme_reference() {
        let request = Dimensions::new(u32::MAX, 0);
        let tall = Dimensions::new(1, 2);
        assert_eq!(request.normalize(Some(tall)).height, u32::MAX);
    }

    // =========================================================================
    // scale_to_fit_in
    // =========================================================================

    #[test]
    fn scale_to_fit_width_bound() {
        assert_eq!(
            Dimensions::new(3200, 1000).scale_to_fit_in(ORIGINAL),
            Dimensions::new(1600, 500)
        );
    }

    #[test]
    fn scale_to_fit_height_bound() {
        assert_eq!(
            Dimensions::new(1000, 2400).scale_to_fit_in(ORIGINAL),
            Dimensions::new(500, 1200)
        );
    }

    #[test]
    fn scale_to_fit_both_over_picks_larger_factor() {
        // width factor 2, height factor 2.5
        assert_eq!(
            Dimensions::new(3200, 3000).scale_to_fit_in(ORIGINAL),
            Dimensions::new(1280, 1200)
        );
    }

    #[test]
    fn scale_to_fit_never_grows() {
        let small = Dimensions::new(400, 300);
        assert_eq!(small.scale_to_fit_in(ORIGINAL), small);
    }

    #[test]
    fn scale_to_fit_fills_missing_axis_first() {
        assert_eq!(
            Dimensions::new(3200, 0).scale_to_fit_in(ORIGINAL),
            ORIGINAL
        );
    }

    #[test]
    fn scale_to_fit_ignores_unspecified_boundary_axis() {
        let boundary = Dimensions::new(1000, 0);
        assert_eq!(
            Dimensions::new(2000, 500).scale_to_fit_in(boundary),
            Dimensions::new(1000, 250)
        );
    }

    // =========================================================================
    // helpers
    // =========================================================================

    #[test]
    fn aspect_ratio_of_incomplete_dimensions_is_undefined() {
        assert!(Dimensions::new(0, 10).aspect_ratio().unwrap().is_undefined());
        assert_eq!(
            ORIGINAL.aspect_ratio().unwrap(),
            Fraction::new(4, 3).unwrap()
        );
    }

    #[test]
    fn display_uses_x_separator() {
        assert_eq!(ORIGINAL.to_string(), "1600x1200");
    }
}
