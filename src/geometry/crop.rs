//! Crop rectangles in source-image pixel space.
//!
//! A [`Crop`] as stored may lie partly (or entirely) outside the image it
//! refers to; [`Crop::normalize`] clips it. Width or height `<= 0` means the
//! crop is empty.

use serde::{Deserialize, Serialize};

use super::dimensions::Dimensions;
use super::rational::AspectRatio;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Crop {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

fn saturate(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// `ceil(a / b)` for `b > 0`.
fn div_ceil(a: i64, b: i64) -> i64 {
    -(-a).div_euclid(b)
}

impl Crop {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole image as a crop.
    pub fn full(dimensions: Dimensions) -> Self {
        Self::new(
            0,
            0,
            saturate(dimensions.width as i64),
            saturate(dimensions.height as i64),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Size of the crop; negative extents count as zero.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width.max(0) as u32, self.height.max(0) as u32)
    }

    /// True when the crop is exactly the whole `dimensions` rectangle.
    pub fn covers(&self, dimensions: Dimensions) -> bool {
        self.x == 0
            && self.y == 0
            && self.width as i64 == dimensions.width as i64
            && self.height as i64 == dimensions.height as i64
    }

    /// True when the crop lies entirely inside `dimensions`.
    pub fn fits_within(&self, dimensions: Dimensions) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.right() <= dimensions.width as i64
            && self.bottom() <= dimensions.height as i64
    }

    /// Clip the crop to `dimensions`.
    ///
    /// The origin is clamped to `(0, 0)` and the right/bottom edges to the
    /// image edges. A crop lying fully outside the image comes back empty.
    ///
    /// ```
    /// # use reframe::geometry::{Crop, Dimensions};
    /// let crop = Crop::new(-5, -10, 200, 300);
    /// let normalized = crop.normalize(Dimensions::new(200, 300));
    /// assert_eq!(normalized, Crop::new(0, 0, 195, 290));
    /// ```
    pub fn normalize(&self, dimensions: Dimensions) -> Crop {
        let x = self.x.max(0);
        let y = self.y.max(0);
        let right = self.right().min(dimensions.width as i64);
        let bottom = self.bottom().min(dimensions.height as i64);
        Crop::new(x, y, saturate(right - x as i64), saturate(bottom - y as i64))
    }

    /// Place a `width x height` rectangle on this crop's center.
    fn recenter(&self, width: i64, height: i64) -> Crop {
        // twice the center keeps odd sizes exact
        let cx2 = 2 * self.x as i64 + self.width as i64;
        let cy2 = 2 * self.y as i64 + self.height as i64;
        Crop::new(
            saturate((cx2 - width).div_euclid(2)),
            saturate((cy2 - height).div_euclid(2)),
            saturate(width),
            saturate(height),
        )
    }

    /// Smallest rectangle with aspect `ratio` that contains this crop,
    /// centered on it. Sizes round up so the original is always contained.
    ///
    /// Returns `None` for an empty crop or a non-positive ratio.
    pub fn extend_to(&self, ratio: AspectRatio) -> Option<Crop> {
        if self.is_empty() || ratio.numerator() <= 0 {
            return None;
        }
        let (p, q) = (ratio.numerator() as i64, ratio.denominator() as i64);
        let (w, h) = (self.width as i64, self.height as i64);

        let (width, height) = if w * q >= h * p {
            (w, div_ceil(w * q, p))
        } else {
            (div_ceil(h * p, q), h)
        };
        Some(self.recenter(width, height))
    }

    /// Largest rectangle with aspect `ratio` inside this crop, centered on
    /// it. Sizes round down so the result always stays inside.
    ///
    /// Returns `None` when the crop is empty, the ratio is non-positive or
    /// the result would have a zero extent.
    pub fn shrink_to(&self, ratio: AspectRatio) -> Option<Crop> {
        if self.is_empty() || ratio.numerator() <= 0 {
            return None;
        }
        let (p, q) = (ratio.numerator() as i64, ratio.denominator() as i64);
        let (w, h) = (self.width as i64, self.height as i64);

        let (width, height) = if w * q >= h * p {
            ((h * p / q).min(w), h)
        } else {
            (w, (w * q / p).min(h))
        };
        if width == 0 || height == 0 {
            return None;
        }
        Some(self.recenter(width, height))
    }
}

impl std::fmt::Display for Crop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}{:+}{:+}", self.width, self.height, self.x, self.y)
    }
}

/// Parses the `WxH+X+Y` geometry form; offsets may be negative (`WxH-X-Y`).
impl std::str::FromStr for Crop {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("invalid crop '{s}', expected WxH+X+Y");
        let (width, rest) = s.split_once('x').ok_or_else(invalid)?;
        let offsets_at = rest.find(['+', '-']).ok_or_else(invalid)?;
        let (height, offsets) = rest.split_at(offsets_at);
        let y_at = offsets[1..]
            .find(['+', '-'])
            .map(|i| i + 1)
            .ok_or_else(invalid)?;
        let (x, y) = offsets.split_at(y_at);

        let parse = |part: &str| part.parse::<i32>().map_err(|_| invalid());
        Ok(Crop::new(parse(x)?, parse(y)?, parse(width)?, parse(height)?))
    }
}
