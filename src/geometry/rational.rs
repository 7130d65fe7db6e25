//! Exact rational numbers for aspect-ratio math.
//!
//! [`Fraction`] stores a numerator/denominator pair of `i32` in lowest terms
//! with the sign carried by the numerator. Every operation that can leave the
//! `i32` range (construction, multiplication, division, [`Fraction::scale`],
//! [`Fraction::de_scale`]) is computed in a wider integer type first and
//! fails with [`RationalError::Overflow`] instead of wrapping.
//!
//! ## The UNDEFINED value
//!
//! [`Fraction::UNDEFINED`] is `0/0`. It is what [`Fraction::from_dimensions`]
//! returns when an axis is unspecified, and it takes part in ordering like a
//! zero: it equals itself and every zero-valued fraction, and sorts below
//! every non-zero fraction (negative ones included). Dividing by it is still
//! an error.
//!
//! ## Text form
//!
//! ```text
//! fraction := integer "/" integer
//! ```
//!
//! [`Fraction::to_url_string`] writes the separator as `%2F`; the parser
//! accepts `/` or `%2F` so both renderings round-trip through
//! [`str::parse`].

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Width:height ratio. Same representation as any other fraction.
pub type AspectRatio = Fraction;

const URL_SEPARATOR: &str = "%2F";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RationalError {
    #[error("arithmetic overflow: result does not fit in 32 bits")]
    Overflow,
    #[error("division by zero")]
    DivisionByZero,
    #[error("invalid fraction '{0}': expected <numerator>/<denominator>")]
    Format(String),
}

/// An exact rational number in lowest terms.
#[derive(Debug, Clone, Copy)]
pub struct Fraction {
    numerator: i32,
    denominator: i32,
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn narrow(value: i128) -> Result<i32, RationalError> {
    i32::try_from(value).map_err(|_| RationalError::Overflow)
}

/// `round(p / q)` with halves rounded up, for `q > 0`.
fn round_half_up(p: i128, q: i128) -> i128 {
    (2 * p + q).div_euclid(2 * q)
}

impl Fraction {
    /// `0/0`. See the [module docs](self) for its ordering.
    pub const UNDEFINED: Fraction = Fraction {
        numerator: 0,
        denominator: 0,
    };

    pub const ZERO: Fraction = Fraction {
        numerator: 0,
        denominator: 1,
    };

    /// Build a reduced fraction from a numerator and denominator.
    ///
    /// `(0, 0)` yields [`Fraction::UNDEFINED`]; any other zero denominator is
    /// a [`RationalError::DivisionByZero`].
    ///
    /// ```
    /// # use reframe::geometry::Fraction;
    /// let f = Fraction::new(-6, -4).unwrap();
    /// assert_eq!((f.numerator(), f.denominator()), (3, 2));
    /// ```
    pub fn new(numerator: i64, denominator: i64) -> Result<Self, RationalError> {
        Self::reduce(numerator as i128, denominator as i128)
    }

    fn reduce(numerator: i128, denominator: i128) -> Result<Self, RationalError> {
        if denominator == 0 {
            return if numerator == 0 {
                Ok(Self::UNDEFINED)
            } else {
                Err(RationalError::DivisionByZero)
            };
        }
        if numerator == 0 {
            return Ok(Self::ZERO);
        }

        let divisor = gcd(numerator.unsigned_abs(), denominator.unsigned_abs()) as i128;
        let sign = denominator.signum();
        Ok(Self {
            numerator: narrow(sign * numerator / divisor)?,
            denominator: narrow(sign * denominator / divisor)?,
        })
    }

    /// Aspect ratio of a `width x height` area.
    ///
    /// Returns [`Fraction::UNDEFINED`] when either axis is zero (unspecified).
    pub fn from_dimensions(width: u32, height: u32) -> Result<AspectRatio, RationalError> {
        if width == 0 || height == 0 {
            return Ok(Self::UNDEFINED);
        }
        Self::new(width as i64, height as i64)
    }

    pub fn numerator(self) -> i32 {
        self.numerator
    }

    pub fn denominator(self) -> i32 {
        self.denominator
    }

    /// True for every zero-valued fraction, UNDEFINED included.
    pub fn is_zero(self) -> bool {
        self.numerator == 0
    }

    pub fn is_undefined(self) -> bool {
        self.numerator == 0 && self.denominator == 0
    }

    /// Numerator and a strictly positive denominator; zero values map to `0/1`.
    fn parts(self) -> (i128, i128) {
        if self.is_zero() {
            (0, 1)
        } else {
            (self.numerator as i128, self.denominator as i128)
        }
    }

    pub fn to_f64(self) -> f64 {
        let (n, d) = self.parts();
        n as f64 / d as f64
    }

    pub fn multiply_with(self, other: Fraction) -> Result<Fraction, RationalError> {
        if self.is_zero() || other.is_zero() {
            return Ok(Self::ZERO);
        }
        Self::reduce(
            self.numerator as i128 * other.numerator as i128,
            self.denominator as i128 * other.denominator as i128,
        )
    }

    pub fn divide_by(self, other: Fraction) -> Result<Fraction, RationalError> {
        if other.is_zero() {
            return Err(RationalError::DivisionByZero);
        }
        if self.is_zero() {
            return Ok(Self::ZERO);
        }
        Self::reduce(
            self.numerator as i128 * other.denominator as i128,
            self.denominator as i128 * other.numerator as i128,
        )
    }

    /// `round(self * factor)`.
    ///
    /// For an aspect ratio this maps a height to the matching width.
    ///
    /// ```
    /// # use reframe::geometry::Fraction;
    /// let four_thirds = Fraction::new(4, 3).unwrap();
    /// assert_eq!(four_thirds.scale(600).unwrap(), 800);
    /// ```
    pub fn scale(self, factor: i32) -> Result<i32, RationalError> {
        let (n, d) = self.parts();
        narrow(round_half_up(n * factor as i128, d))
    }

    /// Solve `round(self * k) == target` for `k`, i.e. `round(target / self)`.
    ///
    /// For an aspect ratio this maps a width to the matching height.
    pub fn de_scale(self, target: i32) -> Result<i32, RationalError> {
        if self.is_zero() {
            return Err(RationalError::DivisionByZero);
        }
        let (mut p, mut q) = (
            target as i128 * self.denominator as i128,
            self.numerator as i128,
        );
        if q < 0 {
            (p, q) = (-p, -q);
        }
        narrow(round_half_up(p, q))
    }

    /// `|self - other| <= tolerance * |other|`.
    ///
    /// The error is relative to `other`, so the relation is not symmetric.
    pub fn within_tolerance(self, other: Fraction, tolerance: Fraction) -> bool {
        let (an, ad) = self.parts();
        let (bn, bd) = other.parts();
        let (tn, td) = tolerance.parts();
        // |an/ad - bn/bd| <= tn/td * |bn|/bd, multiplied through by ad*bd*td > 0
        (an * bd - bn * ad).abs() * td <= tn * bn.abs() * ad
    }

    /// Exact absolute difference `|self - other|`, usable as a sort key.
    pub fn distance(self, other: Fraction) -> RatioDistance {
        let (an, ad) = self.parts();
        let (bn, bd) = other.parts();
        RatioDistance {
            numerator: (an * bd - bn * ad).unsigned_abs(),
            denominator: (ad * bd) as u128,
        }
    }

    /// `"<n>/<d>"` with the separator percent-encoded.
    pub fn to_url_string(self) -> String {
        format!("{}{URL_SEPARATOR}{}", self.numerator, self.denominator)
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::UNDEFINED
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => {
                let lhs = self.numerator as i64 * other.denominator as i64;
                let rhs = other.numerator as i64 * self.denominator as i64;
                lhs.cmp(&rhs)
            }
        }
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Fraction {}

impl Hash for Fraction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // reduced form is canonical except for the zero family
        self.parts().hash(state);
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for Fraction {
    type Err = RationalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_error = || RationalError::Format(s.to_string());

        let normalized = s.replace(URL_SEPARATOR, "/").replace("%2f", "/");
        let mut parts = normalized.split('/');
        let (Some(numerator), Some(denominator), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(format_error());
        };

        let numerator: i64 = numerator.parse().map_err(|_| format_error())?;
        let denominator: i64 = denominator.parse().map_err(|_| format_error())?;
        Self::new(numerator, denominator)
    }
}

impl Serialize for Fraction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fraction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Absolute difference between two fractions, compared exactly.
#[derive(Debug, Clone, Copy)]
pub struct RatioDistance {
    numerator: u128,
    denominator: u128,
}

impl RatioDistance {
    pub fn is_zero(self) -> bool {
        self.numerator == 0
    }
}

impl Ord for RatioDistance {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.numerator * other.denominator).cmp(&(other.numerator * self.denominator))
    }
}

impl PartialOrd for RatioDistance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RatioDistance {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RatioDistance {}
