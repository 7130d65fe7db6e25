//! Requested transforms and their canonical form.
//!
//! An [`ImageModifier`] describes *what* the executor should produce from a
//! source image: output size, optional crop, whether upscaling is allowed
//! (`stretch`), whether the source aspect ratio wins over the requested one
//! (`keep_aspect`), and a rasterization density for scalable sources.
//!
//! Values are immutable. Build them with [`ImageModifier::new`] and the
//! `with_*` combinators, then call [`ImageModifier::normalize`] against the
//! source's real dimensions to get the minimal form that two equivalent
//! requests share:
//!
//! ```
//! # use reframe::geometry::{Crop, Dimensions};
//! # use reframe::modifier::ImageModifier;
//! let original = Dimensions::new(1600, 1200);
//! let a = ImageModifier::new(800, 0);
//! let b = ImageModifier::new(800, 600).with_crop(Crop::new(-10, -10, 5000, 5000));
//! assert_eq!(a.normalize(Some(original)), b.normalize(Some(original)));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::{Crop, Dimensions, mul_div};

/// Image container formats the platform serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
    Tiff,
    Avif,
    Svg,
    Pdf,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 8] = [
        ImageFormat::Jpeg,
        ImageFormat::Png,
        ImageFormat::Gif,
        ImageFormat::Webp,
        ImageFormat::Tiff,
        ImageFormat::Avif,
        ImageFormat::Svg,
        ImageFormat::Pdf,
    ];

    /// Vector/document formats that are rasterized at a chosen density.
    pub fn is_scalable(self) -> bool {
        matches!(self, ImageFormat::Svg | ImageFormat::Pdf)
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::Webp => "webp",
            ImageFormat::Tiff => "tiff",
            ImageFormat::Avif => "avif",
            ImageFormat::Svg => "svg",
            ImageFormat::Pdf => "pdf",
        }
    }

    pub fn from_extension(ext: &str) -> Option<ImageFormat> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::Webp),
            "tif" | "tiff" => Some(ImageFormat::Tiff),
            "avif" => Some(ImageFormat::Avif),
            "svg" => Some(ImageFormat::Svg),
            "pdf" => Some(ImageFormat::Pdf),
            _ => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageFormat::from_extension(s).ok_or_else(|| format!("unknown image format '{s}'"))
    }
}

/// A requested (or registered) image transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageModifier {
    width: u32,
    height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    crop: Option<Crop>,
    stretch: bool,
    keep_aspect: bool,
    density: Dimensions,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<ImageFormat>,
}

/// Density of a modifier that renders scalable sources at 1:1.
pub const DEFAULT_DENSITY: Dimensions = Dimensions::new(1, 1);

impl Default for ImageModifier {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl ImageModifier {
    /// No transform at all.
    pub const EMPTY: ImageModifier = ImageModifier {
        width: 0,
        height: 0,
        crop: None,
        stretch: false,
        keep_aspect: false,
        density: DEFAULT_DENSITY,
        output: None,
    };

    /// Request a `width x height` output; `0` leaves an axis unspecified.
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::EMPTY
        }
    }

    pub fn with_size(self, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }

    pub fn with_crop(self, crop: Crop) -> Self {
        Self {
            crop: Some(crop),
            ..self
        }
    }

    pub fn with_stretch(self, stretch: bool) -> Self {
        Self { stretch, ..self }
    }

    pub fn with_keep_aspect(self, keep_aspect: bool) -> Self {
        Self {
            keep_aspect,
            ..self
        }
    }

    /// Density is derived by [`normalize`](Self::normalize); this only lets
    /// planning override the derived value afterwards.
    pub(crate) fn with_density(self, density: Dimensions) -> Self {
        Self { density, ..self }
    }

    pub fn with_output(self, output: Option<ImageFormat>) -> Self {
        Self { output, ..self }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    pub fn crop(&self) -> Option<Crop> {
        self.crop
    }

    pub fn stretch(&self) -> bool {
        self.stretch
    }

    pub fn keep_aspect(&self) -> bool {
        self.keep_aspect
    }

    pub fn density(&self) -> Dimensions {
        self.density
    }

    pub fn output(&self) -> Option<ImageFormat> {
        self.output
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// The crop actually applied against `original`: the normalized crop if
    /// one is set and non-empty, otherwise the whole image.
    pub fn effective_crop(&self, original: Dimensions) -> Crop {
        self.crop
            .map(|crop| crop.normalize(original))
            .filter(|crop| !crop.is_empty())
            .unwrap_or_else(|| Crop::full(original))
    }

    /// Canonical form of this modifier for a source of size `original`.
    ///
    /// Without a usable `original` (missing, or with a zero axis) the
    /// modifier is returned unchanged. Otherwise:
    ///
    /// 1. the crop is clipped to the image and dropped if it is empty or
    ///    covers the whole image;
    /// 2. a request with no size and no remaining crop is [`EMPTY`](Self::EMPTY);
    /// 3. the *boundary* is the crop's size, or `original`;
    /// 4. `keep_aspect` derives the secondary axis from the boundary (the
    ///    boundary's longer side picks the driving axis); otherwise missing
    ///    axes are filled from the boundary's aspect ratio;
    /// 5. without `stretch` the result is scaled down to fit the boundary;
    /// 6. density is `ceil(output / boundary)` per axis, at least 1.
    pub fn normalize(&self, original: Option<Dimensions>) -> ImageModifier {
        let Some(original) = original.filter(Dimensions::is_complete) else {
            return *self;
        };

        let crop = self
            .crop
            .map(|crop| crop.normalize(original))
            .filter(|crop| !crop.is_empty() && !crop.covers(original));

        let requested = self.dimensions();
        if requested.is_unspecified() && crop.is_none() {
            return Self::EMPTY;
        }

        let boundary = crop.map_or(original, |crop| crop.dimensions());

        let mut size = if self.keep_aspect {
            keep_aspect_size(requested, boundary)
        } else {
            requested.normalize(Some(boundary))
        };
        if !self.stretch {
            size = size.scale_to_fit_in(boundary);
        }

        let density = Dimensions::new(
            size.width.div_ceil(boundary.width).max(1),
            size.height.div_ceil(boundary.height).max(1),
        );

        ImageModifier {
            width: size.width,
            height: size.height,
            crop,
            stretch: self.stretch,
            keep_aspect: self.keep_aspect,
            density,
            output: self.output,
        }
    }
}

/// Size for a keep-aspect request: the boundary's orientation picks which
/// requested axis drives. A zero driving axis falls back to the plain fill
/// rule.
fn keep_aspect_size(requested: Dimensions, boundary: Dimensions) -> Dimensions {
    if boundary.width >= boundary.height {
        if requested.width > 0 {
            return Dimensions::new(
                requested.width,
                mul_div(requested.width, boundary.height, boundary.width),
            );
        }
    } else if requested.height > 0 {
        return Dimensions::new(
            mul_div(requested.height, boundary.width, boundary.height),
            requested.height,
        );
    }
    requested.normalize(Some(boundary))
}
