//! The variant set and derivative key layout
//!
//! One original fans out into `sizes x fits x qualities x {normal, grey}`
//! derivatives. Each one is stored next to the original as
//! `{upload_id}/{size}-{fit}-{quality}[-grey].{ext}`, where `size` and
//! `quality` are the configuration tokens exactly as written.

use media_storage::UploadId;

use crate::transform::{FitMode, OutputFormat};

/// Target dimensions parsed from a `WxH` token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    /// Largest output, in pixels, any variant may allocate (`16383 x 16383`)
    pub const MAX_PIXELS: u64 = 0x3FFF * 0x3FFF;

    /// Parses `WxH`
    ///
    /// Returns `None` unless the token is exactly two positive integers split by `x`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let (width, height) = token.split_once('x')?;
        let width = width.parse::<u32>().ok().filter(|w| *w > 0)?;
        let height = height.parse::<u32>().ok().filter(|h| *h > 0)?;
        Some(Self { width, height })
    }

    #[must_use]
    pub fn pixel_count(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Whether an image of this size stays within [`Self::MAX_PIXELS`]
    #[must_use]
    pub fn within_pixel_limit(self) -> bool {
        self.pixel_count() <= Self::MAX_PIXELS
    }
}

/// Encoder quality, kept next to the token it was parsed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quality {
    token: String,
    value: u8,
}

impl Quality {
    /// Highest quality an encoder accepts
    pub const MAX: u8 = 100;

    /// Parses an integer in `0..=100`
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let value = token.parse::<u8>().ok().filter(|q| *q <= Self::MAX)?;
        Some(Self {
            token: token.to_string(),
            value,
        })
    }

    /// Numeric quality handed to the encoder
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.value
    }

    /// Token as configured, used in object keys
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Colour treatment of a derivative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorVariant {
    Normal,
    Grey,
}

impl ColorVariant {
    /// Every original gets both
    pub const ALL: [Self; 2] = [Self::Normal, Self::Grey];

    const fn key_suffix(self) -> &'static str {
        match self {
            Self::Normal => "",
            Self::Grey => "-grey",
        }
    }
}

/// One element of the variant set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSpec {
    /// The `WxH` token as configured
    pub size_token: String,
    pub size: ImageSize,
    pub fit: FitMode,
    pub quality: Quality,
    pub color: ColorVariant,
}

impl VariantSpec {
    /// File name of the derivative inside its upload prefix
    #[must_use]
    pub fn object_name(&self, format: OutputFormat) -> String {
        format!(
            "{}-{}-{}{}.{}",
            self.size_token,
            self.fit,
            self.quality.token(),
            self.color.key_suffix(),
            format.extension()
        )
    }

    /// Full object key of the derivative
    #[must_use]
    pub fn object_key(&self, upload_id: &UploadId, format: OutputFormat) -> String {
        upload_id.object_key(&self.object_name(format))
    }
}

/// Cartesian product of the configured lists
///
/// Size tokens that do not parse are left out; everything else is kept,
/// duplicates included.
#[must_use]
pub fn combinations(sizes: &[String], fits: &[FitMode], qualities: &[Quality]) -> Vec<VariantSpec> {
    sizes
        .iter()
        .filter_map(|token| ImageSize::parse(token).map(|size| (token, size)))
        .flat_map(|(token, size)| {
            fits.iter().flat_map(move |fit| {
                qualities.iter().flat_map(move |quality| {
                    ColorVariant::ALL.into_iter().map(move |color| VariantSpec {
                        size_token: token.clone(),
                        size,
                        fit: *fit,
                        quality: quality.clone(),
                        color,
                    })
                })
            })
        })
        .collect()
}
