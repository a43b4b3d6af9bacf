//! Decode, resize, greyscale and encode

mod encode;
mod resize;

use image::DynamicImage;

pub use encode::{encode_image, OutputFormat};
pub use resize::{resize_image, FitMode, BACKGROUND};

use crate::types::TransformError;
use crate::variants::{ColorVariant, VariantSpec};

/// Decodes an original, guessing its format from the leading bytes
///
/// # Errors
///
/// Returns `TransformError::DecodeFailed` if the bytes are not a supported image
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, TransformError> {
    image::load_from_memory(bytes).map_err(|e| TransformError::DecodeFailed(e.to_string()))
}

/// Renders one derivative of `original`
///
/// # Errors
///
/// Returns `TransformError::ResolutionTooLarge` if the variant is over the pixel limit
/// Returns `TransformError::EncodeFailed` if the result cannot be encoded
pub fn render_variant(
    original: &DynamicImage,
    variant: &VariantSpec,
    format: OutputFormat,
) -> Result<Vec<u8>, TransformError> {
    let resized = resize_image(original, variant.size, variant.fit)?;

    let output = match variant.color {
        ColorVariant::Normal => resized,
        ColorVariant::Grey => resized.grayscale(),
    };

    encode_image(&output, format, variant.quality.value())
}
