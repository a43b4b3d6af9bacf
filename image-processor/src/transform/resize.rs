use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use strum::{Display, EnumString};

use crate::types::TransformError;
use crate::variants::ImageSize;

/// Transparent white, visible only where `contain` letterboxes
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 0]);

const FILTER: FilterType = FilterType::Lanczos3;

/// How the source aspect ratio is reconciled with the target box
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum FitMode {
    /// Fill the box exactly, cropping the overflow
    Cover,
    /// Fit inside the box and letterbox the rest with [`BACKGROUND`]
    Contain,
    /// Stretch to the box, ignoring aspect ratio
    Fill,
    /// Fit inside the box; the output may be smaller on one side
    Inside,
    /// Cover the box; the output may be larger on one side
    Outside,
}

/// Resizes `img` to `size` under `fit`
///
/// # Errors
///
/// Returns `TransformError::ResolutionTooLarge` if the output, or the
/// intermediate image `cover` crops from, would exceed [`ImageSize::MAX_PIXELS`]
pub fn resize_image(
    img: &DynamicImage,
    size: ImageSize,
    fit: FitMode,
) -> Result<DynamicImage, TransformError> {
    let ImageSize { width, height } = size;
    check_pixel_limit(width, height)?;

    let resized = match fit {
        FitMode::Cover => {
            // Scales to the covering size before cropping
            let (w, h) = outside_dimensions(img.dimensions(), (width, height));
            check_pixel_limit(w, h)?;
            img.resize_to_fill(width, height, FILTER)
        }
        FitMode::Contain => letterbox(&img.resize(width, height, FILTER), width, height),
        FitMode::Fill => img.resize_exact(width, height, FILTER),
        FitMode::Inside => img.resize(width, height, FILTER),
        FitMode::Outside => {
            let (w, h) = outside_dimensions(img.dimensions(), (width, height));
            check_pixel_limit(w, h)?;
            img.resize_exact(w, h, FILTER)
        }
    };

    Ok(resized)
}

fn check_pixel_limit(width: u32, height: u32) -> Result<(), TransformError> {
    if (ImageSize { width, height }).within_pixel_limit() {
        Ok(())
    } else {
        Err(TransformError::ResolutionTooLarge { width, height })
    }
}

/// Centres `img` on a `width x height` canvas of [`BACKGROUND`]
fn letterbox(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let mut canvas = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, BACKGROUND));

    let x_offset = (width.saturating_sub(img.width())) / 2;
    let y_offset = (height.saturating_sub(img.height())) / 2;
    imageops::overlay(&mut canvas, img, i64::from(x_offset), i64::from(y_offset));

    canvas
}

/// Smallest aspect-preserving dimensions that cover `target`
fn outside_dimensions((src_w, src_h): (u32, u32), (dst_w, dst_h): (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = (u64::from(src_w.max(1)), u64::from(src_h.max(1)));
    let (dst_w, dst_h) = (u64::from(dst_w), u64::from(dst_h));

    // Compare dst_w / src_w against dst_h / src_h without floats
    let (w, h) = if dst_w * src_h >= dst_h * src_w {
        (dst_w, (src_h * dst_w).div_ceil(src_w))
    } else {
        ((src_w * dst_h).div_ceil(src_h), dst_h)
    };

    (
        u32::try_from(w).unwrap_or(u32::MAX),
        u32::try_from(h).unwrap_or(u32::MAX),
    )
}
