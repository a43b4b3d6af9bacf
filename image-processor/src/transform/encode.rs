use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ImageFormat};
use strum::{Display, EnumString};

use crate::types::TransformError;

/// Container every derivative is written in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    #[strum(to_string = "jpeg", serialize = "jpg")]
    Jpeg,
    Webp,
}

impl OutputFormat {
    /// File extension used in derivative keys
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
        }
    }

    /// `Content-Type` stored with the derivative
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }
}

/// Encodes `img` as `format`
///
/// PNG and WebP are lossless; `quality` only affects JPEG.
///
/// # Errors
///
/// Returns `TransformError::EncodeFailed` if the encoder rejects the image
pub fn encode_image(
    img: &DynamicImage,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, TransformError> {
    let mut buf = Cursor::new(Vec::new());

    let result = match format {
        OutputFormat::Png => img.write_to(&mut buf, ImageFormat::Png),
        OutputFormat::Jpeg => {
            // Encoder accepts 1-100
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality.max(1));
            img.to_rgb8().write_with_encoder(encoder)
        }
        OutputFormat::Webp => {
            let encoder = WebPEncoder::new_lossless(&mut buf);
            img.to_rgba8().write_with_encoder(encoder)
        }
    };

    result.map_err(|e| TransformError::EncodeFailed {
        format: format.extension(),
        reason: e.to_string(),
    })?;

    Ok(buf.into_inner())
}
