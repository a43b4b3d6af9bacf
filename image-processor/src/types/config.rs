//! Processor configuration, read once at cold start

use std::str::FromStr;

use media_storage::config::{optional_var, required_var, split_list};
use media_storage::ConfigError;

use crate::transform::{FitMode, OutputFormat};
use crate::variants::{self, ImageSize, Quality, VariantSpec};

const DEFAULT_FITS: &str = "contain";
const DEFAULT_QUALITIES: &str = "100";

/// Process-wide processor settings
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Bucket holding originals and derivatives
    pub bucket_name: String,
    /// `WxH` tokens as configured, malformed ones included
    pub sizes: Vec<String>,
    pub fits: Vec<FitMode>,
    pub qualities: Vec<Quality>,
    pub format: OutputFormat,
}

impl ProcessorConfig {
    /// Builds the configuration from `BUCKET_NAME`, `IMAGE_SIZES`, `IMAGE_FITS`,
    /// `IMAGE_QUALITY` and `IMAGE_FORMAT`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `BUCKET_NAME` or `IMAGE_SIZES` is unset
    /// Returns `ConfigError::Invalid` if a list entry or the format cannot be used
    pub fn from_env() -> Result<Self, ConfigError> {
        let bucket_name = required_var("BUCKET_NAME")?;
        let sizes = required_var("IMAGE_SIZES")?;
        let fits = optional_var("IMAGE_FITS");
        let qualities = optional_var("IMAGE_QUALITY");
        let format = optional_var("IMAGE_FORMAT");

        Self::from_parts(
            bucket_name,
            &sizes,
            fits.as_deref(),
            qualities.as_deref(),
            format.as_deref(),
        )
    }

    /// Builds the configuration from raw values
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a list entry or the format cannot be used,
    /// or if a size is over [`ImageSize::MAX_PIXELS`]
    pub fn from_parts(
        bucket_name: String,
        sizes: &str,
        fits: Option<&str>,
        qualities: Option<&str>,
        format: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let sizes = split_list(sizes);
        if sizes.is_empty() {
            return Err(ConfigError::invalid(
                "IMAGE_SIZES",
                "",
                "at least one size is required",
            ));
        }
        for token in &sizes {
            match ImageSize::parse(token) {
                None => tracing::warn!(size = %token, "Ignoring malformed size, expected WxH"),
                Some(size) if !size.within_pixel_limit() => {
                    return Err(ConfigError::invalid(
                        "IMAGE_SIZES",
                        token,
                        format!("exceeds {} pixels", ImageSize::MAX_PIXELS),
                    ));
                }
                Some(_) => {}
            }
        }

        let fits = split_list(fits.unwrap_or(DEFAULT_FITS))
            .iter()
            .map(|fit| {
                FitMode::from_str(fit)
                    .map_err(|_| ConfigError::invalid("IMAGE_FITS", fit, "unknown fit mode"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let qualities = split_list(qualities.unwrap_or(DEFAULT_QUALITIES))
            .iter()
            .map(|quality| {
                Quality::parse(quality).ok_or_else(|| {
                    ConfigError::invalid("IMAGE_QUALITY", quality, "expected an integer 0-100")
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let format = match format {
            Some(format) => OutputFormat::from_str(format)
                .map_err(|_| ConfigError::invalid("IMAGE_FORMAT", format, "unsupported format"))?,
            None => OutputFormat::default(),
        };

        Ok(Self {
            bucket_name,
            sizes,
            fits,
            qualities,
            format,
        })
    }

    /// Every derivative to produce for one original
    #[must_use]
    pub fn variants(&self) -> Vec<VariantSpec> {
        variants::combinations(&self.sizes, &self.fits, &self.qualities)
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use pretty_assertions::assert_eq;
    use serial_test::serial;

    use super::*;

    const VARS: [&str; 5] = [
        "BUCKET_NAME",
        "IMAGE_SIZES",
        "IMAGE_FITS",
        "IMAGE_QUALITY",
        "IMAGE_FORMAT",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        env::set_var("BUCKET_NAME", "images");
        env::set_var("IMAGE_SIZES", "100x100, 200x200");

        let config = ProcessorConfig::from_env().unwrap();

        assert_eq!(config.bucket_name, "images");
        assert_eq!(config.sizes, vec!["100x100", "200x200"]);
        assert_eq!(config.fits, vec![FitMode::Contain]);
        assert_eq!(config.qualities.len(), 1);
        assert_eq!(config.qualities[0].value(), 100);
        assert_eq!(config.format, OutputFormat::Png);
        assert_eq!(config.variants().len(), 4);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_required_vars() {
        clear_env();
        assert_eq!(
            ProcessorConfig::from_env().unwrap_err(),
            ConfigError::Missing("BUCKET_NAME")
        );

        env::set_var("BUCKET_NAME", "images");
        assert_eq!(
            ProcessorConfig::from_env().unwrap_err(),
            ConfigError::Missing("IMAGE_SIZES")
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn test_all_lists_from_env() {
        clear_env();
        env::set_var("BUCKET_NAME", "images");
        env::set_var("IMAGE_SIZES", "100x100");
        env::set_var("IMAGE_FITS", "cover,inside");
        env::set_var("IMAGE_QUALITY", "60,90");
        env::set_var("IMAGE_FORMAT", "jpg");

        let config = ProcessorConfig::from_env().unwrap();

        assert_eq!(config.fits, vec![FitMode::Cover, FitMode::Inside]);
        assert_eq!(config.format, OutputFormat::Jpeg);
        assert_eq!(config.variants().len(), 2 * 2 * 2);

        clear_env();
    }

    #[test]
    fn test_unknown_fit_is_rejected() {
        let err = ProcessorConfig::from_parts("b".into(), "10x10", Some("cover,stretch"), None, None)
            .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { name: "IMAGE_FITS", ref value, .. } if value == "stretch"));
    }

    #[test]
    fn test_fit_names_are_case_sensitive() {
        assert!(ProcessorConfig::from_parts("b".into(), "10x10", Some("Cover"), None, None).is_err());
    }

    #[test]
    fn test_out_of_range_quality_is_rejected() {
        for quality in ["101", "-1", "high"] {
            let err = ProcessorConfig::from_parts("b".into(), "10x10", None, Some(quality), None)
                .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { name: "IMAGE_QUALITY", .. }));
        }
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let err = ProcessorConfig::from_parts("b".into(), "10x10", None, None, Some("tiff"))
            .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { name: "IMAGE_FORMAT", .. }));
    }

    #[test]
    fn test_empty_size_list_is_rejected() {
        let err = ProcessorConfig::from_parts("b".into(), " , ", None, None, None).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { name: "IMAGE_SIZES", .. }));
    }

    #[test]
    fn test_oversized_size_is_rejected() {
        let err = ProcessorConfig::from_parts("b".into(), "100x100,60000x60000", None, None, None)
            .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Invalid { name: "IMAGE_SIZES", ref value, .. } if value == "60000x60000"
        ));
    }

    #[test]
    fn test_size_at_pixel_limit_is_accepted() {
        let config =
            ProcessorConfig::from_parts("b".into(), "16383x16383", None, None, None).unwrap();

        assert_eq!(config.variants().len(), 2);
    }

    #[test]
    fn test_malformed_sizes_are_kept_but_produce_no_variants() {
        let config =
            ProcessorConfig::from_parts("b".into(), "100x,50x50", None, None, None).unwrap();

        assert_eq!(config.sizes, vec!["100x", "50x50"]);
        assert_eq!(config.variants().len(), 2);
    }
}
