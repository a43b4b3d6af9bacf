//! Issuer configuration, read once at startup

use media_storage::config::required_var;
use media_storage::ConfigError;

use crate::cors::CorsConfig;

/// Which flavour of the issuer a binary runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssuerVariant {
    /// Plain JSON responses
    Plain,
    /// Responses carry CORS headers for `APP_URL`
    Cors,
}

/// Process-wide issuer settings
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    /// Bucket the client uploads originals into
    pub bucket_name: String,
    /// Present only for the CORS variant
    pub cors: Option<CorsConfig>,
}

impl IssuerConfig {
    /// Builds the configuration from `BUCKET_NAME` and, for the CORS variant, `APP_URL`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if a required variable is unset
    /// Returns `ConfigError::Invalid` if `APP_URL` is not a valid header value
    pub fn from_env(variant: IssuerVariant) -> Result<Self, ConfigError> {
        let bucket_name = required_var("BUCKET_NAME")?;

        let cors = match variant {
            IssuerVariant::Plain => None,
            IssuerVariant::Cors => Some(CorsConfig::new(&required_var("APP_URL")?)?),
        };

        Ok(Self { bucket_name, cors })
    }
}
