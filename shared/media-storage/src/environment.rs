//! Deployment stage and the AWS client settings that follow from it

use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, SdkConfig};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{optional_var, ConfigError};

/// Presigned upload URLs are valid for five minutes
pub const DEFAULT_PRESIGNED_URL_EXPIRY: Duration = Duration::from_secs(5 * 60);

/// `LocalStack` edge endpoint used in development
const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";

/// Stage the functions are deployed to, from `APP_ENV`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Production,
    Staging,
    /// Runs against `LocalStack`
    Development {
        /// `PRESIGNED_URL_EXPIRY_SECS`, honoured only here
        presign_expiry_override: Option<u64>,
    },
}

impl Environment {
    /// Reads `APP_ENV`, defaulting to development
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for an unknown stage, or for a
    /// development expiry override that is not a whole number of seconds
    pub fn from_env() -> Result<Self, ConfigError> {
        let stage = optional_var("APP_ENV")
            .map_or_else(|| "development".to_string(), |s| s.to_lowercase());

        match stage.as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => {
                let presign_expiry_override = optional_var("PRESIGNED_URL_EXPIRY_SECS")
                    .map(|secs| {
                        secs.parse::<u64>().map_err(|e| {
                            ConfigError::invalid("PRESIGNED_URL_EXPIRY_SECS", &secs, e.to_string())
                        })
                    })
                    .transpose()?;

                Ok(Self::Development {
                    presign_expiry_override,
                })
            }
            other => Err(ConfigError::invalid(
                "APP_ENV",
                other,
                "expected production, staging or development",
            )),
        }
    }

    #[must_use]
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development { .. })
    }

    /// Installs the global tracing subscriber
    ///
    /// Deployed stages log JSON lines for `CloudWatch`; development logs plain text.
    /// `RUST_LOG` wins over the per-stage default level.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_log_level()));

        if self.is_development() {
            fmt().with_env_filter(filter).init();
        } else {
            fmt().json().with_env_filter(filter).init();
        }
    }

    /// Log level used when `RUST_LOG` is unset
    #[must_use]
    pub const fn default_log_level(&self) -> &'static str {
        if self.is_development() {
            "debug"
        } else {
            "info"
        }
    }

    /// Shared AWS settings: three attempts, 30s per operation
    pub async fn aws_config(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .retry_config(
                RetryConfig::standard()
                    .with_max_attempts(3)
                    .with_initial_backoff(Duration::from_millis(50)),
            )
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(Duration::from_secs(30))
                    .build(),
            );

        if self.is_development() {
            loader = loader.endpoint_url(LOCALSTACK_ENDPOINT);
        }

        loader.load().await
    }

    /// S3 client settings on top of [`Self::aws_config`]
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        // LocalStack only serves path-style bucket addressing
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        aws_sdk_s3::config::Builder::from(&self.aws_config().await)
            .force_path_style(self.is_development())
            .build()
    }

    /// How long an issued upload URL stays valid
    #[must_use]
    pub const fn presigned_url_expiry(&self) -> Duration {
        match self {
            Self::Development {
                presign_expiry_override: Some(secs),
            } => Duration::from_secs(*secs),
            _ => DEFAULT_PRESIGNED_URL_EXPIRY,
        }
    }
}
