//! Error responses for the issuer API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use media_storage::BucketError;
use serde::Serialize;

/// Failures `POST /uploads` can report
///
/// Signing is local, so the only failures are storage-side ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppError {
    /// S3 answered with a 5xx
    StorageUnavailable,
    /// Anything else; not retryable when the signer rejected its own settings
    Internal { retryable: bool },
}

/// `{ "allowRetry": bool, "error": { "code", "message" } }`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorEnvelope {
    allow_retry: bool,
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: &'static str,
}

impl AppError {
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub const fn allow_retry(self) -> bool {
        match self {
            Self::StorageUnavailable => true,
            Self::Internal { retryable } => retryable,
        }
    }

    const fn code(self) -> &'static str {
        match self {
            Self::StorageUnavailable => "upstream_error",
            Self::Internal { .. } => "internal_error",
        }
    }

    const fn message(self) -> &'static str {
        match self {
            Self::StorageUnavailable => "S3 service temporarily unavailable",
            Self::Internal { .. } => "Internal server error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(
            status = self.status().as_u16(),
            code = self.code(),
            "Upload request failed"
        );

        let envelope = ErrorEnvelope {
            allow_retry: self.allow_retry(),
            error: ErrorBody {
                code: self.code(),
                message: self.message(),
            },
        };

        (self.status(), Json(envelope)).into_response()
    }
}

impl From<BucketError> for AppError {
    fn from(err: BucketError) -> Self {
        tracing::error!(error = %err, "Storage error while issuing upload URL");

        match err {
            BucketError::UpstreamError(_) => Self::StorageUnavailable,
            BucketError::ConfigError(_) => Self::Internal { retryable: false },
            BucketError::S3Error(_)
            | BucketError::AwsError(_)
            | BucketError::NotFound(_)
            | BucketError::BodyError(_) => Self::Internal { retryable: true },
        }
    }
}
