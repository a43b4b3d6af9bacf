use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};
use media_storage::{Environment, ObjectStore, UploadId};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::types::AppError;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Presigned PUT URL for the original image
    pub url: String,
    /// Session id; derivatives appear under `{upload_id}/`
    pub upload_id: String,
}

/// Starts an upload session
///
/// Generates a fresh upload id and returns a presigned PUT URL for
/// `{upload_id}/original`. Nothing is written to the bucket here; the client
/// uploads the original itself, which triggers the image processor.
///
/// # Errors
///
/// - `BucketError::ConfigError` - The expiry is outside what S3 accepts
/// - `BucketError::S3Error` - Signing the request failed
#[instrument(skip(media_storage, environment))]
pub async fn create_upload(
    Extension(media_storage): Extension<Arc<dyn ObjectStore>>,
    Extension(environment): Extension<Environment>,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let upload_id = UploadId::generate();
    let expires_in = environment.presigned_url_expiry();

    let presigned_url = media_storage
        .presigned_put_url(&upload_id.original_key(), expires_in)
        .await?;

    info!(
        upload_id = %upload_id,
        expires_at = %presigned_url.expires_at.to_rfc3339(),
        "Issued upload URL"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            url: presigned_url.url,
            upload_id: upload_id.into(),
        }),
    ))
}
