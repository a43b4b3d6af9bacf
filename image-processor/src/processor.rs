//! Fans one original out into every configured derivative
//!
//! The original is fetched and decoded once. Each variant is then rendered on
//! the blocking pool and uploaded independently; all of them run to
//! completion even when one fails, and the first failure in variant order is
//! what the invocation reports.

use std::sync::Arc;

use bytes::Bytes;
use futures::future::join_all;
use image::DynamicImage;
use media_storage::{ObjectStore, UploadId};
use tracing::{debug, error, info, instrument, warn};

use crate::transform;
use crate::types::{ProcessorConfig, ProcessorResult};
use crate::variants::VariantSpec;

/// Resizes originals into their derivatives
pub struct VariantProcessor {
    media_storage: Arc<dyn ObjectStore>,
    config: Arc<ProcessorConfig>,
}

impl VariantProcessor {
    #[must_use]
    pub fn new(media_storage: Arc<dyn ObjectStore>, config: ProcessorConfig) -> Self {
        Self {
            media_storage,
            config: Arc::new(config),
        }
    }

    /// Processes every key of one notification concurrently
    ///
    /// # Errors
    ///
    /// Returns the first error in key order once every key has been attempted
    pub async fn process_batch(&self, keys: &[String]) -> ProcessorResult<usize> {
        let results = join_all(keys.iter().map(|key| self.process_key(key))).await;

        results
            .into_iter()
            .try_fold(0, |written, result| result.map(|count| written + count))
    }

    /// Produces every derivative of the original stored at `key`
    ///
    /// Keys without an upload prefix are skipped and report zero writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the original cannot be read or decoded, or if any
    /// derivative fails to render or upload
    #[instrument(skip(self))]
    pub async fn process_key(&self, key: &str) -> ProcessorResult<usize> {
        let Some(upload_id) = UploadId::from_object_key(key) else {
            warn!("Object key has no upload prefix, skipping");
            return Ok(0);
        };

        let variants = self.config.variants();
        if variants.is_empty() {
            warn!("No valid sizes configured, nothing to produce");
            return Ok(0);
        }

        let body = self.media_storage.get_object(key).await?;
        let original = Arc::new(
            tokio::task::spawn_blocking(move || transform::decode_image(&body)).await??,
        );
        debug!(
            width = original.width(),
            height = original.height(),
            variants = variants.len(),
            "Decoded original"
        );

        let results = join_all(
            variants
                .iter()
                .map(|variant| self.write_variant(&upload_id, Arc::clone(&original), variant)),
        )
        .await;

        let total = results.len();
        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            error!(upload_id = %upload_id, failed, total, "Some variants were not written");
        } else {
            info!(upload_id = %upload_id, total, "All variants written");
        }

        results.into_iter().collect::<ProcessorResult<Vec<()>>>()?;
        Ok(total)
    }

    async fn write_variant(
        &self,
        upload_id: &UploadId,
        original: Arc<DynamicImage>,
        variant: &VariantSpec,
    ) -> ProcessorResult<()> {
        let format = self.config.format;
        let key = variant.object_key(upload_id, format);

        let rendered = {
            let variant = variant.clone();
            tokio::task::spawn_blocking(move || {
                transform::render_variant(&original, &variant, format)
            })
            .await?
        }
        .inspect_err(|e| error!(key = %key, error = %e, "Failed to render variant"))?;

        self.media_storage
            .put_object(&key, Bytes::from(rendered), format.content_type())
            .await
            .inspect_err(|e| error!(key = %key, error = %e, "Failed to upload variant"))?;

        debug!(key = %key, "Variant written");
        Ok(())
    }
}
