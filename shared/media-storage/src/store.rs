//! S3-based object storage operations

use std::sync::Arc;
use std::time::Duration;

use aws_sdk_s3::{presigning::PresigningConfig, primitives::ByteStream, Client as S3Client};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{debug, error};

use crate::error::{BucketError, BucketResult};

/// Presigned URL with expiration information
#[derive(Debug, Clone)]
pub struct PresignedUrl {
    /// The presigned URL for PUT operations
    pub url: String,
    /// UTC timestamp when the URL expires
    pub expires_at: DateTime<Utc>,
}

/// Operations the issuer and the processor need from object storage
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Signs a PUT request for `key`, valid for `expires_in`
    async fn presigned_put_url(&self, key: &str, expires_in: Duration)
        -> BucketResult<PresignedUrl>;

    /// Reads a whole object into memory
    async fn get_object(&self, key: &str) -> BucketResult<Bytes>;

    /// Writes `body` to `key`, replacing any existing object
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> BucketResult<()>;
}

/// Object store backed by a single S3 bucket
pub struct MediaStorage {
    s3_client: Arc<S3Client>,
    bucket_name: String,
}

impl MediaStorage {
    /// Creates a new media storage client
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - Bucket holding originals and derivatives
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>, bucket_name: String) -> Self {
        Self {
            s3_client,
            bucket_name,
        }
    }
}

#[async_trait::async_trait]
impl ObjectStore for MediaStorage {
    /// Generates a presigned URL for PUT operations
    ///
    /// Signing happens locally; no request reaches S3.
    ///
    /// # Errors
    ///
    /// Returns `BucketError::ConfigError` if presigning config creation fails
    /// Returns `BucketError::S3Error` if presigned URL generation fails
    async fn presigned_put_url(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> BucketResult<PresignedUrl> {
        debug!(key = %key, expires_in_secs = expires_in.as_secs(), "Generating presigned URL");

        let presigned_config = PresigningConfig::expires_in(expires_in).map_err(|e| {
            BucketError::ConfigError(format!("Failed to create presigning config: {e}"))
        })?;

        let presigned_request = self
            .s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .presigned(presigned_config)
            .await
            .map_err(|e| BucketError::S3Error(format!("Failed to generate presigned URL: {e}")))?;

        Ok(PresignedUrl {
            url: presigned_request.uri().to_string(),
            expires_at: Utc::now() + expires_in,
        })
    }

    /// Downloads an object and buffers its body
    ///
    /// # Errors
    ///
    /// Returns `BucketError::NotFound` if the key does not exist
    /// Returns `BucketError::UpstreamError` for 5xx errors
    /// Returns `BucketError::BodyError` if the body stream breaks mid-read
    async fn get_object(&self, key: &str) -> BucketResult<Bytes> {
        debug!(key = %key, "Fetching object");

        let output = self
            .s3_client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                error!(key = %key, error = %e, "Failed to fetch object");
                BucketError::from(e)
            })?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| BucketError::BodyError(e.to_string()))?
            .into_bytes();

        debug!(key = %key, size = body.len(), "Fetched object");
        Ok(body)
    }

    /// Uploads an object, overwriting whatever is stored under `key`
    ///
    /// # Errors
    ///
    /// Returns `BucketError::S3Error` for S3 service errors
    /// Returns `BucketError::UpstreamError` for 5xx errors
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> BucketResult<()> {
        let size = body.len();

        self.s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                error!(key = %key, error = %e, "Failed to upload object");
                BucketError::from(e)
            })?;

        debug!(key = %key, size, content_type, "Uploaded object");
        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! In-memory object store that records every call

    use std::collections::{HashMap, HashSet};
    use std::sync::{Mutex, MutexGuard, PoisonError};
    use std::time::Duration;

    use bytes::Bytes;
    use chrono::Utc;

    use super::{ObjectStore, PresignedUrl};
    use crate::error::{BucketError, BucketResult};

    /// A stored object and its content type
    #[derive(Debug, Clone)]
    pub struct StoredObject {
        /// Object body
        pub body: Bytes,
        /// Content type given on upload
        pub content_type: String,
    }

    /// Object store that keeps objects in a map
    #[derive(Default)]
    pub struct MockObjectStore {
        objects: Mutex<HashMap<String, StoredObject>>,
        failing_puts: HashSet<String>,
        get_attempts: Mutex<Vec<String>>,
        put_attempts: Mutex<Vec<String>>,
    }

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    impl MockObjectStore {
        /// Creates an empty store
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Seeds an object
        #[must_use]
        pub fn with_object(self, key: &str, body: impl Into<Bytes>) -> Self {
            lock(&self.objects).insert(
                key.to_string(),
                StoredObject {
                    body: body.into(),
                    content_type: "application/octet-stream".to_string(),
                },
            );
            self
        }

        /// Makes every upload to `key` fail with an upstream error
        #[must_use]
        pub fn with_failing_put(mut self, key: &str) -> Self {
            self.failing_puts.insert(key.to_string());
            self
        }

        /// Keys passed to `get_object`, in call order
        #[must_use]
        pub fn get_attempts(&self) -> Vec<String> {
            lock(&self.get_attempts).clone()
        }

        /// Keys passed to `put_object`, in call order, failed ones included
        #[must_use]
        pub fn put_attempts(&self) -> Vec<String> {
            lock(&self.put_attempts).clone()
        }

        /// Returns a stored object
        #[must_use]
        pub fn object(&self, key: &str) -> Option<StoredObject> {
            lock(&self.objects).get(key).cloned()
        }
    }

    #[async_trait::async_trait]
    impl ObjectStore for MockObjectStore {
        async fn presigned_put_url(
            &self,
            key: &str,
            expires_in: Duration,
        ) -> BucketResult<PresignedUrl> {
            Ok(PresignedUrl {
                url: format!(
                    "https://mock-bucket.s3.amazonaws.com/{key}?X-Amz-Expires={}",
                    expires_in.as_secs()
                ),
                expires_at: Utc::now() + expires_in,
            })
        }

        async fn get_object(&self, key: &str) -> BucketResult<Bytes> {
            lock(&self.get_attempts).push(key.to_string());
            lock(&self.objects)
                .get(key)
                .map(|object| object.body.clone())
                .ok_or_else(|| BucketError::NotFound(key.to_string()))
        }

        async fn put_object(
            &self,
            key: &str,
            body: Bytes,
            content_type: &str,
        ) -> BucketResult<()> {
            lock(&self.put_attempts).push(key.to_string());

            if self.failing_puts.contains(key) {
                return Err(BucketError::UpstreamError(format!(
                    "injected failure for {key}"
                )));
            }

            lock(&self.objects).insert(
                key.to_string(),
                StoredObject {
                    body,
                    content_type: content_type.to_string(),
                },
            );
            Ok(())
        }
    }
}
