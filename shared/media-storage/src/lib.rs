//! Shared storage layer for the upload issuer and the image processor

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

/// Startup configuration helpers
pub mod config;

/// Deployment stage and AWS client configuration
pub mod environment;

/// Storage error types
pub mod error;

/// Upload identifiers and object key layout
pub mod keys;

/// Object store abstraction and its S3 implementation
pub mod store;

pub use config::ConfigError;
pub use environment::Environment;
pub use error::{BucketError, BucketResult};
pub use keys::UploadId;
pub use store::{MediaStorage, ObjectStore, PresignedUrl};
