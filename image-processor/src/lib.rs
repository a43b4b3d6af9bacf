//! Fans an uploaded original out into resized image variants

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

/// Lambda entry point for S3 object-created events
pub mod handler;

/// Concurrent per-variant resize and upload
pub mod processor;

/// Resize, greyscale and encode operations
pub mod transform;

/// Configuration and error types
pub mod types;

/// Variant set and derivative key layout
pub mod variants;
