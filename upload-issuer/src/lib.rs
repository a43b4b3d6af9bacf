//! Issues presigned upload URLs for original images

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

/// CORS response decorator
pub mod cors;

/// HTTP routes
pub mod routes;

/// Router assembly and process startup
pub mod server;

/// Configuration and error types
pub mod types;
