use media_storage::BucketError;
use thiserror::Error;

/// Result type for processor operations
pub type ProcessorResult<T> = Result<T, ProcessorError>;

/// Errors that fail a processor invocation
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// Fetching the original or uploading a derivative failed
    #[error("storage error: {0}")]
    Storage(#[from] BucketError),

    /// The original could not be decoded or a variant could not be encoded
    #[error("transform error: {0}")]
    Transform(#[from] TransformError),

    /// A blocking transform task panicked or was cancelled
    #[error("transform task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Image codec errors
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("decode failed: {0}")]
    DecodeFailed(String),

    #[error("{format} encode failed: {reason}")]
    EncodeFailed { format: &'static str, reason: String },

    #[error("resizing to {width}x{height} exceeds the pixel limit")]
    ResolutionTooLarge { width: u32, height: u32 },
}
