mod config;
mod error;

pub use config::ProcessorConfig;
pub use error::{ProcessorError, ProcessorResult, TransformError};
