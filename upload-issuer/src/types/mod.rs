mod config;
mod error;

pub use config::{IssuerConfig, IssuerVariant};
pub use error::AppError;
