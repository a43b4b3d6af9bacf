//! Helpers for reading process configuration once at startup

use std::env;

use thiserror::Error;

/// Errors raised while building configuration from the environment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty
    #[error("{0} environment variable is not set")]
    Missing(&'static str),

    /// A variable is set but cannot be used
    #[error("invalid value {value:?} for {name}: {reason}")]
    Invalid {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
        /// Why the value was rejected
        reason: String,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::Invalid`]
    #[must_use]
    pub fn invalid(name: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Reads a variable, treating an empty value as unset
#[must_use]
pub fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Reads a variable that must be present
///
/// # Errors
///
/// Returns `ConfigError::Missing` when the variable is unset or empty
pub fn required_var(name: &'static str) -> Result<String, ConfigError> {
    optional_var(name).ok_or(ConfigError::Missing(name))
}

/// Splits a comma-separated list, dropping blank entries
#[must_use]
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}
