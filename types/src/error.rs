//! Configuration errors shared across crates.

use thiserror::Error;

/// Errors raised while loading or validating [`crate::TokenParams`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid parameter {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
