//! Error types for risk engine
//!
//! Scoring itself is infallible; only rule-table loading can fail.

use thiserror::Error;

/// Risk engine error
#[derive(Debug, Error)]
pub enum Error {
    /// Network range could not be parsed
    #[error("Invalid network range: {0}")]
    InvalidRange(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Rule table file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rule table file is not valid TOML
    #[error("Failed to parse rule table: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
