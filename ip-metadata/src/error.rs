//! Error types for metadata lookups

use thiserror::Error;

/// Result type for metadata operations
pub type Result<T> = std::result::Result<T, Error>;

/// Metadata lookup errors
#[derive(Error, Debug)]
pub enum Error {
    /// Input is not a dotted-decimal IPv4 address
    #[error("Invalid IP address: {0}")]
    InvalidAddress(String),

    /// Provider answered with a non-success status
    #[error("Provider {provider} returned HTTP {status}")]
    Api {
        /// Provider name
        provider: String,
        /// HTTP status code
        status: u16,
    },

    /// Provider answered but flagged the lookup as failed
    #[error("Provider {provider} rejected lookup: {reason}")]
    Rejected {
        /// Provider name
        provider: String,
        /// Reason given by the provider
        reason: String,
    },

    /// Response carried no address field
    #[error("Provider {provider} returned no address")]
    MissingAddress {
        /// Provider name
        provider: String,
    },

    /// Attempt exceeded its time budget
    #[error("Provider {provider} timed out after {millis}ms")]
    Timeout {
        /// Provider name
        provider: String,
        /// Budget in milliseconds
        millis: u64,
    },

    /// Every provider failed
    #[error("No metadata available after {attempts} attempts")]
    NoData {
        /// Providers tried
        attempts: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
