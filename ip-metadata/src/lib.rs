//! IP metadata acquisition
//!
//! Fetches the attribute bundle for an address from one of several
//! providers, tried in order with a per-attempt timeout, and normalizes it
//! into a [`risk_engine::AttributeRecord`].

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod chain;
pub mod config;
pub mod error;
pub mod provider;
pub mod validation;

pub use chain::{Lookup, ProviderChain};
pub use config::{GatewayConfig, ProviderConfig};
pub use error::{Error, Result};
pub use provider::{HttpProvider, MetadataProvider};
pub use validation::validate_ipv4;
