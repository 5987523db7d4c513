//! Risk Engine for IP address screening
//!
//! Turns provider metadata about an IP address (country, network owner,
//! coordinates, ASN) into a bounded score, a risk tier and ordered findings.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod record;
pub mod rules;
pub mod scoring;
pub mod types;

pub use error::{Error, Result};
pub use record::AttributeRecord;
pub use rules::{NetworkRange, RiskRuleTable};
pub use scoring::RiskScorer;
pub use types::*;
