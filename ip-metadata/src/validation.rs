//! Address format checks

use crate::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;

fn ipv4_regex() -> &'static Regex {
    static IPV4: OnceLock<Regex> = OnceLock::new();
    IPV4.get_or_init(|| Regex::new(r"^(\d{1,3}\.){3}\d{1,3}$").expect("IPv4 pattern is valid"))
}

/// Check that input looks like a dotted-decimal IPv4 address.
///
/// This is a syntax check only: octet values are not range-checked.
/// Returns the trimmed address.
pub fn validate_ipv4(input: &str) -> Result<String> {
    let ip = input.trim();
    if ipv4_regex().is_match(ip) {
        Ok(ip.to_string())
    } else {
        Err(Error::InvalidAddress(ip.to_string()))
    }
}
