//! Rule tables: blacklisted countries, risky network ranges and suspicious
//! organization terms.
//!
//! Network ranges are matched on whole dotted components, not bits. The
//! prefix length is divided by eight to get the number of leading octets
//! compared, so `45.144.0.0/14` matches every `45.x.y.z` and
//! `185.153.196.0/22` matches every `185.153.x.y`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Default blacklisted country codes
pub const DEFAULT_BLACKLISTED_COUNTRIES: &[&str] = &["RU", "CN", "IR", "KP", "SY", "IQ", "VN", "BY"];

/// Default risky network ranges
pub const DEFAULT_RISKY_RANGES: &[&str] = &[
    "5.188.0.0/16",
    "45.144.0.0/14",
    "85.113.0.0/16",
    "185.153.196.0/22",
    "192.168.0.0/16",
    "10.0.0.0/8",
];

/// Default suspicious organization terms
pub const DEFAULT_SUSPICIOUS_ORG_TERMS: &[&str] = &[
    "Tor",
    "VPN",
    "Proxy",
    "Hosting",
    "Cloud Provider",
    "Anonymizer",
    "Anonymous",
];

/// Network address plus prefix length, matched octet by octet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NetworkRange {
    octets: [String; 4],
    prefix_len: u8,
}

impl NetworkRange {
    /// Prefix length as written
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Number of leading octets compared
    pub fn prefix_octets(&self) -> usize {
        (self.prefix_len / 8) as usize
    }

    /// Network address
    pub fn network(&self) -> String {
        self.octets.join(".")
    }

    /// Check whether the address starts with this range's leading octets
    pub fn matches(&self, ip: &str) -> bool {
        let n = self.prefix_octets();
        let ip_octets: Vec<&str> = ip.trim().split('.').collect();
        ip_octets.len() >= n
            && ip_octets[..n]
                .iter()
                .zip(&self.octets[..n])
                .all(|(a, b)| *a == b.as_str())
    }
}

impl FromStr for NetworkRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (network, prefix) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| Error::InvalidRange(format!("{}: missing prefix length", s)))?;

        let prefix_len: u8 = prefix
            .parse()
            .map_err(|_| Error::InvalidRange(format!("{}: bad prefix length", s)))?;
        if !(8..=32).contains(&prefix_len) {
            return Err(Error::InvalidRange(format!(
                "{}: prefix length must be between 8 and 32",
                s
            )));
        }

        let parts: Vec<&str> = network.split('.').collect();
        if parts.len() != 4 || parts.iter().any(|p| p.parse::<u8>().is_err()) {
            return Err(Error::InvalidRange(format!("{}: bad network address", s)));
        }

        Ok(Self {
            octets: [
                parts[0].to_string(),
                parts[1].to_string(),
                parts[2].to_string(),
                parts[3].to_string(),
            ],
            prefix_len,
        })
    }
}

impl TryFrom<String> for NetworkRange {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<NetworkRange> for String {
    fn from(range: NetworkRange) -> Self {
        range.to_string()
    }
}

impl fmt::Display for NetworkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix_len)
    }
}

/// On-disk rule table. Omitted keys keep their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleTableFile {
    blacklisted_countries: Option<Vec<String>>,
    risky_ranges: Option<Vec<NetworkRange>>,
    suspicious_org_terms: Option<Vec<String>>,
}

/// Immutable rule configuration shared by every scoring call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskRuleTable {
    blacklisted_countries: BTreeSet<String>,
    risky_ranges: Vec<NetworkRange>,
    suspicious_org_terms: Vec<String>,
}

impl RiskRuleTable {
    /// Build a table from explicit lists
    pub fn new<C, T>(countries: C, ranges: Vec<NetworkRange>, org_terms: T) -> Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        Self {
            blacklisted_countries: normalize_countries(countries),
            risky_ranges: ranges,
            suspicious_org_terms: normalize_terms(org_terms),
        }
    }

    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: RuleTableFile = toml::from_str(content)?;
        let defaults = Self::default();

        let table = Self {
            blacklisted_countries: file
                .blacklisted_countries
                .map(normalize_countries)
                .unwrap_or(defaults.blacklisted_countries),
            risky_ranges: file.risky_ranges.unwrap_or(defaults.risky_ranges),
            suspicious_org_terms: file
                .suspicious_org_terms
                .map(normalize_terms)
                .unwrap_or(defaults.suspicious_org_terms),
        };

        if table.is_empty() {
            return Err(Error::InvalidConfig("rule table has no rules".to_string()));
        }

        Ok(table)
    }

    /// Check whether a country code is blacklisted (case-insensitive)
    pub fn is_blacklisted_country(&self, code: &str) -> bool {
        self.blacklisted_countries.contains(&code.trim().to_uppercase())
    }

    /// First configured range the address falls in
    pub fn matching_range(&self, ip: &str) -> Option<&NetworkRange> {
        self.risky_ranges.iter().find(|r| r.matches(ip))
    }

    /// First suspicious term contained in the organization name
    pub fn matching_org_term(&self, org: &str) -> Option<&str> {
        let org = org.to_lowercase();
        self.suspicious_org_terms
            .iter()
            .find(|term| org.contains(term.as_str()))
            .map(String::as_str)
    }

    /// Blacklisted countries
    pub fn blacklisted_countries(&self) -> impl Iterator<Item = &str> {
        self.blacklisted_countries.iter().map(String::as_str)
    }

    /// Risky ranges in configured order
    pub fn risky_ranges(&self) -> &[NetworkRange] {
        &self.risky_ranges
    }

    /// Lower-cased suspicious terms
    pub fn suspicious_org_terms(&self) -> &[String] {
        &self.suspicious_org_terms
    }

    fn is_empty(&self) -> bool {
        self.blacklisted_countries.is_empty()
            && self.risky_ranges.is_empty()
            && self.suspicious_org_terms.is_empty()
    }
}

impl Default for RiskRuleTable {
    fn default() -> Self {
        let ranges = DEFAULT_RISKY_RANGES
            .iter()
            .filter_map(|r| r.parse().ok())
            .collect();
        Self::new(
            DEFAULT_BLACKLISTED_COUNTRIES.iter().copied(),
            ranges,
            DEFAULT_SUSPICIOUS_ORG_TERMS.iter().copied(),
        )
    }
}

fn normalize_countries<C>(countries: C) -> BTreeSet<String>
where
    C: IntoIterator,
    C::Item: AsRef<str>,
{
    countries
        .into_iter()
        .map(|c| c.as_ref().trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .collect()
}

fn normalize_terms<T>(terms: T) -> Vec<String>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    terms
        .into_iter()
        .map(|t| t.as_ref().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}
