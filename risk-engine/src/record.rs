//! Attribute records and provider field aliasing
//!
//! Providers disagree on field names (`country_code` vs `countryCode`, `org`
//! vs `isp`, ...). [`AttributeRecord::from_json`] folds every known spelling
//! into one canonical record before any rule runs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const IP_FIELDS: &[&str] = &["ip", "query"];
const COUNTRY_CODE_FIELDS: &[&str] = &["country_code", "countryCode"];
const ORG_FIELDS: &[&str] = &["org", "isp"];
const COUNTRY_NAME_FIELDS: &[&str] = &["country_name", "country"];
const REGION_FIELDS: &[&str] = &["region", "region_name", "regionName"];
const CITY_FIELDS: &[&str] = &["city"];
const LATITUDE_FIELDS: &[&str] = &["latitude", "lat"];
const LONGITUDE_FIELDS: &[&str] = &["longitude", "lon"];
const ASN_FIELDS: &[&str] = &["asn", "as"];

/// Normalized facts about one IP address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRecord {
    /// Dotted-decimal IPv4 address
    pub ip: Option<String>,

    /// Two-letter country code
    pub country_code: Option<String>,

    /// Network owner / operator
    pub org: Option<String>,

    /// Latitude in degrees, as reported
    pub latitude: Option<String>,

    /// Longitude in degrees, as reported
    pub longitude: Option<String>,

    /// Autonomous system number, as reported
    pub asn: Option<String>,

    /// Country name (display only)
    pub country_name: Option<String>,

    /// Region (display only)
    pub region: Option<String>,

    /// City (display only)
    pub city: Option<String>,
}

impl AttributeRecord {
    /// Create a record carrying only an address
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: Some(ip.into()),
            ..Default::default()
        }
    }

    /// Normalize a provider response into a canonical record
    pub fn from_json(value: &Value) -> Self {
        Self {
            ip: pick(value, IP_FIELDS),
            country_code: pick(value, COUNTRY_CODE_FIELDS),
            org: pick(value, ORG_FIELDS),
            latitude: pick(value, LATITUDE_FIELDS),
            longitude: pick(value, LONGITUDE_FIELDS),
            asn: pick(value, ASN_FIELDS),
            country_name: pick(value, COUNTRY_NAME_FIELDS),
            region: pick(value, REGION_FIELDS),
            city: pick(value, CITY_FIELDS),
        }
    }

    /// Set country code
    pub fn with_country_code(mut self, code: impl Into<String>) -> Self {
        self.country_code = Some(code.into());
        self
    }

    /// Set organization
    pub fn with_org(mut self, org: impl Into<String>) -> Self {
        self.org = Some(org.into());
        self
    }

    /// Set coordinates
    pub fn with_coordinates(mut self, latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        self.latitude = Some(latitude.into());
        self.longitude = Some(longitude.into());
        self
    }

    /// Set autonomous system number
    pub fn with_asn(mut self, asn: impl Into<String>) -> Self {
        self.asn = Some(asn.into());
        self
    }

    /// Both coordinates, if present and numeric
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = parse_degrees(self.latitude.as_deref()?)?;
        let lon = parse_degrees(self.longitude.as_deref()?)?;
        Some((lat, lon))
    }

    /// ASN as an integer, if present and numeric
    pub fn asn_number(&self) -> Option<i64> {
        self.asn.as_deref()?.trim().parse().ok()
    }
}

fn parse_degrees(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// First alias with a usable value wins
fn pick(value: &Value, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|name| match value.get(*name)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
