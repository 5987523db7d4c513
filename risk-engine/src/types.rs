//! Core types for risk engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound of the risk score
pub const MAX_RISK_SCORE: u8 = 100;

/// Score at which an address becomes medium risk
pub const MEDIUM_RISK_THRESHOLD: u8 = 30;

/// Score at which an address becomes high risk
pub const HIGH_RISK_THRESHOLD: u8 = 60;

/// Risk score (0-100)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskScore(u8);

impl RiskScore {
    /// Create new risk score, clamped to 0-100
    pub fn new(score: u8) -> Self {
        Self(score.min(MAX_RISK_SCORE))
    }

    /// Build a score from an unbounded weight sum
    pub fn from_total(total: u32) -> Self {
        Self(total.min(MAX_RISK_SCORE as u32) as u8)
    }

    /// Get raw score
    pub fn score(&self) -> u8 {
        self.0
    }

    /// Check if high risk (>= 60)
    pub fn is_high_risk(&self) -> bool {
        self.0 >= HIGH_RISK_THRESHOLD
    }

    /// Check if medium risk (30-59)
    pub fn is_medium_risk(&self) -> bool {
        (MEDIUM_RISK_THRESHOLD..HIGH_RISK_THRESHOLD).contains(&self.0)
    }

    /// Check if low risk (< 30)
    pub fn is_low_risk(&self) -> bool {
        self.0 < MEDIUM_RISK_THRESHOLD
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, MAX_RISK_SCORE)
    }
}

/// Risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Low risk
    Low,
    /// Medium risk
    Medium,
    /// High risk
    High,
}

impl RiskLevel {
    /// Human-readable tier label
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }
}

impl From<RiskScore> for RiskLevel {
    fn from(score: RiskScore) -> Self {
        if score.is_high_risk() {
            RiskLevel::High
        } else if score.is_medium_risk() {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scoring rules, in the order they are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskRule {
    /// Country code is blacklisted
    #[serde(rename = "countryRisk")]
    Country,
    /// Address falls in a risky network range
    #[serde(rename = "networkRisk")]
    Network,
    /// Network owner looks like an anonymizing service
    #[serde(rename = "ispRisk")]
    Isp,
    /// Coordinates are in an unusual region
    #[serde(rename = "geoRisk")]
    Geo,
    /// Autonomous system number is unusually low
    #[serde(rename = "asnRisk")]
    Asn,
}

/// Follow-up text attached to a triggered rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advice {
    /// Goes to the recommendations list
    Recommendation(&'static str),
    /// Goes to the security insights list
    Insight(&'static str),
}

impl RiskRule {
    /// Fixed evaluation order. Findings and advice are emitted in this order.
    pub const EVALUATION_ORDER: [RiskRule; 5] = [
        RiskRule::Country,
        RiskRule::Network,
        RiskRule::Isp,
        RiskRule::Geo,
        RiskRule::Asn,
    ];

    /// Score contribution when the rule fires
    pub fn weight(&self) -> u8 {
        match self {
            RiskRule::Country => 40,
            RiskRule::Network => 30,
            RiskRule::Isp => 20,
            RiskRule::Geo => 10,
            RiskRule::Asn => 15,
        }
    }

    /// Stable finding key
    pub fn key(&self) -> &'static str {
        match self {
            RiskRule::Country => "countryRisk",
            RiskRule::Network => "networkRisk",
            RiskRule::Isp => "ispRisk",
            RiskRule::Geo => "geoRisk",
            RiskRule::Asn => "asnRisk",
        }
    }

    /// Status label shown next to the finding
    pub fn status(&self) -> &'static str {
        match self {
            RiskRule::Country => "High Risk",
            RiskRule::Network => "Potentially Dangerous Network",
            RiskRule::Isp => "Anonymity Risk",
            RiskRule::Geo => "Geographical Anomaly",
            RiskRule::Asn => "Potential Threat Source",
        }
    }

    /// Explanation of why the rule fired
    pub fn explanation(&self) -> &'static str {
        match self {
            RiskRule::Country => "IP address belongs to a high-risk country",
            RiskRule::Network => "IP address belongs to a suspicious network range",
            RiskRule::Isp => "IP address is using an anonymization/masking service",
            RiskRule::Geo => "IP location is in an unexpected region",
            RiskRule::Asn => "Low ASN number may indicate suspicious activity",
        }
    }

    /// Advice emitted alongside the finding, if any
    pub fn advice(&self) -> Option<Advice> {
        match self {
            RiskRule::Country => Some(Advice::Recommendation("Avoid using VPNs or proxies")),
            RiskRule::Network => Some(Advice::Recommendation(
                "Take additional network security measures",
            )),
            RiskRule::Isp => Some(Advice::Recommendation("Use your real IP address")),
            RiskRule::Geo => Some(Advice::Insight("Geographical location appears suspicious")),
            RiskRule::Asn => None,
        }
    }

    /// Build the finding for this rule
    pub fn finding(&self) -> RiskFinding {
        RiskFinding {
            key: *self,
            status: self.status().to_string(),
            explanation: self.explanation().to_string(),
            weight: self.weight(),
        }
    }
}

impl fmt::Display for RiskRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Explanation attached to one triggered rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFinding {
    /// Rule that produced the finding
    pub key: RiskRule,

    /// Status label
    pub status: String,

    /// Explanation
    pub explanation: String,

    /// Weight contributed to the total
    pub weight: u8,
}

/// Result of scoring one attribute record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    /// Clamped total score
    pub total_score: RiskScore,

    /// Tier derived from the score
    pub risk_level: RiskLevel,

    /// Findings in evaluation order
    pub findings: Vec<RiskFinding>,

    /// Recommendations in evaluation order
    pub recommendations: Vec<String>,

    /// Security insights in evaluation order
    pub security_insights: Vec<String>,
}

impl RiskAnalysis {
    /// Check whether a rule fired
    pub fn triggered(&self, rule: RiskRule) -> bool {
        self.findings.iter().any(|f| f.key == rule)
    }

    /// No rule fired
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_clamped() {
        assert_eq!(RiskScore::new(250).score(), 100);
        assert_eq!(RiskScore::from_total(115).score(), 100);
        assert_eq!(RiskScore::from_total(75).score(), 75);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(RiskLevel::from(RiskScore::new(0)), RiskLevel::Low);
        assert_eq!(RiskLevel::from(RiskScore::new(29)), RiskLevel::Low);
        assert_eq!(RiskLevel::from(RiskScore::new(30)), RiskLevel::Medium);
        assert_eq!(RiskLevel::from(RiskScore::new(59)), RiskLevel::Medium);
        assert_eq!(RiskLevel::from(RiskScore::new(60)), RiskLevel::High);
        assert_eq!(RiskLevel::from(RiskScore::new(100)), RiskLevel::High);
    }

    #[test]
    fn test_rule_keys_serialize() {
        let json = serde_json::to_string(&RiskRule::EVALUATION_ORDER).unwrap();
        assert_eq!(
            json,
            r#"["countryRisk","networkRisk","ispRisk","geoRisk","asnRisk"]"#
        );
    }

    #[test]
    fn test_geo_advice_is_insight() {
        assert!(matches!(RiskRule::Geo.advice(), Some(Advice::Insight(_))));
        assert!(RiskRule::Asn.advice().is_none());
    }
}
