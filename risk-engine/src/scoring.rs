//! Risk scoring engine

use crate::{Advice, AttributeRecord, RiskAnalysis, RiskLevel, RiskRule, RiskRuleTable, RiskScore};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Latitude beyond which a location is unusual
pub const GEO_LATITUDE_LIMIT: f64 = 60.0;

/// Longitude beyond which a location is unusual
pub const GEO_LONGITUDE_LIMIT: f64 = 150.0;

/// Autonomous system numbers below this are suspicious
pub const LOW_ASN_LIMIT: i64 = 1000;

/// Stateless risk scorer over a shared, read-only rule table
#[derive(Debug, Clone)]
pub struct RiskScorer {
    rules: Arc<RiskRuleTable>,
}

impl RiskScorer {
    /// Create new risk scorer
    pub fn new(rules: Arc<RiskRuleTable>) -> Self {
        Self { rules }
    }

    /// Rule table in use
    pub fn rules(&self) -> &RiskRuleTable {
        &self.rules
    }

    /// Score a normalized record.
    ///
    /// Missing or unparseable fields only disable the rule that reads them.
    pub fn analyze(&self, record: &AttributeRecord) -> RiskAnalysis {
        let mut total = 0u32;
        let mut findings = Vec::new();
        let mut recommendations = Vec::new();
        let mut security_insights = Vec::new();

        for rule in RiskRule::EVALUATION_ORDER {
            if !self.triggers(rule, record) {
                continue;
            }

            debug!(rule = rule.key(), weight = rule.weight(), "risk rule triggered");
            total += u32::from(rule.weight());
            findings.push(rule.finding());

            match rule.advice() {
                Some(Advice::Recommendation(text)) => recommendations.push(text.to_string()),
                Some(Advice::Insight(text)) => security_insights.push(text.to_string()),
                None => {}
            }
        }

        let total_score = RiskScore::from_total(total);
        let risk_level = RiskLevel::from(total_score);

        info!(
            ip = record.ip.as_deref().unwrap_or("-"),
            score = total_score.score(),
            level = risk_level.label(),
            findings = findings.len(),
            "risk analysis complete"
        );

        RiskAnalysis {
            total_score,
            risk_level,
            findings,
            recommendations,
            security_insights,
        }
    }

    /// Normalize a raw provider response, then score it
    pub fn analyze_json(&self, value: &Value) -> RiskAnalysis {
        self.analyze(&AttributeRecord::from_json(value))
    }

    fn triggers(&self, rule: RiskRule, record: &AttributeRecord) -> bool {
        match rule {
            RiskRule::Country => record
                .country_code
                .as_deref()
                .is_some_and(|code| self.rules.is_blacklisted_country(code)),
            RiskRule::Network => record
                .ip
                .as_deref()
                .and_then(|ip| self.rules.matching_range(ip))
                .is_some(),
            RiskRule::Isp => record
                .org
                .as_deref()
                .and_then(|org| self.rules.matching_org_term(org))
                .is_some(),
            RiskRule::Geo => record.coordinates().is_some_and(|(lat, lon)| {
                lat.abs() > GEO_LATITUDE_LIMIT || lon.abs() > GEO_LONGITUDE_LIMIT
            }),
            RiskRule::Asn => record.asn_number().is_some_and(|asn| asn < LOW_ASN_LIMIT),
        }
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new(Arc::new(RiskRuleTable::default()))
    }
}
