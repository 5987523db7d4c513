//! Risk report assembled from a lookup and its analysis

use chrono::{DateTime, Utc};
use ip_metadata::Lookup;
use risk_engine::{AttributeRecord, RiskAnalysis, RiskScorer};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything a renderer needs for one address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    /// Report ID
    pub report_id: Uuid,

    /// Provider that supplied the metadata, if known
    pub provider: Option<String>,

    /// Normalized attributes
    pub record: AttributeRecord,

    /// Scoring result
    pub analysis: RiskAnalysis,

    /// Generation timestamp
    pub generated_at: DateTime<Utc>,
}

impl RiskReport {
    /// Score a record and wrap the result
    pub fn build(scorer: &RiskScorer, record: AttributeRecord, provider: Option<String>) -> Self {
        let analysis = scorer.analyze(&record);
        Self {
            report_id: Uuid::new_v4(),
            provider,
            record,
            analysis,
            generated_at: Utc::now(),
        }
    }

    /// Score a provider lookup
    pub fn from_lookup(scorer: &RiskScorer, lookup: Lookup) -> Self {
        Self::build(scorer, lookup.record, Some(lookup.provider))
    }
}
