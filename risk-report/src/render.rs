//! Report rendering: HTML fragment, plain text and JSON

use crate::RiskReport;
use risk_engine::RiskLevel;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shown in place of absent provider fields
pub const NO_INFORMATION: &str = "No Information";

/// Rendering error
#[derive(Error, Debug)]
pub enum RenderError {
    /// JSON serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type
pub type Result<T> = std::result::Result<T, RenderError>;

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// HTML fragment
    Html,
    /// Plain text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl ReportFormat {
    /// MIME type of the rendered output
    pub fn mime_type(&self) -> &str {
        match self {
            ReportFormat::Html => "text/html",
            ReportFormat::Text => "text/plain",
            ReportFormat::Json => "application/json",
        }
    }
}

/// CSS class for a tier
pub fn tier_class(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "low-risk",
        RiskLevel::Medium => "medium-risk",
        RiskLevel::High => "high-risk",
    }
}

/// Font Awesome icon for a tier
pub fn tier_icon(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "fa-shield",
        RiskLevel::Medium => "fa-exclamation-triangle",
        RiskLevel::High => "fa-skull-crossbones",
    }
}

/// Escape untrusted text for HTML; absent or empty text becomes "No Information"
pub fn escape_html(text: Option<&str>) -> String {
    match text {
        Some(s) if !s.is_empty() => {
            let mut escaped = String::with_capacity(s.len());
            for c in s.chars() {
                match c {
                    '&' => escaped.push_str("&amp;"),
                    '<' => escaped.push_str("&lt;"),
                    '>' => escaped.push_str("&gt;"),
                    '"' => escaped.push_str("&quot;"),
                    '\'' => escaped.push_str("&#039;"),
                    _ => escaped.push(c),
                }
            }
            escaped
        }
        _ => NO_INFORMATION.to_string(),
    }
}

/// Render in the requested format
pub fn render(report: &RiskReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Html => Ok(render_html(report)),
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

/// Render an HTML fragment
pub fn render_html(report: &RiskReport) -> String {
    let analysis = &report.analysis;
    let class = tier_class(analysis.risk_level);
    let mut content = String::new();

    content.push_str("<div class=\"info\">\n");
    for (icon, label, value) in info_rows(report) {
        content.push_str(&format!(
            "    <p><i class=\"fas {}\"></i><strong>{}:</strong> {}</p>\n",
            icon,
            label,
            escape_html(value)
        ));
    }
    content.push_str("</div>\n");

    content.push_str(&format!("<div class=\"risk-analysis {}\">\n", class));
    content.push_str(&format!(
        "    <h3><i class=\"fas {}\"></i> Security Risk Analysis</h3>\n",
        tier_icon(analysis.risk_level)
    ));
    content.push_str(&format!(
        "    <div class=\"risk-score\">Risk Score: {}</div>\n",
        analysis.total_score
    ));
    content.push_str(&format!(
        "    <p><strong>Risk Level:</strong> {}</p>\n",
        analysis.risk_level.label()
    ));

    for finding in &analysis.findings {
        content.push_str(&format!(
            "    <p><strong>{}:</strong> {}</p>\n",
            escape_html(Some(&finding.status)),
            escape_html(Some(&finding.explanation))
        ));
    }

    push_html_section(&mut content, "recommendations", "Recommendations", &analysis.recommendations);
    push_html_section(
        &mut content,
        "security-insights",
        "Security Insights",
        &analysis.security_insights,
    );

    content.push_str("</div>\n");
    content
}

/// Render plain text for terminals
pub fn render_text(report: &RiskReport) -> String {
    let analysis = &report.analysis;
    let mut content = String::new();

    for (_, label, value) in info_rows(report) {
        content.push_str(&format!("{:<11} {}\n", format!("{}:", label), value.unwrap_or(NO_INFORMATION)));
    }
    if let Some(provider) = &report.provider {
        content.push_str(&format!("{:<11} {}\n", "Source:", provider));
    }
    content.push('\n');

    content.push_str("SECURITY RISK ANALYSIS\n");
    content.push_str(&format!("Risk Score: {}\n", analysis.total_score));
    content.push_str(&format!("Risk Level: {}\n", analysis.risk_level.label()));
    for finding in &analysis.findings {
        content.push_str(&format!("{}: {}\n", finding.status, finding.explanation));
    }

    push_text_section(&mut content, "Recommendations", &analysis.recommendations);
    push_text_section(&mut content, "Security Insights", &analysis.security_insights);

    content
}

/// Render a user-facing error message
pub fn render_error(message: &str, format: ReportFormat) -> String {
    match format {
        ReportFormat::Html => format!("<p class=\"error\">{}</p>\n", escape_html(Some(message))),
        ReportFormat::Text => format!("Error: {}\n", message),
        ReportFormat::Json => format!("{}\n", serde_json::json!({ "error": message })),
    }
}

fn info_rows(report: &RiskReport) -> [(&'static str, &'static str, Option<&str>); 5] {
    let record = &report.record;
    [
        ("fa-map-pin", "IP Address", record.ip.as_deref()),
        ("fa-flag", "Country", record.country_name.as_deref()),
        ("fa-map-marker-alt", "Region", record.region.as_deref()),
        ("fa-building", "City", record.city.as_deref()),
        ("fa-network-wired", "ISP", record.org.as_deref()),
    ]
}

// Sections are omitted entirely when empty
fn push_html_section(content: &mut String, class: &str, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    content.push_str(&format!("    <div class=\"{}\">\n", class));
    content.push_str(&format!("        <h4>{}:</h4>\n", title));
    for item in items {
        content.push_str(&format!("        <p>• {}</p>\n", escape_html(Some(item))));
    }
    content.push_str("    </div>\n");
}

fn push_text_section(content: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    content.push_str(&format!("\n{}:\n", title));
    for item in items {
        content.push_str(&format!("  • {}\n", item));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_engine::{AttributeRecord, RiskScorer};

    fn report(record: AttributeRecord) -> RiskReport {
        RiskReport::build(&RiskScorer::default(), record, Some("ipapi".to_string()))
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(Some(r#"<script>alert("x") & 'y'</script>"#)),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#039;y&#039;&lt;/script&gt;"
        );
        assert_eq!(escape_html(None), NO_INFORMATION);
        assert_eq!(escape_html(Some("")), NO_INFORMATION);
    }

    #[test]
    fn test_tier_presentation() {
        assert_eq!(tier_class(RiskLevel::Low), "low-risk");
        assert_eq!(tier_icon(RiskLevel::Medium), "fa-exclamation-triangle");
        assert_eq!(tier_icon(RiskLevel::High), "fa-skull-crossbones");
    }

    #[test]
    fn test_html_high_risk() {
        let html = render_html(&report(
            AttributeRecord::new("8.8.8.8")
                .with_country_code("CN")
                .with_org("Example Hosting <Provider>")
                .with_asn("500"),
        ));

        assert!(html.contains("risk-analysis high-risk"));
        assert!(html.contains("Risk Score: 75/100"));
        assert!(html.contains("<strong>Risk Level:</strong> High Risk"));
        assert!(html.contains("Example Hosting &lt;Provider&gt;"));
        assert!(html.contains("<h4>Recommendations:</h4>"));
        assert!(!html.contains("Security Insights"));

        let country = html.find("IP address belongs to a high-risk country").unwrap();
        let isp = html.find("anonymization/masking service").unwrap();
        let asn = html.find("Low ASN number").unwrap();
        assert!(country < isp && isp < asn);
    }

    #[test]
    fn test_html_low_risk_omits_sections() {
        let html = render_html(&report(AttributeRecord::new("8.8.8.8")));

        assert!(html.contains("risk-analysis low-risk"));
        assert!(html.contains("fa-shield"));
        assert!(html.contains("<strong>Country:</strong> No Information"));
        assert!(!html.contains("Recommendations"));
        assert!(!html.contains("Security Insights"));
    }

    #[test]
    fn test_text_with_insight() {
        let text = render_text(&report(
            AttributeRecord::new("8.8.8.8").with_coordinates("78.2", "15.6"),
        ));

        assert!(text.contains("Risk Score: 10/100"));
        assert!(text.contains("Risk Level: Low Risk"));
        assert!(text.contains("Security Insights:\n  • Geographical location appears suspicious"));
        assert!(text.contains("Source:     ipapi"));
        assert!(!text.contains("Recommendations"));
    }

    #[test]
    fn test_json_output() {
        let json = render(&report(AttributeRecord::new("10.0.0.1")), ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["analysis"]["total_score"], 30);
        assert_eq!(value["analysis"]["risk_level"], "Medium");
        assert_eq!(value["analysis"]["findings"][0]["key"], "networkRisk");
    }

    #[test]
    fn test_render_error() {
        assert_eq!(
            render_error("bad <ip>", ReportFormat::Html),
            "<p class=\"error\">bad &lt;ip&gt;</p>\n"
        );
        assert_eq!(render_error("x", ReportFormat::Text), "Error: x\n");
        assert_eq!(render_error("x", ReportFormat::Json), "{\"error\":\"x\"}\n");
    }
}
