//! Metadata provider interface and HTTP implementation

use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Placeholder replaced by the address in URL templates
pub const IP_PLACEHOLDER: &str = "{ip}";

/// Source of raw IP metadata
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Get provider name
    fn name(&self) -> &str;

    /// Fetch the raw attribute bundle for an address
    async fn lookup(&self, ip: &str) -> Result<Value>;
}

/// JSON-over-HTTP provider driven by a URL template
pub struct HttpProvider {
    name: String,
    url_template: String,
    http_client: Client,
}

impl HttpProvider {
    /// Create provider; `url_template` must contain `{ip}`
    pub fn new(name: impl Into<String>, url_template: impl Into<String>, timeout: Duration) -> Result<Self> {
        let name = name.into();
        let url_template = url_template.into();
        if !url_template.contains(IP_PLACEHOLDER) {
            return Err(Error::Config(format!(
                "URL template for {} has no {} placeholder",
                name, IP_PLACEHOLDER
            )));
        }

        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            name,
            url_template,
            http_client,
        })
    }

    /// URL queried for an address
    pub fn url_for(&self, ip: &str) -> String {
        self.url_template.replace(IP_PLACEHOLDER, ip)
    }

    fn rejection_reason(body: &Value) -> Option<String> {
        let flagged = match body.get("error") {
            Some(Value::Bool(b)) => *b,
            Some(Value::Null) | None => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        };
        // ip-api style: {"status": "fail", "message": "..."}
        let failed = body.get("status").and_then(Value::as_str) == Some("fail");

        if !flagged && !failed {
            return None;
        }

        let reason = ["reason", "message"]
            .iter()
            .find_map(|k| body.get(*k).and_then(Value::as_str))
            .or_else(|| body.get("error").and_then(Value::as_str))
            .or_else(|| body.pointer("/error/message").and_then(Value::as_str))
            .unwrap_or("unspecified");
        Some(reason.to_string())
    }
}

#[async_trait]
impl MetadataProvider for HttpProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn lookup(&self, ip: &str) -> Result<Value> {
        let url = self.url_for(ip);
        debug!(provider = %self.name, %url, "querying metadata provider");

        let response = self
            .http_client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Api {
                provider: self.name.clone(),
                status: response.status().as_u16(),
            });
        }

        let body: Value = response.json().await?;
        if let Some(reason) = Self::rejection_reason(&body) {
            return Err(Error::Rejected {
                provider: self.name.clone(),
                reason,
            });
        }

        Ok(body)
    }
}
