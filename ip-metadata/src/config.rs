//! Provider gateway configuration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding the per-attempt timeout
pub const ENV_TIMEOUT_MS: &str = "IP_RISK_TIMEOUT_MS";

/// Environment variable overriding the provider list (`name=url,...`)
pub const ENV_PROVIDERS: &str = "IP_RISK_PROVIDERS";

/// Gateway configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Providers, tried in order
    pub providers: Vec<ProviderConfig>,

    /// Per-attempt timeout (ms)
    pub timeout_ms: u64,
}

/// One metadata provider endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider name used in logs and reports
    pub name: String,

    /// URL with an `{ip}` placeholder
    pub url_template: String,
}

impl ProviderConfig {
    /// Create provider config
    pub fn new(name: impl Into<String>, url_template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            providers: vec![
                ProviderConfig::new("ipapi", "https://ipapi.co/{ip}/json/"),
                ProviderConfig::new("ipinfo", "https://ipinfo.io/{ip}/json"),
                ProviderConfig::new("ip-api", "http://ip-api.com/json/{ip}"),
            ],
            timeout_ms: 5000, // 5 seconds
        }
    }
}

impl GatewayConfig {
    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GatewayConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load defaults overridden by environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(timeout) = lookup(ENV_TIMEOUT_MS) {
            self.timeout_ms = timeout
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("Invalid {}: {}", ENV_TIMEOUT_MS, e)))?;
        }

        if let Some(list) = lookup(ENV_PROVIDERS) {
            self.providers = list
                .split(',')
                .filter(|entry| !entry.trim().is_empty())
                .map(|entry| {
                    let (name, url) = entry.split_once('=').ok_or_else(|| {
                        Error::Config(format!("Invalid {} entry: {}", ENV_PROVIDERS, entry))
                    })?;
                    Ok(ProviderConfig::new(name.trim(), url.trim()))
                })
                .collect::<Result<_>>()?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.providers.is_empty() {
            return Err(Error::Config("no metadata providers configured".to_string()));
        }
        if self.timeout_ms == 0 {
            return Err(Error::Config("timeout_ms must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_provider_order() {
        let config = GatewayConfig::default();
        let names: Vec<&str> = config.providers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["ipapi", "ipinfo", "ip-api"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_TIMEOUT_MS, "1500"),
            (ENV_PROVIDERS, "local=http://127.0.0.1:8080/{ip}, backup=http://10.0.0.2/{ip}"),
        ]);
        let config = GatewayConfig::default()
            .with_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.timeout_ms, 1500);
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.providers[1], ProviderConfig::new("backup", "http://10.0.0.2/{ip}"));
    }

    #[test]
    fn test_bad_env_values() {
        let bad_timeout = GatewayConfig::default()
            .with_overrides(|k| (k == ENV_TIMEOUT_MS).then(|| "soon".to_string()));
        assert!(matches!(bad_timeout, Err(Error::Config(_))));

        let bad_list = GatewayConfig::default()
            .with_overrides(|k| (k == ENV_PROVIDERS).then(|| "no-equals-sign".to_string()));
        assert!(matches!(bad_list, Err(Error::Config(_))));

        let empty_list = GatewayConfig::default()
            .with_overrides(|k| (k == ENV_PROVIDERS).then(|| " , ".to_string()));
        assert!(matches!(empty_list, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
timeout_ms = 750

[[providers]]
name = "internal"
url_template = "http://geo.internal/{{ip}}"
"#
        )
        .unwrap();

        let config = GatewayConfig::from_file(file.path()).unwrap();
        assert_eq!(config.timeout_ms, 750);
        assert_eq!(config.providers[0].url_template, "http://geo.internal/{ip}");
    }
}
