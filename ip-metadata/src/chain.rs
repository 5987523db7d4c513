//! Ordered provider fallback

use crate::{validate_ipv4, Error, GatewayConfig, HttpProvider, MetadataProvider, Result};
use risk_engine::AttributeRecord;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Successful lookup
#[derive(Debug, Clone)]
pub struct Lookup {
    /// Provider that answered
    pub provider: String,

    /// Normalized record
    pub record: AttributeRecord,

    /// Raw provider response
    pub raw: Value,
}

/// Tries providers in order until one returns a usable record
pub struct ProviderChain {
    providers: Vec<Arc<dyn MetadataProvider>>,
    attempt_timeout: Duration,
}

impl ProviderChain {
    /// Create chain from providers and a per-attempt timeout
    pub fn new(providers: Vec<Arc<dyn MetadataProvider>>, attempt_timeout: Duration) -> Self {
        Self {
            providers,
            attempt_timeout,
        }
    }

    /// Build HTTP providers from configuration
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        config.validate()?;
        let timeout = Duration::from_millis(config.timeout_ms);

        let providers = config
            .providers
            .iter()
            .map(|p| {
                HttpProvider::new(&p.name, &p.url_template, timeout)
                    .map(|provider| Arc::new(provider) as Arc<dyn MetadataProvider>)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(providers, timeout))
    }

    /// Provider names in the order they are tried
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Validate the address, then query providers in order.
    ///
    /// Fails with [`Error::InvalidAddress`] before any request is made, or
    /// with [`Error::NoData`] once every provider has failed.
    pub async fn lookup(&self, input: &str) -> Result<Lookup> {
        let ip = validate_ipv4(input)?;
        let mut attempts = 0;

        for provider in &self.providers {
            attempts += 1;
            match self.attempt(provider.as_ref(), &ip).await {
                Ok(lookup) => {
                    info!(provider = %lookup.provider, %ip, attempts, "metadata lookup succeeded");
                    return Ok(lookup);
                }
                Err(e) => {
                    warn!(provider = provider.name(), %ip, error = %e, "metadata provider failed");
                }
            }
        }

        Err(Error::NoData { attempts })
    }

    async fn attempt(&self, provider: &dyn MetadataProvider, ip: &str) -> Result<Lookup> {
        let raw = tokio::time::timeout(self.attempt_timeout, provider.lookup(ip))
            .await
            .map_err(|_| Error::Timeout {
                provider: provider.name().to_string(),
                millis: self.attempt_timeout.as_millis() as u64,
            })??;

        let record = AttributeRecord::from_json(&raw);
        if record.ip.is_none() {
            return Err(Error::MissingAddress {
                provider: provider.name().to_string(),
            });
        }

        Ok(Lookup {
            provider: provider.name().to_string(),
            record,
            raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behavior {
        Answer(Value),
        Fail,
        Hang,
    }

    struct StubProvider {
        name: &'static str,
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn new(name: &'static str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                name,
                behavior,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl MetadataProvider for StubProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn lookup(&self, _ip: &str) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                Behavior::Answer(v) => Ok(v.clone()),
                Behavior::Fail => Err(Error::Api {
                    provider: self.name.to_string(),
                    status: 503,
                }),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(Value::Null)
                }
            }
        }
    }

    fn chain(providers: Vec<Arc<StubProvider>>) -> ProviderChain {
        ProviderChain::new(
            providers
                .into_iter()
                .map(|p| p as Arc<dyn MetadataProvider>)
                .collect(),
            Duration::from_millis(50),
        )
    }

    #[tokio::test]
    async fn test_first_provider_wins() {
        let first = StubProvider::new("first", Behavior::Answer(json!({"ip": "1.2.3.4"})));
        let second = StubProvider::new("second", Behavior::Answer(json!({"ip": "1.2.3.4"})));
        let chain = chain(vec![first.clone(), second.clone()]);

        let lookup = chain.lookup("1.2.3.4").await.unwrap();
        assert_eq!(lookup.provider, "first");
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_falls_back_in_order() {
        let down = StubProvider::new("down", Behavior::Fail);
        let empty = StubProvider::new("empty", Behavior::Answer(json!({"country": "Nowhere"})));
        let good = StubProvider::new(
            "good",
            Behavior::Answer(json!({"query": "1.2.3.4", "countryCode": "RU"})),
        );
        let chain = chain(vec![down.clone(), empty.clone(), good.clone()]);

        let lookup = chain.lookup("1.2.3.4").await.unwrap();
        assert_eq!(lookup.provider, "good");
        assert_eq!(lookup.record.country_code.as_deref(), Some("RU"));
        assert_eq!(down.calls.load(Ordering::SeqCst), 1);
        assert_eq!(empty.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out() {
        let slow = StubProvider::new("slow", Behavior::Hang);
        let good = StubProvider::new("good", Behavior::Answer(json!({"ip": "1.2.3.4"})));
        let chain = chain(vec![slow, good]);

        let lookup = chain.lookup("1.2.3.4").await.unwrap();
        assert_eq!(lookup.provider, "good");
    }

    #[tokio::test]
    async fn test_all_providers_fail() {
        let chain = chain(vec![
            StubProvider::new("a", Behavior::Fail),
            StubProvider::new("b", Behavior::Fail),
        ]);

        let err = chain.lookup("1.2.3.4").await.unwrap_err();
        assert!(matches!(err, Error::NoData { attempts: 2 }));
    }

    #[tokio::test]
    async fn test_invalid_address_short_circuits() {
        let provider = StubProvider::new("a", Behavior::Answer(json!({"ip": "x"})));
        let chain = chain(vec![provider.clone()]);

        let err = chain.lookup("not an ip").await.unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_from_config() {
        let chain = ProviderChain::from_config(&GatewayConfig::default()).unwrap();
        assert_eq!(chain.provider_names(), vec!["ipapi", "ipinfo", "ip-api"]);
    }
}
