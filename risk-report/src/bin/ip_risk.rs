//! IP Risk Report Binary
//!
//! Looks up metadata for an IPv4 address, scores it and prints the report.

use anyhow::{Context, Result};
use clap::Parser;
use ip_metadata::{GatewayConfig, ProviderChain};
use risk_engine::{AttributeRecord, RiskRuleTable, RiskScorer};
use risk_report::{render, render_error, ReportFormat, RiskReport};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const INVALID_ADDRESS_MESSAGE: &str = "Invalid IP address. Please enter a valid IP address.";
const NO_DATA_MESSAGE: &str = "Could not retrieve IP information. Please enter a valid IP address.";

#[derive(Parser, Debug)]
#[command(name = "ip-risk", version, about = "Heuristic security-risk report for an IPv4 address")]
struct Args {
    /// IPv4 address to analyze
    ip: String,

    /// Rule table (TOML)
    #[arg(long, env = "IP_RISK_RULES")]
    rules: Option<PathBuf>,

    /// Provider gateway config (TOML)
    #[arg(long, env = "IP_RISK_GATEWAY")]
    gateway: Option<PathBuf>,

    /// Score a saved provider response instead of querying providers
    #[arg(long, value_name = "FILE")]
    from_json: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Per-provider timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.json_logs);

    match run(&args).await {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            print!("{}", render_error(&user_message(&e), args.format));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

async fn run(args: &Args) -> Result<String> {
    let rules = match &args.rules {
        Some(path) => {
            info!("Loading rule table from: {}", path.display());
            RiskRuleTable::from_file(path)
                .with_context(|| format!("failed to load rule table {}", path.display()))?
        }
        None => RiskRuleTable::default(),
    };
    let scorer = RiskScorer::new(Arc::new(rules));

    let report = match &args.from_json {
        Some(path) => {
            let ip = ip_metadata::validate_ipv4(&args.ip)?;
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let raw: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse {}", path.display()))?;

            let mut record = AttributeRecord::from_json(&raw);
            record.ip.get_or_insert(ip);
            RiskReport::build(&scorer, record, None)
        }
        None => {
            let mut config = match &args.gateway {
                Some(path) => GatewayConfig::from_file(path)
                    .with_context(|| format!("failed to load gateway config {}", path.display()))?,
                None => GatewayConfig::from_env()?,
            };
            if let Some(timeout_ms) = args.timeout_ms {
                config.timeout_ms = timeout_ms;
            }

            let chain = ProviderChain::from_config(&config)?;
            info!("Providers: {}", chain.provider_names().join(", "));

            let lookup = chain.lookup(&args.ip).await?;
            RiskReport::from_lookup(&scorer, lookup)
        }
    };

    Ok(render(&report, args.format)?)
}

fn user_message(e: &anyhow::Error) -> String {
    match e.downcast_ref::<ip_metadata::Error>() {
        Some(ip_metadata::Error::InvalidAddress(_)) => INVALID_ADDRESS_MESSAGE.to_string(),
        Some(ip_metadata::Error::NoData { .. }) => NO_DATA_MESSAGE.to_string(),
        _ => format!("An error occurred: {}", e),
    }
}
