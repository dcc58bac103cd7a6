//! rule-one: Rule #1 valuation of company financial histories.
//!
//! Each input file holds one company (a `CompanyFinancials` object) or an
//! array of them. Results are printed to stdout as a JSON array, in input
//! order; logs go to stderr.
//!
//! Usage:
//!   cargo run -p valuation-cli -- data/squrpharma.json
//!   cargo run -p valuation-cli -- --pretty --concurrency 4 data/*.json
//!
//! Policy overrides are read from `RULE_ONE_*` variables (and `.env`).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use analysis_core::{CompanyFinancials, ValuationConfig};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Semaphore;
use valuation_engine::ValuationEngine;

/// Max companies analysed at once
const DEFAULT_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, PartialEq)]
struct CliOptions {
    concurrency: usize,
    pretty: bool,
    files: Vec<PathBuf>,
}

impl CliOptions {
    /// `None` when no input file was given.
    fn parse(args: &[String]) -> Option<Self> {
        let mut options = CliOptions {
            concurrency: DEFAULT_CONCURRENCY,
            pretty: false,
            files: Vec::new(),
        };
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--pretty" => options.pretty = true,
                "--concurrency" => {
                    options.concurrency = iter
                        .next()
                        .and_then(|v| v.parse().ok())
                        .filter(|n| *n > 0)
                        .unwrap_or(DEFAULT_CONCURRENCY);
                }
                other => options.files.push(PathBuf::from(other)),
            }
        }
        (!options.files.is_empty()).then_some(options)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CompanyBatch {
    Many(Vec<CompanyFinancials>),
    One(Box<CompanyFinancials>),
}

fn parse_companies(raw: &str) -> Result<Vec<CompanyFinancials>> {
    let batch: CompanyBatch = serde_json::from_str(raw).context("expected a company object or an array of them")?;
    Ok(match batch {
        CompanyBatch::Many(companies) => companies,
        CompanyBatch::One(company) => vec![*company],
    })
}

fn load_companies(path: &Path) -> Result<Vec<CompanyFinancials>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_companies(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn init_tracing() {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "valuation_cli=info,valuation_engine=info".into())
    };
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter())
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(options) = CliOptions::parse(&args) else {
        eprintln!("Usage:");
        eprintln!("  rule-one [OPTIONS] <file.json>...");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --concurrency N    Max companies analysed in parallel (default: {})", DEFAULT_CONCURRENCY);
        eprintln!("  --pretty           Pretty-print the JSON output");
        std::process::exit(1);
    };

    let config = ValuationConfig::from_env();
    let engine = Arc::new(ValuationEngine::new(config).context("invalid valuation policy")?);

    let mut companies = Vec::new();
    for path in &options.files {
        companies.extend(load_companies(path)?);
    }

    let total = companies.len();
    let policy = engine.config();
    tracing::info!(
        "rule-one: {} companies from {} files, concurrency={}, required_return={}, horizon={}y",
        total,
        options.files.len(),
        options.concurrency,
        policy.required_return,
        policy.projection_years
    );

    let completed = Arc::new(AtomicU64::new(0));
    let failed = Arc::new(AtomicU64::new(0));
    let semaphore = Arc::new(Semaphore::new(options.concurrency));
    let mut handles = Vec::with_capacity(total);

    for company in companies {
        let engine = Arc::clone(&engine);
        let completed = Arc::clone(&completed);
        let failed = Arc::clone(&failed);
        let semaphore = Arc::clone(&semaphore);

        handles.push(tokio::spawn(async move {
            let symbol = company.symbol.clone();
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => return json!({ "symbol": symbol, "error": e.to_string() }),
            };

            let outcome = tokio::task::spawn_blocking(move || engine.analyze(&company)).await;
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;

            match outcome {
                Ok(Ok(analysis)) => {
                    tracing::info!(
                        "[{}/{}] {} => {}",
                        done,
                        total,
                        symbol,
                        analysis.recommendation.map(|r| r.as_str()).unwrap_or("NOT_CALCULABLE")
                    );
                    analysis.to_json()
                }
                Ok(Err(e)) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!("[{}/{}] {} failed: {}", done, total, symbol, e);
                    json!({ "symbol": symbol, "error": e.to_string() })
                }
                Err(e) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!("[{}/{}] {} task aborted: {}", done, total, symbol, e);
                    json!({ "symbol": symbol, "error": e.to_string() })
                }
            }
        }));
    }

    let mut results = Vec::with_capacity(total);
    for handle in handles {
        results.push(handle.await.context("analysis task panicked")?);
    }

    let output = serde_json::Value::Array(results);
    let rendered = if options.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);

    tracing::info!(
        "Done! {} companies ({} failed)",
        total,
        failed.load(Ordering::Relaxed)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_options() {
        let options = CliOptions::parse(&args(&["--pretty", "--concurrency", "3", "a.json", "b.json"])).unwrap();
        assert!(options.pretty);
        assert_eq!(options.concurrency, 3);
        assert_eq!(options.files, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
    }

    #[test]
    fn test_bad_concurrency_falls_back() {
        let options = CliOptions::parse(&args(&["--concurrency", "0", "a.json"])).unwrap();
        assert_eq!(options.concurrency, DEFAULT_CONCURRENCY);
        let options = CliOptions::parse(&args(&["--concurrency", "many", "a.json"])).unwrap();
        assert_eq!(options.concurrency, DEFAULT_CONCURRENCY);
    }

    #[test]
    fn test_no_files_is_usage_error() {
        assert!(CliOptions::parse(&args(&["--pretty"])).is_none());
        assert!(CliOptions::parse(&[]).is_none());
    }

    #[test]
    fn test_parse_single_and_batch() {
        let one = r#"{"symbol": "GP", "records": [{"fiscal_year": 2022, "eps": 25.1}]}"#;
        let companies = parse_companies(one).unwrap();
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].records[0].eps, Some(25.1));
        assert!(companies[0].records[0].revenue.is_none());

        let many = r#"[{"symbol": "GP", "records": []}, {"symbol": "ACI", "current_price": 210.5, "records": []}]"#;
        let companies = parse_companies(many).unwrap();
        assert_eq!(companies.len(), 2);
        assert_eq!(companies[1].current_price, Some(210.5));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_companies("{\"name\": 3}").is_err());
        assert!(parse_companies("not json").is_err());
    }
}
