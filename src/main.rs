//! fixture-oracle — one-shot batch selection CLI.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! reads a candidate batch from JSON, runs a single selection pass, and
//! prints the resulting batch as JSON on stdout. Logs go to stderr so
//! the output stays machine-readable.

use anyhow::{Context, Result};
use tracing::info;

use fixture_oracle::config::AppConfig;
use fixture_oracle::engine::SelectionEngine;
use fixture_oracle::types::BetCandidate;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let input_path = args
        .next()
        .context("Usage: fixture-oracle <candidates.json> [config.toml]")?;
    let config_path = args.next();

    let cfg = match &config_path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    init_logging();

    info!(
        input = %input_path,
        config = config_path.as_deref().unwrap_or("<defaults>"),
        "Starting selection batch"
    );

    let contents = std::fs::read_to_string(&input_path)
        .with_context(|| format!("Failed to read candidate batch: {input_path}"))?;
    let candidates: Vec<BetCandidate> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse candidate batch: {input_path}"))?;

    let engine = SelectionEngine::new(cfg.selection);
    let (result, rejected) = engine.run_batch(&candidates);

    info!(
        candidates = candidates.len(),
        rejected = rejected.len(),
        picks = result.picked_fixtures(),
        "Batch finished"
    );

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fixture_oracle=info"));

    let json_logging = std::env::var("ORACLE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .init();
    }
}
