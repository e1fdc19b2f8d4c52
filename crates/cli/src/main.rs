mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use rootcause_compute::RootCauseAnalyzer;
use rootcause_core::RootCauseLocalizationInput;

use crate::cli::CliArgs;

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the JSON result.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    rootcause_core::config::load_dotenv();
    let args = CliArgs::parse();

    let config = config::resolve(args.config.as_deref(), args.beta)?;
    config.log_summary();

    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let input: RootCauseLocalizationInput = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;
    info!(
        "Analyzing [{}] at {} over {} slice(s)",
        input.anomaly_dimension,
        input.anomaly_timestamp,
        input.slices.len()
    );

    let result = RootCauseAnalyzer::new(config)
        .analyze(&input)
        .context("root cause analysis failed")?;
    for warning in &result.warnings {
        tracing::warn!("{:?} for [{}]", warning.kind, warning.dimension);
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{json}");
    Ok(())
}
