use std::path::PathBuf;

use clap::Parser;

/// Localize the root cause of an anomaly in a multi-dimensional metric.
///
/// Reads one localization input as JSON and writes the ranked causes as JSON
/// to stdout. Feed a returned cause back in as the anomaly dimension to
/// drill one level deeper.
#[derive(Parser, Debug)]
#[command(name = "rca", about = "Single-layer root cause localization")]
pub struct CliArgs {
    /// Path to the localization input (JSON)
    #[arg(long, short)]
    pub input: PathBuf,

    /// Localizer config file (TOML); env vars and flags override it
    #[arg(long, env = "RCA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Surprise weight in the score blend, within [0, 1]
    #[arg(long)]
    pub beta: Option<f64>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pub pretty: bool,
}
