//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Parser;

/// Timestamp and duration calculator.
///
/// Evaluates expressions such as `now - 1h30m`, `1700000000 + 15m` or
/// `2024-03-01T10:00:00+02:00 - 2024-03-01T00:00:00+00:00`. A lone epoch
/// time prints as an ISO timestamp and a lone ISO timestamp as epoch seconds.
/// Without expressions, one expression per line is read from stdin.
#[derive(Debug, Parser)]
#[command(name = "tscalc", version, about, long_about = None)]
pub struct Cli {
    /// Expressions to evaluate, each one on its own.
    #[arg(value_name = "EXPR", allow_hyphen_values = true)]
    pub expressions: Vec<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Use this instant for `now` instead of the system clock (RFC 3339).
    #[arg(long, value_name = "TIME")]
    pub now: Option<DateTime<Utc>>,

    /// Print one JSON object per expression.
    #[arg(long)]
    pub json: bool,

    /// Stop at the first expression that fails.
    #[arg(long)]
    pub fail_fast: bool,
}
