use std::io::{self, BufRead, IsTerminal};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tscalc_cli::calc::{self, Options};
use tscalc_cli::{Cli, Config};
use tscalc_core::{Clock, FixedClock, SystemClock};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Results own stdout, so logs go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let options = Options {
        json: cli.json || config.json,
        fail_fast: cli.fail_fast || config.fail_fast,
    };
    let clock: Box<dyn Clock> = match cli.now.or(config.now) {
        Some(now) => Box::new(FixedClock(now)),
        None => Box::new(SystemClock),
    };

    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();

    // Nothing to evaluate: show the current time
    if cli.expressions.is_empty() && io::stdin().is_terminal() {
        calc::print_now(&mut out, clock.as_ref())?;
        return Ok(ExitCode::SUCCESS);
    }

    let summary = if cli.expressions.is_empty() {
        let lines = io::stdin().lock().lines();
        calc::run(lines, &mut out, &mut err, clock.as_ref(), options)?
    } else {
        let lines = cli.expressions.into_iter().map(io::Result::Ok);
        calc::run(lines, &mut out, &mut err, clock.as_ref(), options)?
    };

    tracing::debug!(?summary, "done");
    if summary.failed > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
