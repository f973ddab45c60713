//! Timestamp calculator CLI library.
//!
//! Argument parsing, configuration, and the line loop behind the `tscalc`
//! binary. All parsing and arithmetic lives in `tscalc-core`.

pub mod calc;
mod cli;
mod config;

pub use cli::Cli;
pub use config::Config;
