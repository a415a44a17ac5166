// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! NOTE: this expects `clap` to be built with the `derive` feature, e.g.:
//! `clap = { version = "4.5.53", features = ["derive"] }` in `Cargo.toml`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `pinwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pinwatch",
    version,
    about = "Trigger GPIO writes and commands on process and button edges.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (JSON).
    ///
    /// Default: `config.json` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "config.json")]
    pub config: String,

    /// Process polling interval in seconds.
    #[arg(long, value_name = "SECONDS", default_value_t = 5.0)]
    pub period: f64,

    /// Nominal button debounce interval in seconds.
    ///
    /// Raw pin sampling runs at this interval divided by the debounce factor
    /// (3), so samples arrive faster than the nominal interval implies.
    #[arg(long, value_name = "SECONDS", default_value_t = 0.15)]
    pub debounced: f64,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PINWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print targets, but don't start any watcher.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
