//! Command-line interface: one cleanup pass, optionally followed by notices.

mod run;

pub use run::{parse_as_of, run, write_report};

use clap::Parser;
use std::path::PathBuf;

/// Log level for CLI arguments.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for crate::level::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::Trace,
            LogLevel::Debug => Self::Debug,
            LogLevel::Info => Self::Info,
            LogLevel::Warn => Self::Warn,
            LogLevel::Error => Self::Error,
        }
    }
}

/// chronosweep - remove expired files and warn before it happens.
#[derive(Debug, Parser)]
#[command(
    name = "chronosweep",
    version,
    about = "Run retention cleanup once over the configured folders"
)]
pub struct Cli {
    /// Config file (TOML, or JSON by extension)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Also send notifications for the alert window
    #[arg(long)]
    pub alerts: bool,
    /// How many days ahead to look for alerts
    #[arg(long, value_name = "DAYS", default_value_t = 1)]
    pub alert_window_days: u32,
    /// Show what would be removed without removing anything
    #[arg(long)]
    pub dry_run: bool,
    /// Reference instant: YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS (local time)
    #[arg(long, value_name = "WHEN", value_parser = parse_as_of)]
    pub as_of: Option<chrono::NaiveDateTime>,
    /// Override the diagnostic level from the config
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}
