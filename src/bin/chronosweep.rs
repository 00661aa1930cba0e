//! `chronosweep` binary: a single cleanup pass, suitable for cron or launchd.
//!
//! Usage:
//!   chronosweep [--config PATH] [--dry-run] [--as-of WHEN]
//!   chronosweep --alerts [--alert-window-days N]

use chronosweep::cli::{Cli, run};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    run(&cli)
}
