//! The single command the binary runs: load config, clean up, report,
//! and optionally notify.

use super::Cli;
use crate::cleaner::local_now;
use crate::config::{Config, Settings};
use crate::internal;
use crate::level::Level;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Accepts a date (midnight) or a date-time, both naive local.
///
/// # Errors
/// A message naming the accepted formats.
pub fn parse_as_of(text: &str) -> Result<NaiveDateTime, String> {
    let text = text.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|_| format!("invalid date '{text}' (use YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)"))
}

/// `Removed N items.` followed by one indented path per line.
///
/// # Errors
/// Write failures on `out`, such as a closed pipe.
pub fn write_report(
    out: &mut impl Write,
    removed: &[PathBuf],
    dry_run: bool,
) -> io::Result<()> {
    let verb = if dry_run { "Would remove" } else { "Removed" };
    writeln!(out, "{verb} {} items.", removed.len())?;
    for path in removed {
        writeln!(out, "  {}", path.display())?;
    }
    out.flush()
}

/// Runs one pass for parsed arguments.
#[must_use]
pub fn run(cli: &Cli) -> ExitCode {
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Before config.build(): rule building logs through it.
    match cli.log_level {
        Some(level) => internal::init(Level::from(level), config.general.colors),
        None => internal::init_with_config(&config.general),
    }

    let cleaner = match config.build().and_then(Settings::into_cleaner) {
        Ok(cleaner) => cleaner.dry_run(cli.dry_run),
        Err(e) => {
            internal::error("CONFIG", &format!("{e}"));
            return ExitCode::FAILURE;
        }
    };

    let as_of = cli.as_of.unwrap_or_else(local_now);
    internal::debug("CLI", &format!("as_of={as_of}, dry_run={}", cli.dry_run));

    let removed = match cleaner.cleanup(as_of) {
        Ok(removed) => removed,
        Err(e) => {
            internal::error("CLEANUP", &format!("{e}"));
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = write_report(&mut io::stdout().lock(), &removed, cli.dry_run) {
        internal::error("CLI", &format!("Failed to write report: {e}"));
        return ExitCode::FAILURE;
    }

    if cli.alerts
        && let Err(e) = cleaner.send_notifications(as_of, cli.alert_window_days)
    {
        internal::error("NOTIFY", &format!("{e}"));
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
