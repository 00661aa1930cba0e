//! stderr backend. stdout belongs to command output (removed paths, console
//! alerts), so every diagnostic line goes to stderr.

use super::{LogRecord, Output};
use crate::level::Level;
use std::io::{self, Write};

const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";

#[derive(Debug, Clone)]
pub struct TerminalOutput {
    colors_enabled: bool,
    scope_width: usize,
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalOutput {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            colors_enabled: true,
            scope_width: 8,
        }
    }

    /// Piped output and CI logs can't render ANSI escapes.
    #[must_use]
    pub const fn colors(mut self, enabled: bool) -> Self {
        self.colors_enabled = enabled;
        self
    }

    #[must_use]
    pub const fn scope_width(mut self, width: usize) -> Self {
        self.scope_width = width;
        self
    }

    const fn level_color(level: Level) -> &'static str {
        match level {
            Level::Trace | Level::Debug => "\x1b[35m",
            Level::Info => "\x1b[36m",
            Level::Warn => "\x1b[33m",
            Level::Error => "\x1b[31m",
        }
    }

    /// `INFO  CLEANUP   message`, with the tag colored and the scope dimmed.
    #[must_use]
    pub fn format_record(&self, record: &LogRecord) -> String {
        let width = self.scope_width;
        let scope = format!("{:<width$}", record.scope);
        if self.colors_enabled {
            format!(
                "{}{}{RESET} {DIM}{scope}{RESET}  {}",
                Self::level_color(record.level),
                record.level.tag(),
                record.message
            )
        } else {
            format!("{} {scope}  {}", record.level.tag(), record.message)
        }
    }
}

impl Output for TerminalOutput {
    fn write(&self, record: &LogRecord) -> Result<(), crate::Error> {
        writeln!(io::stderr(), "{}", self.format_record(record))?;
        Ok(())
    }

    fn flush(&self) -> Result<(), crate::Error> {
        io::stderr().flush()?;
        Ok(())
    }
}
