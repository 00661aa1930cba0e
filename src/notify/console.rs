//! Plain stdout listing, one header per date and one line per alert.

use super::Notifier;
use crate::alert::AlertSchedule;
use std::io::{self, Write};

#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Lines exactly as `send` prints them.
    #[must_use]
    pub fn render(alerts: &AlertSchedule) -> Vec<String> {
        let mut lines = Vec::new();
        for (date, day_alerts) in alerts {
            lines.push(format!("[chronosweep] Alerts for {date}:"));
            for alert in day_alerts {
                lines.push(format!("  {}", alert.message()));
            }
        }
        lines
    }
}

impl Notifier for ConsoleNotifier {
    fn name(&self) -> &'static str {
        "console"
    }

    fn send(&self, alerts: &AlertSchedule) -> Result<(), crate::Error> {
        let mut out = io::stdout().lock();
        for line in Self::render(alerts) {
            writeln!(out, "{line}")?;
        }
        out.flush()?;
        Ok(())
    }
}
