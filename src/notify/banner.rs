//! macOS Notification Center banners via `osascript`.
//!
//! The command runner is injectable and the platform check can be switched
//! off, so the script construction is testable anywhere.

use super::Notifier;
use crate::alert::AlertSchedule;
use crate::internal;
use std::io;
use std::process::Command;

/// Executes one argv; the default spawns it and ignores the exit status.
pub type CommandRunner = Box<dyn Fn(&[String]) -> io::Result<()> + Send + Sync>;

pub struct BannerNotifier {
    title: String,
    subtitle: Option<String>,
    sound: Option<String>,
    runner: CommandRunner,
    require_darwin: bool,
}

impl Default for BannerNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BannerNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BannerNotifier")
            .field("title", &self.title)
            .field("subtitle", &self.subtitle)
            .field("sound", &self.sound)
            .field("require_darwin", &self.require_darwin)
            .finish_non_exhaustive()
    }
}

impl BannerNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: "ChronoSweep".to_string(),
            subtitle: None,
            sound: None,
            runner: Box::new(run_command),
            require_darwin: true,
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Fixed subtitle; by default each banner shows `Due YYYY-MM-DD`.
    #[must_use]
    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    #[must_use]
    pub fn sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    #[must_use]
    pub fn runner(
        mut self,
        runner: impl Fn(&[String]) -> io::Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.runner = Box::new(runner);
        self
    }

    /// When true (the default) `send` is a no-op off macOS.
    #[must_use]
    pub const fn require_darwin(mut self, require: bool) -> Self {
        self.require_darwin = require;
        self
    }

    /// AppleScript for one banner.
    #[must_use]
    pub fn build_script(&self, message: &str, subtitle: &str) -> String {
        let mut parts = vec![
            format!(
                "display notification \"{}\" with title \"{}\"",
                escape(message),
                escape(&self.title)
            ),
            format!("subtitle \"{}\"", escape(subtitle)),
        ];
        if let Some(sound) = &self.sound {
            parts.push(format!("sound name \"{}\"", escape(sound)));
        }
        parts.join(" ")
    }
}

impl Notifier for BannerNotifier {
    fn name(&self) -> &'static str {
        "macos"
    }

    fn send(&self, alerts: &AlertSchedule) -> Result<(), crate::Error> {
        if self.require_darwin && std::env::consts::OS != "macos" {
            internal::debug("NOTIFY", "Banner notifications need macOS, skipping");
            return Ok(());
        }

        for (date, day_alerts) in alerts {
            let subtitle = self
                .subtitle
                .clone()
                .unwrap_or_else(|| format!("Due {date}"));
            for alert in day_alerts {
                let script = self.build_script(&alert.message(), &subtitle);
                let argv = ["osascript".to_string(), "-e".to_string(), script];
                (self.runner)(&argv)?;
            }
        }
        Ok(())
    }
}

/// Backslashes first, then double quotes.
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn run_command(argv: &[String]) -> io::Result<()> {
    let Some((program, args)) = argv.split_first() else {
        return Ok(());
    };
    Command::new(program).args(args).status().map(|_| ())
}
