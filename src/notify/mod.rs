//! Notifiers turn an [`AlertSchedule`] into something a person sees. The
//! `Notifier` trait lets callers plug in their own sink next to the two
//! built-in ones (console lines and desktop banners).

mod banner;
mod console;

pub use banner::{BannerNotifier, CommandRunner};
pub use console::ConsoleNotifier;

use crate::alert::AlertSchedule;
use crate::internal;
use serde::Deserialize;

/// One delivery channel for scheduled alerts.
pub trait Notifier: Send + Sync {
    /// Short identifier used in log lines.
    fn name(&self) -> &str;

    /// Delivers every alert in the schedule, dates ascending.
    ///
    /// # Errors
    /// I/O errors from the underlying sink (stdout, spawned command).
    fn send(&self, alerts: &AlertSchedule) -> Result<(), crate::Error>;
}

/// Notifier entry as written in the config file: `{ type = "macos", options = { ... } }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// `console` or `macos`; anything else falls back to console.
    #[serde(rename = "type")]
    pub kind: String,
    pub options: NotifierOptions,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            kind: "console".to_string(),
            options: NotifierOptions::default(),
        }
    }
}

/// Banner presentation settings; ignored by the console sink.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct NotifierOptions {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub sound: Option<String>,
}

/// Picks the concrete sink for a config entry by its declared kind.
#[must_use]
pub fn build_notifier(config: &NotifierConfig) -> Box<dyn Notifier> {
    match config.kind.trim().to_lowercase().as_str() {
        "macos" => {
            let mut banner = BannerNotifier::new();
            if let Some(title) = &config.options.title {
                banner = banner.title(title);
            }
            if let Some(subtitle) = &config.options.subtitle {
                banner = banner.subtitle(subtitle);
            }
            if let Some(sound) = &config.options.sound {
                banner = banner.sound(sound);
            }
            Box::new(banner)
        }
        "console" => Box::new(ConsoleNotifier::new()),
        other => {
            internal::warn(
                "NOTIFY",
                &format!("Unknown notification type '{other}', using console"),
            );
            Box::new(ConsoleNotifier::new())
        }
    }
}
