//! Serde schema for the config file. Everything here is raw input; the
//! validated forms are built in the parent module.

use crate::duration::DurationValue;
use crate::notify::NotifierConfig;
use serde::Deserialize;

/// A key that accepts either a single value or a list of them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

/// `[general]` section: settings for chronosweep's own diagnostics.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Minimum diagnostic level.
    pub level: String,
    /// ANSI colors on stderr.
    pub colors: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            colors: true,
        }
    }
}

/// One `[[rules]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    /// Root directory; `~` is expanded.
    pub path: String,
    /// Preferred retention key (`"5d"`, `"12h"`, `7`).
    #[serde(default)]
    pub retention_time: Option<DurationValue>,
    /// Alias of `retention_time`.
    #[serde(default)]
    pub retention: Option<DurationValue>,
    /// Fractional days, consulted last.
    #[serde(default)]
    pub retention_days: Option<f64>,
    #[serde(default)]
    pub notify_before: Option<OneOrMany<DurationValue>>,
    /// Single lead-time, used when `notify_before` is absent.
    #[serde(default)]
    pub notify_days_before: Option<DurationValue>,
    #[serde(default)]
    pub exemptions: Vec<String>,
    /// `delete` (default), `trash`, or `system_trash`.
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub patterns: Vec<PatternConfig>,
}

/// One `[[rules.patterns]]` entry. Unset lead-times and action inherit from the rule.
#[derive(Debug, Clone, Deserialize)]
pub struct PatternConfig {
    pub pattern: String,
    #[serde(default)]
    pub retention_time: Option<DurationValue>,
    #[serde(default)]
    pub retention: Option<DurationValue>,
    #[serde(default)]
    pub notify_before: Option<OneOrMany<DurationValue>>,
    #[serde(default)]
    pub action: Option<String>,
}

/// Whole config file.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    /// Managed trash root; defaults to `~/.chronosweep_trash`.
    pub trash_dir: Option<String>,
    /// OS trash root; defaults to the env override or the per-user trash.
    pub system_trash_dir: Option<String>,
    pub notifications: Vec<NotifierConfig>,
    pub rules: Vec<RuleConfig>,
}
