//! Config file loading and conversion into validated rules.
//!
//! The file is TOML unless its name ends in `.json`. Loading only parses;
//! [`Config::build`] validates durations, actions, and patterns and resolves
//! every path, so a `Settings` value is ready to drive a [`Cleaner`].

mod structs;

pub use structs::{Config, GeneralConfig, OneOrMany, PatternConfig, RuleConfig};

use crate::Error;
use crate::cleaner::Cleaner;
use crate::dispose::system_trash_from_env;
use crate::duration::{self, DurationValue};
use crate::internal;
use crate::notify::{Notifier, NotifierConfig, build_notifier};
use crate::rule::{Action, FolderRule, PatternRule, resolve_path};
use chrono::TimeDelta;
use std::fs;
use std::path::{Path, PathBuf};

/// Managed trash root when the config names none.
pub const DEFAULT_TRASH_DIR: &str = "~/.chronosweep_trash";

/// Validated, path-resolved configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub rules: Vec<FolderRule>,
    pub trash_dir: PathBuf,
    pub system_trash_dir: Option<PathBuf>,
    pub notifications: Vec<NotifierConfig>,
}

impl Config {
    /// Reads the default location; a missing file yields an empty config.
    ///
    /// # Errors
    /// Fails if the config directory can't be determined or the file doesn't parse.
    pub fn load() -> Result<Self, Error> {
        let path = Self::get_config_path()?;
        if !path.exists() {
            internal::warn(
                "CONFIG",
                &format!("No config at {}, nothing to do", path.display()),
            );
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// # Errors
    /// I/O errors reading the file, TOML or JSON syntax errors.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        internal::info(
            "CONFIG",
            &format!(
                "Config loaded from {} ({} rule(s))",
                path.display(),
                config.rules.len()
            ),
        );
        Ok(config)
    }

    /// # Errors
    /// TOML syntax or schema errors.
    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        Ok(toml::from_str(content)?)
    }

    /// # Errors
    /// JSON syntax or schema errors.
    pub fn from_json_str(content: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(content)?)
    }

    /// `<config_dir>/chronosweep/config.toml`
    ///
    /// # Errors
    /// Fails when the platform has no config directory.
    pub fn get_config_path() -> Result<PathBuf, Error> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("chronosweep").join("config.toml"))
            .ok_or(Error::ConfigDirNotFound)
    }

    /// Validates every rule and resolves trash roots.
    ///
    /// # Errors
    /// The first invalid duration, action, pattern, or path encountered.
    pub fn build(&self) -> Result<Settings, Error> {
        let rules = self
            .rules
            .iter()
            .map(build_rule)
            .collect::<Result<Vec<_>, _>>()?;

        let trash_raw = self.trash_dir.as_deref().unwrap_or(DEFAULT_TRASH_DIR);
        let trash_dir = resolve_path(Path::new(trash_raw))?;

        let system_trash_dir = match &self.system_trash_dir {
            Some(dir) => Some(resolve_path(Path::new(dir))?),
            None => system_trash_from_env(),
        };

        internal::debug(
            "CONFIG",
            &format!(
                "trash_dir={}, system_trash_dir={}",
                trash_dir.display(),
                system_trash_dir
                    .as_deref()
                    .map_or_else(|| "none".to_string(), |p| p.display().to_string())
            ),
        );

        Ok(Settings {
            rules,
            trash_dir,
            system_trash_dir,
            notifications: self.notifications.clone(),
        })
    }
}

impl Settings {
    /// Cleaner with the built-in notifier for each configured entry.
    ///
    /// # Errors
    /// `InvalidPath` if the trash root cannot be made absolute.
    pub fn into_cleaner(self) -> Result<Cleaner, Error> {
        self.into_cleaner_with(|config| Some(build_notifier(config)))
    }

    /// Cleaner whose notifiers come from `factory`; entries for which it
    /// returns `None` are dropped.
    ///
    /// # Errors
    /// `InvalidPath` if the trash root cannot be made absolute.
    pub fn into_cleaner_with<F>(self, factory: F) -> Result<Cleaner, Error>
    where
        F: Fn(&NotifierConfig) -> Option<Box<dyn Notifier>>,
    {
        let mut cleaner = Cleaner::new(self.rules).trash_dir(&self.trash_dir)?;
        if let Some(dir) = self.system_trash_dir {
            cleaner = cleaner.system_trash_dir(dir);
        }
        for config in &self.notifications {
            if let Some(notifier) = factory(config) {
                cleaner = cleaner.boxed_notifier(notifier);
            }
        }
        Ok(cleaner)
    }
}

fn build_rule(rule: &RuleConfig) -> Result<FolderRule, Error> {
    let retention = rule_retention(rule)?;

    let notify_before = match (&rule.notify_before, &rule.notify_days_before) {
        (Some(values), _) => parse_offsets(values.clone())?,
        (None, Some(value)) => vec![value.to_duration()?],
        (None, None) => vec![TimeDelta::zero()],
    };

    let action: Action = rule.action.as_deref().unwrap_or("delete").parse()?;

    let patterns = rule
        .patterns
        .iter()
        .map(|p| build_pattern(p, &notify_before, action))
        .collect::<Result<Vec<_>, _>>()?;

    FolderRule::builder(&rule.path, retention)
        .notify_before(notify_before)
        .exemptions(rule.exemptions.iter().cloned())
        .action(action)
        .patterns(patterns)
        .build()
}

fn build_pattern(
    pattern: &PatternConfig,
    inherited_offsets: &[TimeDelta],
    inherited_action: Action,
) -> Result<PatternRule, Error> {
    let retention = pattern
        .retention_time
        .as_ref()
        .or(pattern.retention.as_ref())
        .ok_or_else(|| Error::MissingRetention(pattern.pattern.clone()))?
        .to_duration()?;

    let notify_before = match &pattern.notify_before {
        Some(values) => parse_offsets(values.clone())?,
        None => inherited_offsets.to_vec(),
    };

    let action = match &pattern.action {
        Some(action) => action.parse()?,
        None => inherited_action,
    };

    PatternRule::builder(&pattern.pattern, retention)
        .notify_before(notify_before)
        .action(action)
        .build()
}

fn rule_retention(rule: &RuleConfig) -> Result<TimeDelta, Error> {
    if let Some(value) = &rule.retention_time {
        return value.to_duration();
    }
    if let Some(value) = &rule.retention {
        return value.to_duration();
    }
    if let Some(days) = rule.retention_days {
        return duration::days(days);
    }
    Err(Error::MissingRetention(rule.path.clone()))
}

fn parse_offsets(values: OneOrMany<DurationValue>) -> Result<Vec<TimeDelta>, Error> {
    values
        .into_vec()
        .iter()
        .map(DurationValue::to_duration)
        .collect()
}
