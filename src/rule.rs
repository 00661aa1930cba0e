//! Retention rules are built once by the config loader and never mutated
//! afterwards. Builders validate everything up front, so a `FolderRule`
//! that exists is always a valid one.

use crate::Error;
use crate::duration::format_duration;
use chrono::TimeDelta;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

/// What happens to an entry once its retention has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Action {
    /// Permanent removal (recursive for directories).
    #[default]
    Delete,
    /// Move into the configured managed trash directory.
    Trash,
    /// Move into the operating system's per-user trash.
    SystemTrash,
}

impl Action {
    /// Spelling used in config files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Trash => "trash",
            Self::SystemTrash => "system_trash",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "delete" => Ok(Self::Delete),
            "trash" => Ok(Self::Trash),
            "system_trash" => Ok(Self::SystemTrash),
            other => Err(Error::InvalidAction(other.to_string())),
        }
    }
}

/// Per-filename override inside a folder rule.
///
/// The pattern is matched against an entry's base name anchored at the
/// start only, so `^Screen` matches both `ScreenShot_1.png` and `Screenish.txt`.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pattern: String,
    regex: Regex,
    retention: TimeDelta,
    notify_before: Vec<TimeDelta>,
    action: Action,
}

impl PatternRule {
    #[must_use]
    pub fn builder(pattern: impl Into<String>, retention: TimeDelta) -> PatternRuleBuilder {
        PatternRuleBuilder {
            pattern: pattern.into(),
            retention,
            notify_before: vec![TimeDelta::zero()],
            action: Action::Delete,
        }
    }

    /// The pattern as written (trimmed).
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub const fn retention(&self) -> TimeDelta {
        self.retention
    }

    /// Ascending, deduplicated.
    #[must_use]
    pub fn notify_before(&self) -> &[TimeDelta] {
        &self.notify_before
    }

    #[must_use]
    pub const fn action(&self) -> Action {
        self.action
    }

    /// Prefix match against a base name (no requirement to consume the whole name).
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

/// Stepwise construction for [`PatternRule`]; `build` performs all validation.
#[derive(Debug, Clone)]
pub struct PatternRuleBuilder {
    pattern: String,
    retention: TimeDelta,
    notify_before: Vec<TimeDelta>,
    action: Action,
}

impl PatternRuleBuilder {
    /// Replaces the default `[0]` lead-time set.
    #[must_use]
    pub fn notify_before(mut self, offsets: impl IntoIterator<Item = TimeDelta>) -> Self {
        self.notify_before = offsets.into_iter().collect();
        self
    }

    #[must_use]
    pub const fn action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    /// # Errors
    /// `NegativeDuration` for a negative retention or lead-time,
    /// `InvalidPattern` when the regex does not compile.
    pub fn build(self) -> Result<PatternRule, Error> {
        let pattern = self.pattern.trim().to_string();
        check_non_negative(self.retention)?;
        let notify_before = normalize_offsets(self.notify_before)?;

        // `^` pins the match to position 0 without forcing a full-string match.
        let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|source| {
            Error::InvalidPattern {
                pattern: pattern.clone(),
                source,
            }
        })?;

        Ok(PatternRule {
            pattern,
            regex,
            retention: self.retention,
            notify_before,
            action: self.action,
        })
    }
}

/// Retention policy for one directory tree.
#[derive(Debug, Clone)]
pub struct FolderRule {
    path: PathBuf,
    retention: TimeDelta,
    notify_before: Vec<TimeDelta>,
    exemptions: Vec<PathBuf>,
    action: Action,
    patterns: Vec<PatternRule>,
}

impl FolderRule {
    #[must_use]
    pub fn builder(path: impl Into<PathBuf>, retention: TimeDelta) -> FolderRuleBuilder {
        FolderRuleBuilder {
            path: path.into(),
            retention,
            notify_before: vec![TimeDelta::zero()],
            exemptions: Vec::new(),
            action: Action::Delete,
            patterns: Vec::new(),
        }
    }

    /// Absolute, canonical when the directory existed at build time.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn retention(&self) -> TimeDelta {
        self.retention
    }

    /// Ascending, deduplicated.
    #[must_use]
    pub fn notify_before(&self) -> &[TimeDelta] {
        &self.notify_before
    }

    /// Relative paths or bare names, `.` components stripped, sorted.
    #[must_use]
    pub fn exemptions(&self) -> &[PathBuf] {
        &self.exemptions
    }

    #[must_use]
    pub const fn action(&self) -> Action {
        self.action
    }

    /// In declared order; the first match wins.
    #[must_use]
    pub fn patterns(&self) -> &[PatternRule] {
        &self.patterns
    }
}

/// Stepwise construction for [`FolderRule`]; `build` performs all validation.
#[derive(Debug, Clone)]
pub struct FolderRuleBuilder {
    path: PathBuf,
    retention: TimeDelta,
    notify_before: Vec<TimeDelta>,
    exemptions: Vec<String>,
    action: Action,
    patterns: Vec<PatternRule>,
}

impl FolderRuleBuilder {
    /// Replaces the default `[0]` lead-time set.
    #[must_use]
    pub fn notify_before(mut self, offsets: impl IntoIterator<Item = TimeDelta>) -> Self {
        self.notify_before = offsets.into_iter().collect();
        self
    }

    #[must_use]
    pub fn exemption(mut self, exemption: impl Into<String>) -> Self {
        self.exemptions.push(exemption.into());
        self
    }

    #[must_use]
    pub fn exemptions<I, S>(mut self, exemptions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exemptions.extend(exemptions.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub const fn action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    /// Appends an override; order of calls is match order.
    #[must_use]
    pub fn pattern(mut self, pattern: PatternRule) -> Self {
        self.patterns.push(pattern);
        self
    }

    #[must_use]
    pub fn patterns(mut self, patterns: impl IntoIterator<Item = PatternRule>) -> Self {
        self.patterns.extend(patterns);
        self
    }

    /// # Errors
    /// `NegativeDuration` for a negative retention or lead-time,
    /// `InvalidPath` when the path cannot be made absolute.
    pub fn build(self) -> Result<FolderRule, Error> {
        check_non_negative(self.retention)?;
        let notify_before = normalize_offsets(self.notify_before)?;
        let path = resolve_path(&self.path)?;

        let exemptions: BTreeSet<PathBuf> = self
            .exemptions
            .iter()
            .map(|ex| ex.trim())
            .filter(|ex| !ex.is_empty())
            .map(|ex| {
                Path::new(ex)
                    .components()
                    .filter(|c| !matches!(c, Component::CurDir))
                    .collect::<PathBuf>()
            })
            .filter(|ex| !ex.as_os_str().is_empty())
            .collect();

        Ok(FolderRule {
            path,
            retention: self.retention,
            notify_before,
            exemptions: exemptions.into_iter().collect(),
            action: self.action,
            patterns: self.patterns,
        })
    }
}

fn check_non_negative(d: TimeDelta) -> Result<(), Error> {
    if d < TimeDelta::zero() {
        return Err(Error::NegativeDuration(format_duration(d)));
    }
    Ok(())
}

fn normalize_offsets(offsets: Vec<TimeDelta>) -> Result<Vec<TimeDelta>, Error> {
    for offset in &offsets {
        check_non_negative(*offset)?;
    }
    let set: BTreeSet<TimeDelta> = offsets.into_iter().collect();
    Ok(set.into_iter().collect())
}

/// Tilde-expands and absolutizes; symlinks are resolved only when the path exists.
pub(crate) fn resolve_path(path: &Path) -> Result<PathBuf, Error> {
    let raw = path.to_string_lossy();
    let expanded = PathBuf::from(shellexpand::tilde(&raw).as_ref());
    if let Ok(canonical) = expanded.canonicalize() {
        return Ok(canonical);
    }
    std::path::absolute(&expanded).map_err(|e| Error::InvalidPath(format!("{raw}: {e}")))
}
