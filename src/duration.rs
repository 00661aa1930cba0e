//! Config files and CLI args write retention as "5d" or "12h" but the engine
//! works on exact spans.
//!
//! Units: `h` hours, `d` days, `w` weeks, `y` 365 days. A bare integer is days.

use crate::Error;
use chrono::TimeDelta;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_DAY: i64 = 86_400;

static DURATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)([hdwy])?$").expect("Invalid duration regex"));

/// Parses `<int>[h|d|w|y]` or a bare `<int>` (days) into an exact span.
///
/// Input is trimmed and case-insensitive.
///
/// # Errors
/// `InvalidDuration` when the text matches neither form or overflows.
pub fn parse_duration(text: &str) -> Result<TimeDelta, Error> {
    let normalized = text.trim().to_lowercase();
    let caps = DURATION_REGEX
        .captures(&normalized)
        .ok_or_else(|| Error::InvalidDuration(text.to_string()))?;

    let amount: i64 = caps[1]
        .parse()
        .map_err(|_| Error::InvalidDuration(text.to_string()))?;
    let unit_secs = match caps.get(2).map_or("d", |m| m.as_str()) {
        "h" => SECS_PER_HOUR,
        "w" => 7 * SECS_PER_DAY,
        "y" => 365 * SECS_PER_DAY,
        _ => SECS_PER_DAY,
    };

    amount
        .checked_mul(unit_secs)
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(|| Error::InvalidDuration(text.to_string()))
}

/// Fractional day counts come from numeric config values like `retention_days = 2.5`.
///
/// # Errors
/// `InvalidDuration` for negative, NaN/infinite, or out-of-range values.
pub fn days(value: f64) -> Result<TimeDelta, Error> {
    if !value.is_finite() {
        return Err(Error::InvalidDuration(value.to_string()));
    }
    if value < 0.0 {
        return Err(Error::InvalidDuration(value.to_string()));
    }
    #[allow(clippy::cast_possible_truncation)]
    let secs = (value * 86_400.0).round() as i64;
    TimeDelta::try_seconds(secs).ok_or_else(|| Error::InvalidDuration(value.to_string()))
}

/// A duration as written in a config file: a number of days or a unit string.
///
/// Booleans deserialize into their own variant so they can be rejected
/// instead of being read as 0/1 days.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl DurationValue {
    /// # Errors
    /// `InvalidDuration` for booleans, negative numbers, and malformed strings.
    pub fn to_duration(&self) -> Result<TimeDelta, Error> {
        match self {
            Self::Flag(b) => Err(Error::InvalidDuration(b.to_string())),
            Self::Number(n) => days(*n),
            Self::Text(s) => parse_duration(s),
        }
    }
}

impl From<&str> for DurationValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for DurationValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for DurationValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

/// Short human form used in log lines: `5d`, `12h`, `90s`.
#[must_use]
pub fn format_duration(d: TimeDelta) -> String {
    let secs = d.num_seconds();
    if secs != 0 && secs % SECS_PER_DAY == 0 {
        format!("{}d", secs / SECS_PER_DAY)
    } else if secs != 0 && secs % SECS_PER_HOUR == 0 {
        format!("{}h", secs / SECS_PER_HOUR)
    } else {
        format!("{secs}s")
    }
}
