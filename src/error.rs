//! Unified error type for all chronosweep operations.

/// Error type for chronosweep operations.
#[derive(Debug)]
pub enum Error {
    /// I/O error.
    Io(std::io::Error),
    /// TOML config parsing error.
    ConfigParse(toml::de::Error),
    /// JSON config parsing error.
    JsonParse(serde_json::Error),
    /// Config directory not found.
    ConfigDirNotFound,
    /// Duration value that is neither `<int>[hdwy]`, a bare integer, nor a number.
    InvalidDuration(String),
    /// Retention or lead-time below zero.
    NegativeDuration(String),
    /// Action name outside `delete`, `trash`, `system_trash`.
    InvalidAction(String),
    /// Pattern override that does not compile as a regex.
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
    /// Rule entry without any retention key.
    MissingRetention(String),
    /// Invalid path.
    InvalidPath(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ConfigParse(e) => write!(f, "parse error: {e}"),
            Self::JsonParse(e) => write!(f, "JSON parse error: {e}"),
            Self::ConfigDirNotFound => write!(f, "config directory not found"),
            Self::InvalidDuration(s) => {
                write!(f, "invalid duration '{s}' (expected e.g. '5d', '12h', '1y')")
            }
            Self::NegativeDuration(s) => write!(f, "duration must be >= 0, got {s}"),
            Self::InvalidAction(s) => write!(
                f,
                "invalid action '{s}' (expected 'delete', 'trash', or 'system_trash')"
            ),
            Self::InvalidPattern { pattern, source } => {
                write!(f, "invalid pattern '{pattern}': {source}")
            }
            Self::MissingRetention(path) => write!(
                f,
                "rule for {path} has no retention (use retention_time like '5d', '12h', or retention_days)"
            ),
            Self::InvalidPath(s) => write!(f, "invalid path: {s}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::ConfigParse(e) => Some(e),
            Self::JsonParse(e) => Some(e),
            Self::InvalidPattern { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::ConfigParse(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::JsonParse(e)
    }
}
