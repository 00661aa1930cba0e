//! Advance notices produced by the scheduler and consumed by notifiers.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Alerts keyed by the date they should fire, ascending.
pub type AlertSchedule = BTreeMap<NaiveDate, Vec<Alert>>;

/// All files of one folder whose notice falls on the same date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Rule root the files live under.
    pub folder: PathBuf,
    /// Paths relative to `folder`, sorted lexicographically.
    pub files: Vec<PathBuf>,
    pub alert_date: NaiveDate,
    /// Smallest whole-day count to removal across `files`, rounded up.
    pub days_until_deletion: u32,
}

impl Alert {
    /// `"today"` when nothing remains, otherwise `"in N days"`.
    #[must_use]
    pub fn suffix(&self) -> String {
        if self.days_until_deletion == 0 {
            "today".to_string()
        } else {
            format!("in {} days", self.days_until_deletion)
        }
    }

    /// `a.txt, b/c.txt`
    #[must_use]
    pub fn files_display(&self) -> String {
        self.files
            .iter()
            .map(|f| f.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `<folder>: <file1, file2> (<suffix>)`
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "{}: {} ({})",
            self.folder.display(),
            self.files_display(),
            self.suffix()
        )
    }
}
