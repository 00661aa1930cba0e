//! The engine: one pass that disposes of expired entries, and one read-only
//! pass that works out which upcoming removals deserve a notice.
//!
//! Both passes re-read the filesystem every call; nothing is remembered
//! between runs.

use crate::Error;
use crate::alert::{Alert, AlertSchedule};
use crate::dispose::Disposer;
use crate::internal;
use crate::notify::Notifier;
use crate::rule::{FolderRule, resolve_path};
use crate::scan::{Entry, collect_entries};
use chrono::{Days, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Current wall-clock time as the naive local instant the engine expects.
#[must_use]
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Rules plus everything needed to act on them.
pub struct Cleaner {
    rules: Vec<FolderRule>,
    disposer: Disposer,
    notifiers: Vec<Box<dyn Notifier>>,
    dry_run: bool,
}

impl std::fmt::Debug for Cleaner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cleaner")
            .field("rules", &self.rules)
            .field("disposer", &self.disposer)
            .field(
                "notifiers",
                &self.notifiers.iter().map(|n| n.name()).collect::<Vec<_>>(),
            )
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Cleaner {
    /// No trash directories and no notifiers: `trash` degrades to delete and
    /// `system_trash` falls back to delete until roots are supplied.
    #[must_use]
    pub fn new(rules: impl IntoIterator<Item = FolderRule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
            disposer: Disposer::default(),
            notifiers: Vec::new(),
            dry_run: false,
        }
    }

    /// Managed trash root for `Action::Trash`.
    ///
    /// # Errors
    /// `InvalidPath` when the directory cannot be made absolute.
    pub fn trash_dir(mut self, dir: impl AsRef<Path>) -> Result<Self, Error> {
        let trash = resolve_path(dir.as_ref())?;
        self.disposer = Disposer::new(
            Some(trash),
            self.disposer.system_trash_dir().map(Path::to_path_buf),
        );
        Ok(self)
    }

    /// OS trash root for `Action::SystemTrash`.
    #[must_use]
    pub fn system_trash_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.disposer = Disposer::new(
            self.disposer.trash_dir().map(Path::to_path_buf),
            Some(dir.into()),
        );
        self
    }

    #[must_use]
    pub fn notifier(self, notifier: impl Notifier + 'static) -> Self {
        self.boxed_notifier(Box::new(notifier))
    }

    #[must_use]
    pub fn boxed_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    /// Report what `cleanup` would dispose of without touching anything.
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub fn rules(&self) -> &[FolderRule] {
        &self.rules
    }

    #[must_use]
    pub const fn disposer(&self) -> &Disposer {
        &self.disposer
    }

    #[must_use]
    pub fn notifiers(&self) -> &[Box<dyn Notifier>] {
        &self.notifiers
    }

    /// Disposes of every non-exempt entry whose age as of `as_of` has reached
    /// its effective retention. Entries are handled deepest first within each
    /// rule so a directory is only touched after all of its children.
    ///
    /// Returns the final location of each disposed entry in processing order
    /// (the original path for deletions, the trash path for moves). In dry-run
    /// mode the original paths are returned and nothing is modified.
    ///
    /// # Errors
    /// Directory read failures and disposal I/O errors. An entry that has
    /// already disappeared is skipped, not reported.
    pub fn cleanup(&self, as_of: NaiveDateTime) -> Result<Vec<PathBuf>, Error> {
        internal::info(
            "CLEANUP",
            &format!(
                "Starting cleanup of {} rule(s) as of {as_of} (dry_run={})",
                self.rules.len(),
                self.dry_run
            ),
        );
        let mut removed = Vec::new();

        for rule in &self.rules {
            if !rule.is_active() {
                internal::debug(
                    "CLEANUP",
                    &format!("Skipping {}: not a directory", rule.path().display()),
                );
                continue;
            }

            let entries = collect_entries(rule)?;
            self.sweep(rule, entries, as_of, &mut removed)?;
        }

        internal::info(
            "CLEANUP",
            &format!("Cleanup complete: {} entries", removed.len()),
        );
        Ok(removed)
    }

    /// Disposes of the due entries of one rule, deepest first. Entries that
    /// are already gone are logged and skipped.
    fn sweep(
        &self,
        rule: &FolderRule,
        mut entries: Vec<Entry>,
        as_of: NaiveDateTime,
        removed: &mut Vec<PathBuf>,
    ) -> Result<(), Error> {
        // Stable sort keeps walk order within one depth.
        entries.sort_by_key(|e| Reverse(e.depth()));
        let root_name = rule
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        for entry in &entries {
            if rule.is_exempt(&entry.relative) {
                internal::trace(
                    "CLEANUP",
                    &format!("Exempt: {}", entry.relative.display()),
                );
                continue;
            }

            let policy = rule.effective_policy(&entry.relative);
            if as_of - entry.modified < policy.retention {
                continue;
            }

            if self.dry_run {
                removed.push(entry.path.clone());
                continue;
            }

            match self
                .disposer
                .dispose(policy.action, &root_name, &entry.path, &entry.relative)
            {
                Ok(target) => {
                    internal::info(
                        "CLEANUP",
                        &format!("{} {}", policy.action, entry.path.display()),
                    );
                    removed.push(target);
                }
                Err(Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                    internal::warn(
                        "CLEANUP",
                        &format!("Vanished before disposal: {}", entry.path.display()),
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Notices due in `[as_of.date(), as_of.date() + window_days]`, keyed by
    /// date. Each due instant (modified + retention) is shifted back by every
    /// lead-time; entries already overdue at `as_of` get no notice. Files of
    /// one folder landing on the same date share one [`Alert`].
    ///
    /// # Errors
    /// Directory read failures.
    pub fn upcoming_alerts(
        &self,
        as_of: NaiveDateTime,
        window_days: u32,
    ) -> Result<AlertSchedule, Error> {
        let as_of_date = as_of.date();
        let end_date = as_of_date
            .checked_add_days(Days::new(u64::from(window_days)))
            .unwrap_or(NaiveDate::MAX);

        // date -> [(folder, [(relative, due)])], folders kept in first-seen order
        let mut schedule: BTreeMap<NaiveDate, Vec<(PathBuf, Vec<(PathBuf, NaiveDate)>)>> =
            BTreeMap::new();

        for rule in &self.rules {
            if !rule.is_active() {
                continue;
            }

            for entry in collect_entries(rule)? {
                if rule.is_exempt(&entry.relative) {
                    continue;
                }

                let policy = rule.effective_policy(&entry.relative);
                let Some(due) = entry.modified.checked_add_signed(policy.retention) else {
                    continue;
                };
                if due < as_of {
                    continue;
                }

                for lead in policy.notify_before {
                    let Some(alert_at) = due.checked_sub_signed(*lead) else {
                        continue;
                    };
                    let alert_date = alert_at.date();
                    if alert_date < as_of_date || alert_date > end_date {
                        continue;
                    }

                    let folders = schedule.entry(alert_date).or_default();
                    let item = (entry.relative.clone(), due.date());
                    if let Some((_, files)) = folders.iter_mut().find(|(f, _)| f == rule.path()) {
                        files.push(item);
                    } else {
                        folders.push((rule.path().to_path_buf(), vec![item]));
                    }
                }
            }
        }

        let alerts: AlertSchedule = schedule
            .into_iter()
            .map(|(alert_date, folders)| {
                let day_alerts = folders
                    .into_iter()
                    .map(|(folder, files)| build_alert(folder, files, alert_date, as_of))
                    .collect();
                (alert_date, day_alerts)
            })
            .collect();

        internal::debug(
            "ALERTS",
            &format!(
                "{} alert(s) across {} date(s) in the next {window_days} day(s)",
                alerts.values().map(Vec::len).sum::<usize>(),
                alerts.len()
            ),
        );
        Ok(alerts)
    }

    /// Computes the schedule once and hands it to every notifier.
    ///
    /// # Errors
    /// Scan failures, or the first notifier that fails.
    pub fn send_notifications(&self, as_of: NaiveDateTime, window_days: u32) -> Result<(), Error> {
        let alerts = self.upcoming_alerts(as_of, window_days)?;
        for notifier in &self.notifiers {
            internal::debug(
                "NOTIFY",
                &format!("Sending {} date(s) via {}", alerts.len(), notifier.name()),
            );
            notifier.send(&alerts)?;
        }
        Ok(())
    }
}

fn build_alert(
    folder: PathBuf,
    mut files: Vec<(PathBuf, NaiveDate)>,
    alert_date: NaiveDate,
    as_of: NaiveDateTime,
) -> Alert {
    files.sort_by(|(a, _), (b, _)| a.to_string_lossy().cmp(&b.to_string_lossy()));
    // Two lead-times can land the same file on the same date.
    files.dedup_by(|(a, _), (b, _)| a == b);

    let days_until_deletion = files
        .iter()
        .map(|(_, due)| ceil_days(due.and_time(NaiveTime::MIN) - as_of))
        .min()
        .unwrap_or(0);

    Alert {
        folder,
        files: files.into_iter().map(|(path, _)| path).collect(),
        alert_date,
        days_until_deletion: u32::try_from(days_until_deletion.max(0)).unwrap_or(u32::MAX),
    }
}

fn ceil_days(delta: TimeDelta) -> i64 {
    let millis = delta.num_milliseconds();
    millis.div_euclid(MILLIS_PER_DAY) + i64::from(millis.rem_euclid(MILLIS_PER_DAY) != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn entries_gone_before_disposal_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();
        for name in ["a.txt", "b.txt", "c.txt", "gone/inner.txt"] {
            let path = base.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "x").unwrap();
        }

        let cleaner = Cleaner::new([FolderRule::builder(&base, TimeDelta::days(1))
            .build()
            .unwrap()]);
        let rule = &cleaner.rules()[0];
        let entries = collect_entries(rule).unwrap();
        assert_eq!(entries.len(), 5);

        fs::remove_file(base.join("b.txt")).unwrap();
        fs::remove_dir_all(base.join("gone")).unwrap();

        let mut removed = Vec::new();
        let as_of = local_now() + TimeDelta::days(10);
        cleaner.sweep(rule, entries, as_of, &mut removed).unwrap();

        removed.sort();
        assert_eq!(removed, vec![base.join("a.txt"), base.join("c.txt")]);
        assert!(fs::read_dir(&base).unwrap().next().is_none());
    }

    #[test]
    fn days_round_up() {
        assert_eq!(ceil_days(TimeDelta::hours(36)), 2);
        assert_eq!(ceil_days(TimeDelta::days(2)), 2);
        assert_eq!(ceil_days(TimeDelta::hours(-8)), 0);
        assert_eq!(ceil_days(TimeDelta::hours(-30)), -1);
    }
}
