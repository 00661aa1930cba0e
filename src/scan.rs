//! Entry discovery and policy resolution shared by cleanup and alert
//! scheduling.

use crate::internal;
use crate::rule::{Action, FolderRule};
use chrono::{DateTime, Local, NaiveDateTime, TimeDelta};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// One file or directory below a rule root, stat'ed once at scan time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Absolute path.
    pub path: PathBuf,
    /// Path relative to the rule root.
    pub relative: PathBuf,
    /// Last modification, naive local time.
    pub modified: NaiveDateTime,
}

impl Entry {
    /// Number of components in the relative path; top-level entries are 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.relative.components().count()
    }
}

/// Retention, action, and lead-times in force for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy<'a> {
    pub retention: TimeDelta,
    pub action: Action,
    pub notify_before: &'a [TimeDelta],
}

impl FolderRule {
    /// A missing or non-directory root is skipped, not reported.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.path().is_dir()
    }

    /// First pattern whose regex prefix-matches the base name wins; otherwise
    /// the folder's own settings apply. Lead-times are replaced, not merged.
    #[must_use]
    pub fn effective_policy(&self, relative: &Path) -> Policy<'_> {
        let name = relative
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        self.patterns()
            .iter()
            .find(|p| p.matches(&name))
            .map_or_else(
                || Policy {
                    retention: self.retention(),
                    action: self.action(),
                    notify_before: self.notify_before(),
                },
                |p| Policy {
                    retention: p.retention(),
                    action: p.action(),
                    notify_before: p.notify_before(),
                },
            )
    }

    /// An exemption matches when it is a component-wise prefix of the relative
    /// path (so whole subtrees are covered), when its last component equals the
    /// entry's base name at any depth, or, for absolute exemptions, only on
    /// exact equality.
    #[must_use]
    pub fn is_exempt(&self, relative: &Path) -> bool {
        self.exemptions().iter().any(|ex| {
            if ex.is_absolute() {
                return relative == ex.as_path();
            }
            relative.starts_with(ex)
                || (ex.file_name().is_some() && ex.file_name() == relative.file_name())
        })
    }
}

/// Lists every descendant of the rule root (files and directories, any depth)
/// in walk order. Symlinked directories are listed but not followed.
///
/// # Errors
/// Fails when the root itself cannot be read. Unreadable subdirectories and
/// entries that vanish between listing and stat are skipped.
pub fn collect_entries(rule: &FolderRule) -> Result<Vec<Entry>, crate::Error> {
    internal::debug("SCAN", &format!("Scanning {}", rule.path().display()));
    let mut entries = Vec::new();
    if rule.is_active() {
        collect_recursive(rule.path(), rule.path(), &mut entries)?;
    }
    internal::debug(
        "SCAN",
        &format!(
            "Found {} entries under {}",
            entries.len(),
            rule.path().display()
        ),
    );
    Ok(entries)
}

fn collect_recursive(
    root: &Path,
    dir: &Path,
    entries: &mut Vec<Entry>,
) -> Result<(), crate::Error> {
    let listing = match fs::read_dir(dir) {
        Ok(listing) => listing,
        // Subdirectory removed mid-walk; the root itself was checked by the caller.
        Err(e) if e.kind() == io::ErrorKind::NotFound && dir != root => return Ok(()),
        Err(e) if dir != root => {
            internal::warn(
                "SCAN",
                &format!("Skipping unreadable directory {}: {e}", dir.display()),
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let mut subdirs = Vec::new();
    for item in listing {
        let item = match item {
            Ok(item) => item,
            Err(e) => {
                internal::warn(
                    "SCAN",
                    &format!("Skipping unreadable entry in {}: {e}", dir.display()),
                );
                continue;
            }
        };
        let path = item.path();
        let Ok(file_type) = item.file_type() else {
            continue;
        };

        let Some(modified) = modified_time(&path) else {
            internal::debug(
                "SCAN",
                &format!("Entry vanished before stat: {}", path.display()),
            );
            continue;
        };

        let relative = path
            .strip_prefix(root)
            .map_err(|_| crate::Error::InvalidPath(path.display().to_string()))?
            .to_path_buf();

        internal::trace("SCAN", &format!("Found: {}", relative.display()));
        if file_type.is_dir() {
            subdirs.push(path.clone());
        }
        entries.push(Entry {
            path,
            relative,
            modified,
        });
    }

    for sub in subdirs {
        collect_recursive(root, &sub, entries)?;
    }

    Ok(())
}

/// Follows symlinks like a plain `stat`; a dangling link falls back to the link itself.
fn modified_time(path: &Path) -> Option<NaiveDateTime> {
    let meta = fs::metadata(path)
        .or_else(|_| fs::symlink_metadata(path))
        .ok()?;
    meta.modified().ok().map(to_naive_local)
}

/// File times are absolute; rules and reference instants are naive local.
#[must_use]
pub fn to_naive_local(time: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(time).naive_local()
}
