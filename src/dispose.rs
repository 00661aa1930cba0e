//! The three ways an expired entry leaves its folder: permanent removal,
//! a move into the managed trash, or a move into the OS trash.

use crate::internal;
use crate::rule::Action;
use chrono::Local;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Env var consulted at the config boundary for the OS-trash root.
pub const SYSTEM_TRASH_ENV: &str = "CHRONOSWEEP_SYSTEM_TRASH_OVERRIDE";

/// OS-trash root from the override variable, else the per-user default
/// (`~/.Trash` on macOS, `<data_dir>/Trash/files` elsewhere).
#[must_use]
pub fn system_trash_from_env() -> Option<PathBuf> {
    if let Ok(value) = std::env::var(SYSTEM_TRASH_ENV)
        && !value.trim().is_empty()
    {
        return Some(PathBuf::from(shellexpand::tilde(value.trim()).as_ref()));
    }
    default_system_trash()
}

fn default_system_trash() -> Option<PathBuf> {
    let dirs = directories::BaseDirs::new()?;
    if cfg!(target_os = "macos") {
        Some(dirs.home_dir().join(".Trash"))
    } else {
        Some(dirs.data_dir().join("Trash").join("files"))
    }
}

/// Carries the trash roots so the engine never reads ambient state.
#[derive(Debug, Clone, Default)]
pub struct Disposer {
    trash_dir: Option<PathBuf>,
    system_trash_dir: Option<PathBuf>,
}

impl Disposer {
    #[must_use]
    pub const fn new(trash_dir: Option<PathBuf>, system_trash_dir: Option<PathBuf>) -> Self {
        Self {
            trash_dir,
            system_trash_dir,
        }
    }

    #[must_use]
    pub fn trash_dir(&self) -> Option<&Path> {
        self.trash_dir.as_deref()
    }

    #[must_use]
    pub fn system_trash_dir(&self) -> Option<&Path> {
        self.system_trash_dir.as_deref()
    }

    /// Applies `action` to `path` and returns where the entry ended up
    /// (the original path when it was deleted).
    ///
    /// `root_name` is the rule root's final component; trashed entries land
    /// under `<trash>/<root_name>/<relative>`.
    ///
    /// # Errors
    /// I/O failures from delete or managed-trash moves. OS-trash failures fall
    /// back to deletion and only surface if the deletion also fails.
    pub fn dispose(
        &self,
        action: Action,
        root_name: &str,
        path: &Path,
        relative: &Path,
    ) -> Result<PathBuf, crate::Error> {
        match action {
            Action::Delete => {
                remove_path(path)?;
                Ok(path.to_path_buf())
            }
            Action::Trash => self.move_to_trash(root_name, path, relative),
            Action::SystemTrash => self.move_to_system_trash(root_name, path, relative),
        }
    }

    fn move_to_trash(
        &self,
        root_name: &str,
        path: &Path,
        relative: &Path,
    ) -> Result<PathBuf, crate::Error> {
        let Some(trash) = &self.trash_dir else {
            internal::debug("DISPOSE", "No trash directory configured, deleting instead");
            remove_path(path)?;
            return Ok(path.to_path_buf());
        };

        Ok(move_into(trash, root_name, path, relative)?)
    }

    fn move_to_system_trash(
        &self,
        root_name: &str,
        path: &Path,
        relative: &Path,
    ) -> Result<PathBuf, crate::Error> {
        let moved = self
            .system_trash_dir
            .as_deref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no system trash directory"))
            .and_then(|trash| {
                fs::create_dir_all(trash)?;
                move_into(trash, root_name, path, relative)
            });

        match moved {
            Ok(target) => Ok(target),
            Err(e) => {
                internal::warn(
                    "DISPOSE",
                    &format!(
                        "System trash move failed for {} ({e}), deleting instead",
                        path.display()
                    ),
                );
                remove_path(path)?;
                Ok(path.to_path_buf())
            }
        }
    }
}

/// Directories go recursively, everything else (including symlinks) is unlinked.
///
/// # Errors
/// Any I/O failure, including `NotFound` when the entry is already gone.
pub fn remove_path(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

fn move_into(trash: &Path, root_name: &str, path: &Path, relative: &Path) -> io::Result<PathBuf> {
    let target = trash.join(root_name).join(relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let target = unique_target(target);
    move_path(path, &target)?;
    internal::debug(
        "DISPOSE",
        &format!("Moved {} -> {}", path.display(), target.display()),
    );
    Ok(target)
}

/// Appends `__YYYYMMDDHHMMSS` when the target is taken, then a counter if
/// that is taken too.
fn unique_target(target: PathBuf) -> PathBuf {
    if fs::symlink_metadata(&target).is_err() {
        return target;
    }
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stamp = Local::now().format("%Y%m%d%H%M%S").to_string();
    let stamped = target.with_file_name(format!("{name}__{stamp}"));
    if fs::symlink_metadata(&stamped).is_err() {
        return stamped;
    }
    (1u32..)
        .map(|n| target.with_file_name(format!("{name}__{stamp}_{n}")))
        .find(|candidate| fs::symlink_metadata(candidate).is_err())
        .unwrap_or(stamped)
}

/// `rename`, falling back to copy-then-remove across filesystems.
fn move_path(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            copy_recursive(from, to)?;
            remove_path(from)
        }
        other => other,
    }
}

fn copy_recursive(from: &Path, to: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(from)?;
    if meta.is_dir() {
        fs::create_dir_all(to)?;
        for item in fs::read_dir(from)? {
            let item = item?;
            copy_recursive(&item.path(), &to.join(item.file_name()))?;
        }
    } else if meta.file_type().is_symlink() {
        #[cfg(unix)]
        std::os::unix::fs::symlink(fs::read_link(from)?, to)?;
        #[cfg(not(unix))]
        fs::copy(from, to)?;
    } else {
        fs::copy(from, to)?;
    }
    Ok(())
}
