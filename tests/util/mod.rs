//! Scratch-tree helpers shared by the integration tests.

#![allow(dead_code)]

use chrono::{Local, NaiveDate, NaiveDateTime, TimeDelta, TimeZone};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::TempDir;

/// Naive local instant.
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// Temp dir plus its canonical path (rule roots are canonicalized).
pub fn scratch() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let base = dir.path().canonicalize().unwrap();
    (dir, base)
}

pub fn set_mtime(path: &Path, when: NaiveDateTime) {
    let local = Local.from_local_datetime(&when).earliest().unwrap();
    let time = SystemTime::from(local);
    File::open(path).unwrap().set_modified(time).unwrap();
}

/// Creates `path` (and parents) with `content`, last modified at `when`.
pub fn touch(path: &Path, content: &str, when: NaiveDateTime) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
    set_mtime(path, when);
}

/// Creates `path` last modified `age` before `base`.
pub fn touch_aged(path: &Path, base: NaiveDateTime, age: TimeDelta) {
    touch(path, "data", base - age);
}
