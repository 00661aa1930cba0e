//! `chronosweep` - retention-based folder cleanup with advance notices.
//!
//! Each [`FolderRule`] names a directory tree, how long entries may stay,
//! optional per-filename overrides, exemptions, and how far ahead users
//! should be warned. A [`Cleaner`] applies the rules:
//! - [`Cleaner::cleanup`] disposes of expired entries (delete, managed
//!   trash, or OS trash), deepest entries first
//! - [`Cleaner::upcoming_alerts`] computes which notices fire on which date
//! - [`Cleaner::send_notifications`] hands those notices to every [`Notifier`]
//!
//! # Example
//!
//! ```no_run
//! use chronosweep::{Cleaner, FolderRule, PatternRule, parse_duration, local_now};
//!
//! # fn main() -> Result<(), chronosweep::Error> {
//! let screenshots = PatternRule::builder("^ScreenShot", parse_duration("1d")?).build()?;
//! let rule = FolderRule::builder("~/Downloads", parse_duration("10d")?)
//!     .notify_before([parse_duration("2d")?, parse_duration("5d")?])
//!     .exemption("keep.txt")
//!     .pattern(screenshots)
//!     .build()?;
//!
//! let cleaner = Cleaner::new([rule]);
//! let removed = cleaner.cleanup(local_now())?;
//! println!("removed {} entries", removed.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `chronosweep` binary

pub mod alert;
pub mod cleaner;
pub mod config;
pub mod dispose;
pub mod duration;
pub mod error;
pub mod internal;
pub mod level;
pub mod logger;
pub mod notify;
pub mod output;
pub mod rule;
pub mod scan;

#[cfg(feature = "cli")]
pub mod cli;

pub use alert::{Alert, AlertSchedule};
pub use cleaner::{Cleaner, local_now};
pub use config::{Config, Settings};
pub use dispose::{Disposer, SYSTEM_TRASH_ENV};
pub use duration::{DurationValue, parse_duration};
pub use error::Error;
pub use level::Level;
pub use logger::{Logger, LoggerBuilder};
pub use notify::{BannerNotifier, ConsoleNotifier, Notifier, NotifierConfig, build_notifier};
pub use output::{LogRecord, Output, TerminalOutput};
pub use rule::{Action, FolderRule, PatternRule};
pub use scan::{Entry, Policy};
