//! Where diagnostic records go. The terminal backend covers the binary;
//! library users can attach their own `Output` to capture records.

mod terminal;

pub use terminal::TerminalOutput;

use crate::level::Level;

/// One diagnostic line before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: Level,
    pub scope: String,
    pub message: String,
}

/// `Send + Sync` so a single logger can sit in a process-wide static.
pub trait Output: Send + Sync {
    /// # Errors
    /// I/O errors from the underlying sink.
    fn write(&self, record: &LogRecord) -> Result<(), crate::Error>;

    /// # Errors
    /// I/O errors from the underlying sink.
    fn flush(&self) -> Result<(), crate::Error>;
}
