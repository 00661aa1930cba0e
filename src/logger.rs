//! A `Logger` filters by level and fans each record out to its outputs.
//! Built once through [`LoggerBuilder`] and immutable afterwards.

use crate::level::Level;
use crate::output::{LogRecord, Output, TerminalOutput};

#[derive(Default)]
pub struct Logger {
    min_level: Level,
    outputs: Vec<Box<dyn Output>>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("min_level", &self.min_level)
            .field("outputs", &self.outputs.len())
            .finish()
    }
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    #[must_use]
    pub const fn min_level(&self) -> Level {
        self.min_level
    }

    /// Drops records below the minimum level; output errors are ignored so
    /// logging never aborts a cleanup run.
    pub fn log(&self, level: Level, scope: &str, msg: &str) {
        if level < self.min_level {
            return;
        }

        let record = LogRecord {
            level,
            scope: scope.to_string(),
            message: msg.to_string(),
        };

        for output in &self.outputs {
            let _ = output.write(&record);
        }
    }

    pub fn trace(&self, scope: &str, msg: &str) {
        self.log(Level::Trace, scope, msg);
    }

    pub fn debug(&self, scope: &str, msg: &str) {
        self.log(Level::Debug, scope, msg);
    }

    pub fn info(&self, scope: &str, msg: &str) {
        self.log(Level::Info, scope, msg);
    }

    pub fn warn(&self, scope: &str, msg: &str) {
        self.log(Level::Warn, scope, msg);
    }

    pub fn error(&self, scope: &str, msg: &str) {
        self.log(Level::Error, scope, msg);
    }

    pub fn flush(&self) {
        for output in &self.outputs {
            let _ = output.flush();
        }
    }
}

/// Stepwise logger construction.
#[derive(Default)]
pub struct LoggerBuilder {
    min_level: Level,
    outputs: Vec<Box<dyn Output>>,
}

impl LoggerBuilder {
    /// Info level, no outputs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Adds a stderr backend.
    #[must_use]
    pub fn terminal(self, colors: bool) -> Self {
        self.output(TerminalOutput::new().colors(colors))
    }

    #[must_use]
    pub fn output(mut self, output: impl Output + 'static) -> Self {
        self.outputs.push(Box::new(output));
        self
    }

    #[must_use]
    pub fn build(self) -> Logger {
        Logger {
            min_level: self.min_level,
            outputs: self.outputs,
        }
    }
}
