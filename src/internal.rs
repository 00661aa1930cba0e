//! Process-wide diagnostic logger used by the engine, config loader, and
//! notifiers. Set once through `OnceLock`; calls made before `init` (or in
//! library use without `init`) are silently dropped.

use crate::config::GeneralConfig;
use crate::level::Level;
use crate::logger::Logger;
use std::sync::OnceLock;

static INTERNAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Installs a stderr logger at `level`. Only the first call takes effect.
pub fn init(level: Level, colors: bool) {
    init_with_logger(Logger::builder().level(level).terminal(colors).build());
}

/// Installs a caller-built logger. Only the first call takes effect.
pub fn init_with_logger(logger: Logger) {
    let was_init = INTERNAL_LOGGER.get().is_some();
    INTERNAL_LOGGER.get_or_init(|| logger);
    if !was_init {
        debug("INTERNAL", "Internal logger ready");
    }
}

/// Level and colors from the `[general]` config section; an unparsable
/// level falls back to info.
pub fn init_with_config(general: &GeneralConfig) {
    let level = general.level.parse().unwrap_or(Level::Info);
    init(level, general.colors);
}

fn log(level: Level, scope: &str, msg: &str) {
    if let Some(logger) = INTERNAL_LOGGER.get() {
        logger.log(level, scope, msg);
    }
}

pub fn trace(scope: &str, msg: &str) {
    log(Level::Trace, scope, msg);
}

pub fn debug(scope: &str, msg: &str) {
    log(Level::Debug, scope, msg);
}

pub fn info(scope: &str, msg: &str) {
    log(Level::Info, scope, msg);
}

pub fn warn(scope: &str, msg: &str) {
    log(Level::Warn, scope, msg);
}

pub fn error(scope: &str, msg: &str) {
    log(Level::Error, scope, msg);
}
