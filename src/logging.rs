//! Log severity levels and the adjustable log threshold.
//!
//! Levels use the classic numeric scale, where a larger number is a more
//! severe class of message. A resolved environment may push a threshold into a
//! [`LogLevelFilter`]; the binary wires the process-global filter into its
//! tracing subscriber so the threshold takes effect immediately.

use std::sync::atomic::{AtomicI32, Ordering};
use tracing::Level;

pub const LOG_DEBUG10: i32 = 1;
pub const LOG_DEBUG9: i32 = 2;
pub const LOG_DEBUG8: i32 = 3;
pub const LOG_DEBUG7: i32 = 4;
pub const LOG_DEBUG6: i32 = 5;
pub const LOG_DEBUG: i32 = 6;
pub const LOG_NOTICE: i32 = 7;
pub const LOG_SYS_WARNING: i32 = 8;
pub const LOG_ERROR: i32 = 9;
pub const LOG_SYS_FATAL: i32 = 10;
pub const LOG_SQL: i32 = 11;

/// Lowest threshold a configured log level may set.
pub const MIN_LOG_LEVEL: i32 = LOG_SYS_FATAL;

const LEVEL_NAMES: &[(&str, i32)] = &[
    ("LOG_SQL", LOG_SQL),
    ("LOG_SYS_FATAL", LOG_SYS_FATAL),
    ("LOG_SYS_WARNING", LOG_SYS_WARNING),
    ("LOG_ERROR", LOG_ERROR),
    ("LOG_NOTICE", LOG_NOTICE),
    ("LOG_DEBUG", LOG_DEBUG),
    ("LOG_DEBUG6", LOG_DEBUG6),
    ("LOG_DEBUG7", LOG_DEBUG7),
    ("LOG_DEBUG8", LOG_DEBUG8),
    ("LOG_DEBUG9", LOG_DEBUG9),
    ("LOG_DEBUG10", LOG_DEBUG10),
];

/// Convert a numeric string or a level name to a level.
///
/// Numbers in `1..=LOG_SQL` and the `LOG_*` names are recognized; anything
/// else yields 0 (no level).
pub fn convert_log_level(input: &str) -> i32 {
    let input = input.trim();
    if let Ok(n) = input.parse::<i32>() {
        if n > 0 && n <= LOG_SQL {
            return n;
        }
    }
    LEVEL_NAMES
        .iter()
        .find(|(name, _)| *name == input)
        .map_or(0, |(_, level)| *level)
}

/// Parse a log level override.
///
/// Any integer is accepted as-is (so `0` can clear a level); otherwise the
/// symbolic names are tried. `None` if neither applies.
pub fn parse_log_level(input: &str) -> Option<i32> {
    let input = input.trim();
    if let Ok(n) = input.parse::<i32>() {
        return Some(n);
    }
    match convert_log_level(input) {
        0 => None,
        level => Some(level),
    }
}

/// Clamp a positive level up to [`MIN_LOG_LEVEL`]. Non-positive levels mean
/// "not configured" and are returned unchanged.
pub fn clamp_log_level(level: i32) -> i32 {
    if level > 0 && level < MIN_LOG_LEVEL {
        MIN_LOG_LEVEL
    } else {
        level
    }
}

/// Severity of a tracing level on the numeric scale.
///
/// `ERROR` is the most severe level tracing has, so it maps to
/// [`MIN_LOG_LEVEL`]; a clamped threshold still lets error events through.
pub fn tracing_to_level(level: &Level) -> i32 {
    match *level {
        Level::TRACE => LOG_DEBUG8,
        Level::DEBUG => LOG_DEBUG,
        Level::INFO => LOG_NOTICE,
        Level::WARN => LOG_SYS_WARNING,
        _ => MIN_LOG_LEVEL,
    }
}

/// Atomic log threshold.
///
/// A threshold of 0 lets everything through.
#[derive(Debug)]
pub struct LogLevelFilter(AtomicI32);

static GLOBAL_FILTER: LogLevelFilter = LogLevelFilter::new(0);

impl LogLevelFilter {
    /// Create a new filter with the given threshold.
    pub const fn new(level: i32) -> Self {
        Self(AtomicI32::new(level))
    }

    /// The process-wide filter consulted by the binary's subscriber.
    pub fn global() -> &'static LogLevelFilter {
        &GLOBAL_FILTER
    }

    pub fn get(&self) -> i32 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self, level: i32) {
        self.0.store(level, Ordering::Relaxed);
    }

    /// Check if a message at the given numeric level should be logged.
    pub fn should_log(&self, level: i32) -> bool {
        let threshold = self.get();
        threshold <= 0 || level >= threshold
    }

    /// Check a tracing event level against the threshold.
    pub fn allows(&self, level: &Level) -> bool {
        self.should_log(tracing_to_level(level))
    }
}

impl Default for LogLevelFilter {
    fn default() -> Self {
        Self::new(0)
    }
}
