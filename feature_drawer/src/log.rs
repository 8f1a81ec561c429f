//! Drawer logging
//!
//! One process-wide `Logger` slot (colored console by default) fed by the
//! `fd_*` macros. Every entry carries a source tag such as
//! `"fdraw::SpatialGrid"`; errors also carry their call site.
//!
//! Per-frame messages are logged at Trace. `set_min_severity` drops
//! everything below a threshold before the message is even formatted.

use colored::*;
use std::fmt::Display;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use chrono::{DateTime, Local};

static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();
static MIN_SEVERITY: AtomicU8 = AtomicU8::new(LogSeverity::Trace as u8);

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Destination for drawer log entries.
///
/// ```no_run
/// use feature_drawer::fdraw::log::{Logger, LogEntry};
///
/// struct ConsoleForward;
///
/// impl Logger for ConsoleForward {
///     fn log(&self, entry: &LogEntry) {
///         eprintln!("{}: {}", entry.source, entry.message);
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    /// Component tag, e.g. "fdraw::VisibilityClassifier"
    pub source: String,
    pub message: String,
    /// Call site, set for errors only
    pub file: Option<&'static str>,
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogSeverity {
    /// Per-frame chatter (classification summaries, reused classifications)
    Trace = 0,
    Debug = 1,
    Info = 2,
    /// Recoverable anomalies (clamped config, unknown keys)
    Warn = 3,
    Error = 4,
}

impl LogSeverity {
    /// Fixed-width tag used by the default logger.
    pub const fn label(self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => LogSeverity::Trace,
            1 => LogSeverity::Debug,
            2 => LogSeverity::Info,
            3 => LogSeverity::Warn,
            _ => LogSeverity::Error,
        }
    }
}

/// Console logger: `[timestamp] [SEVERITY] [source] message (file:line)`.
///
/// Warnings and errors go to stderr, everything else to stdout.
pub struct DefaultLogger;

impl DefaultLogger {
    /// The line `log` prints, without colors.
    pub fn format_line(entry: &LogEntry) -> String {
        compose(entry, entry.severity.label(), &entry.source)
    }
}

fn compose(entry: &LogEntry, severity: impl Display, source: impl Display) -> String {
    let timestamp: DateTime<Local> = entry.timestamp.into();
    let mut line = format!(
        "[{}] [{}] [{}] {}",
        timestamp.format(TIMESTAMP_FORMAT), severity, source, entry.message
    );
    if let (Some(file), Some(line_no)) = (entry.file, entry.line) {
        line.push_str(&format!(" ({}:{})", file, line_no));
    }
    line
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let label = entry.severity.label();
        let severity = match entry.severity {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
        };
        let line = compose(entry, severity, entry.source.bright_blue());

        if entry.severity >= LogSeverity::Warn {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

fn logger_slot() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

pub fn set_logger<L: Logger + 'static>(logger: L) {
    if let Ok(mut slot) = logger_slot().write() {
        *slot = Box::new(logger);
    }
}

/// Back to the colored console logger.
pub fn reset_logger() {
    set_logger(DefaultLogger);
}

/// Drop entries below `severity`. Defaults to Trace (keep everything).
pub fn set_min_severity(severity: LogSeverity) {
    MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
}

pub fn min_severity() -> LogSeverity {
    LogSeverity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
}

/// Whether an entry of `severity` would reach the logger.
pub fn enabled(severity: LogSeverity) -> bool {
    severity >= min_severity()
}

fn dispatch(severity: LogSeverity, source: &str, message: String, site: Option<(&'static str, u32)>) {
    if !enabled(severity) {
        return;
    }
    if let Ok(slot) = logger_slot().read() {
        slot.log(&LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: site.map(|(file, _)| file),
            line: site.map(|(_, line)| line),
        });
    }
}

pub fn log(severity: LogSeverity, source: &str, message: String) {
    dispatch(severity, source, message, None);
}

/// Like `log`, with the call site attached.
pub fn log_detailed(severity: LogSeverity, source: &str, message: String, file: &'static str, line: u32) {
    dispatch(severity, source, message, Some((file, line)));
}

// ===== LOGGING MACROS =====

#[doc(hidden)]
#[macro_export]
macro_rules! fd_log {
    ($severity:ident, $source:expr, $($arg:tt)*) => {
        if $crate::log::enabled($crate::log::LogSeverity::$severity) {
            $crate::log::log($crate::log::LogSeverity::$severity, $source, format!($($arg)*));
        }
    };
}

/// Per-frame message.
///
/// ```no_run
/// feature_drawer::fd_trace!("fdraw::VisibilityClassifier", "visited {} quads", 12);
/// ```
#[macro_export]
macro_rules! fd_trace {
    ($source:expr, $($arg:tt)*) => { $crate::fd_log!(Trace, $source, $($arg)*) };
}

#[macro_export]
macro_rules! fd_debug {
    ($source:expr, $($arg:tt)*) => { $crate::fd_log!(Debug, $source, $($arg)*) };
}

/// ```no_run
/// feature_drawer::fd_info!("fdraw::SpatialGrid", "resized to {}x{}", 4, 4);
/// ```
#[macro_export]
macro_rules! fd_info {
    ($source:expr, $($arg:tt)*) => { $crate::fd_log!(Info, $source, $($arg)*) };
}

#[macro_export]
macro_rules! fd_warn {
    ($source:expr, $($arg:tt)*) => { $crate::fd_log!(Warn, $source, $($arg)*) };
}

/// Error with the caller's file and line.
#[macro_export]
macro_rules! fd_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
