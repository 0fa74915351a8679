/// Galaxy3D Engine - global logging hub for the viewport components
///
/// Holds the process-wide logger and severity filter used by the
/// `engine_*!` macros. Both live in thread-safe static storage with RwLock.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Minimum severity forwarded to the logger
static MIN_SEVERITY: OnceLock<RwLock<LogSeverity>> = OnceLock::new();

/// Severity filter applied when nothing was configured
const DEFAULT_MIN_SEVERITY: LogSeverity = LogSeverity::Info;

fn logger_lock() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

fn min_severity_lock() -> &'static RwLock<LogSeverity> {
    MIN_SEVERITY.get_or_init(|| RwLock::new(DEFAULT_MIN_SEVERITY))
}

// ===== PUBLIC API =====

/// Engine logging entry points
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_viewport::galaxy3d::{Engine, log::{Logger, LogEntry, LogSeverity}};
///
/// struct FileLogger;
/// impl Logger for FileLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Write to file...
///     }
/// }
///
/// Engine::set_logger(FileLogger);
/// Engine::set_min_severity(LogSeverity::Debug);
/// ```
pub struct Engine;

impl Engine {
    /// Replace the default logger with a custom implementation
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Set the minimum severity forwarded to the logger
    ///
    /// Entries below this severity are dropped before reaching the logger.
    pub fn set_min_severity(severity: LogSeverity) {
        if let Ok(mut lock) = min_severity_lock().write() {
            *lock = severity;
        }
    }

    /// Current minimum severity (Info unless configured)
    pub fn min_severity() -> LogSeverity {
        min_severity_lock()
            .read()
            .map(|lock| *lock)
            .unwrap_or(DEFAULT_MIN_SEVERITY)
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like engine_info!, engine_warn!, etc.
    ///
    /// # Arguments
    ///
    /// * `severity` - Log severity level
    /// * `source` - Source component (e.g., "galaxy3d::Viewport")
    /// * `message` - Log message
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        });
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by the engine_error! macro to include source location.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: Some(file),
            line: Some(line),
        });
    }

    fn dispatch(entry: LogEntry) {
        if entry.severity < Self::min_severity() {
            return;
        }
        if let Ok(lock) = logger_lock().read() {
            lock.log(&entry);
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
