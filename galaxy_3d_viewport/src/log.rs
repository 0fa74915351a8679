//! Internal logging system for the Galaxy3D viewport
//!
//! This module provides the logging facade used by every viewport component:
//! - Customizable logger via Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - Colored console output by default
//! - File and line information for ERROR logs
//! - `engine_err!` / `engine_bail!` to log an error and build/return it in one step

use colored::*;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Logger trait for custom logging implementations
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_viewport::galaxy3d::log::{Logger, LogEntry};
///
/// struct FileLogger {
///     file: std::fs::File,
/// }
///
/// impl Logger for FileLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Write to file...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level (Trace, Debug, Info, Warn, Error)
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source component (e.g., "galaxy3d::Viewport", "galaxy3d::DebugDepth")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Very verbose information (per-frame no-ops, repeated binds)
    Trace,

    /// Resource allocation and teardown details
    Debug,

    /// Important informational messages
    Info,

    /// Recoverable anomalies
    Warn,

    /// Failures, reported with file:line details
    Error,
}

impl LogSeverity {
    /// Fixed-width label used by the console logger
    pub fn label(&self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }
}

/// Default logger implementation using colored console output
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
pub struct DefaultLogger;

impl DefaultLogger {
    /// Render an entry as a single console line
    pub fn format_entry(entry: &LogEntry) -> String {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let label = entry.severity.label();
        let severity_str = match entry.severity {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
        };

        let source = entry.source.bright_blue();

        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            format!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp, severity_str, source, entry.message, file, line
            )
        } else {
            format!("[{}] [{}] [{}] {}", timestamp, severity_str, source, entry.message)
        }
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        println!("{}", Self::format_entry(entry));
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message (very verbose, typically filtered out)
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log(
            $crate::galaxy3d::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message (development information)
#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log(
            $crate::galaxy3d::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message (important events)
#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log(
            $crate::galaxy3d::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message (potential issues)
#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log(
            $crate::galaxy3d::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_viewport::engine_error;
/// engine_error!("galaxy3d::Viewport", "Failed to create framebuffer: {}", "out of memory");
/// ```
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log_detailed(
            $crate::galaxy3d::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Log an ERROR message and evaluate to an `Error`
///
/// Without a variant the error is a `BackendError`; a leading variant name
/// selects one of the other string variants.
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_viewport::engine_err;
/// let err = engine_err!("galaxy3d::Framebuffer", "driver lost framebuffer {}", 3);
/// let err = engine_err!("galaxy3d::Framebuffer", ValidationFailed, "slot {} is empty", 0);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $variant:ident, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::$variant(message)
    }};
    ($source:expr, $($arg:tt)*) => {
        $crate::engine_err!($source, BackendError, $($arg)*)
    };
}

/// Log an ERROR message and return `Err` (`BackendError` unless a variant is given)
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $variant:ident, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $variant, $($arg)*))
    };
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
