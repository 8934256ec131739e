//! Audit log port.

use std::fmt;

/// Category tag attached to every audit log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    /// General progress.
    Info,
    /// A fully substituted command about to run.
    Command,
    /// Something was skipped or degraded.
    Warning,
    /// A request-level failure.
    Error,
    /// Diagnostic detail.
    Debug,
}

impl LogCategory {
    /// Upper-case tag written to log files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Command => "COMMAND",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records what the collector does, most importantly every command it runs.
///
/// Logging never fails from the caller's point of view; adapters deal with
/// their own write errors.
pub trait CommandLog: Send + Sync {
    /// Records one entry.
    fn log(&self, category: LogCategory, message: &str);
}
