//! In-memory audit log.

use super::Transcript;
use crate::ports::log::{CommandLog, LogCategory};

/// One recorded log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Category tag.
    pub category: LogCategory,
    /// Message text.
    pub message: String,
}

/// Audit log that keeps every entry in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingCommandLog {
    entries: Transcript<LogEntry>,
}

impl RecordingCommandLog {
    /// All entries, in order.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.snapshot()
    }

    /// Messages logged under `COMMAND`, in order.
    #[must_use]
    pub fn commands(&self) -> Vec<String> {
        self.entries
            .snapshot()
            .into_iter()
            .filter(|e| e.category == LogCategory::Command)
            .map(|e| e.message)
            .collect()
    }
}

impl CommandLog for RecordingCommandLog {
    fn log(&self, category: LogCategory, message: &str) {
        self.entries.push(LogEntry { category, message: message.to_string() });
    }
}
