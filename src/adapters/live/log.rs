//! Live audit log backed by `tracing` and an optional append-only file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::ports::clock::Clock;
use crate::ports::log::{CommandLog, LogCategory};

/// Timestamp layout of log file lines.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Emits audit entries as tracing events and, optionally, to a log file.
///
/// File lines look like `2026-10-17 09:30:00 +0000 COMMAND ps -ef`.
pub struct LiveCommandLog {
    clock: Box<dyn Clock>,
    file: Option<Mutex<File>>,
}

impl LiveCommandLog {
    /// Creates a log that only emits tracing events.
    #[must_use]
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self { clock, file: None }
    }

    /// Creates a log that also appends to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened for appending.
    pub fn with_file(clock: Box<dyn Clock>, path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { clock, file: Some(Mutex::new(file)) })
    }

    fn append(&self, category: LogCategory, message: &str) {
        let Some(file) = &self.file else {
            return;
        };
        let stamp = self.clock.now().format(TIMESTAMP_FORMAT);
        let mut file = file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(file, "{stamp} {category} {message}") {
            tracing::warn!(error = %e, "failed to append to audit log file");
        }
    }
}

impl CommandLog for LiveCommandLog {
    fn log(&self, category: LogCategory, message: &str) {
        match category {
            LogCategory::Error => {
                tracing::error!(target: "cmdcollect::audit", category = %category, "{message}");
            }
            LogCategory::Warning => {
                tracing::warn!(target: "cmdcollect::audit", category = %category, "{message}");
            }
            LogCategory::Debug => {
                tracing::debug!(target: "cmdcollect::audit", category = %category, "{message}");
            }
            LogCategory::Info | LogCategory::Command => {
                tracing::info!(target: "cmdcollect::audit", category = %category, "{message}");
            }
        }
        self.append(category, message);
    }
}
