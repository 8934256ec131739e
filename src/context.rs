//! Collector context bundling port trait objects with run-wide state.

use std::path::{Path, PathBuf};

use crate::adapters::live::{LiveClock, LiveCommandLog, LiveShellExecutor};
use crate::compression::gzip_available;
use crate::config::Settings;
use crate::ports::clock::Clock;
use crate::ports::log::CommandLog;
use crate::ports::shell::ShellExecutor;

/// Everything a collection run needs from the outside world.
///
/// Constructors wire up live adapters; fields are public so callers can swap
/// in recording adapters.
pub struct CollectorContext {
    /// Clock for summary timestamps.
    pub clock: Box<dyn Clock>,
    /// Audit log sink.
    pub log: Box<dyn CommandLog>,
    /// Raw shell execution capability.
    pub shell: Box<dyn ShellExecutor>,
    /// Base directory all artifacts are written beneath.
    pub scratch_root: PathBuf,
    /// Whether a gzip binary can be used for compressed output.
    pub compression_available: bool,
}

impl CollectorContext {
    /// Creates a live context from resolved settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured log file cannot be opened.
    pub fn live(settings: &Settings) -> std::io::Result<Self> {
        let log = match &settings.log_file {
            Some(path) => LiveCommandLog::with_file(Box::new(LiveClock), path)?,
            None => LiveCommandLog::new(Box::new(LiveClock)),
        };
        Ok(Self::with_log(&settings.scratch_root, Box::new(log)))
    }

    /// Creates a context with live clock and shell and the given log.
    ///
    /// Compression availability comes from the process-wide gzip probe.
    #[must_use]
    pub fn with_log(scratch_root: &Path, log: Box<dyn CommandLog>) -> Self {
        Self {
            clock: Box::new(LiveClock),
            log,
            shell: Box::new(LiveShellExecutor),
            scratch_root: scratch_root.to_path_buf(),
            compression_available: gzip_available(),
        }
    }
}
