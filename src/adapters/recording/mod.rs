//! Recording adapters that capture interactions for later inspection.
//!
//! Each adapter writes into a [`Transcript`]. Transcripts are cheap handles
//! over shared storage, so a caller can keep one clone while the adapter
//! itself is boxed into a `CollectorContext`.

pub mod clock;
pub mod log;
pub mod shell;

use std::sync::{Arc, Mutex, PoisonError};

pub use clock::FixedClock;
pub use log::{LogEntry, RecordingCommandLog};
pub use shell::{RecordedCall, RecordingShellExecutor};

/// Shared, append-only list of recorded values.
#[derive(Debug)]
pub struct Transcript<T> {
    entries: Arc<Mutex<Vec<T>>>,
}

impl<T> Default for Transcript<T> {
    fn default() -> Self {
        Self { entries: Arc::new(Mutex::new(Vec::new())) }
    }
}

impl<T> Clone for Transcript<T> {
    fn clone(&self) -> Self {
        Self { entries: Arc::clone(&self.entries) }
    }
}

impl<T: Clone> Transcript<T> {
    /// Appends one value.
    pub fn push(&self, value: T) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).push(value);
    }

    /// Copies out everything recorded so far, in order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
