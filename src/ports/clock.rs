//! Clock port for timestamping log lines and collection summaries.

use chrono::{DateTime, Utc};

/// Provides the current time.
///
/// Tests substitute a fixed clock so audit log lines are reproducible.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}
