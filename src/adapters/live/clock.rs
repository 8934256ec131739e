//! System clock.

use chrono::{DateTime, Utc};

use crate::ports::clock::Clock;

/// Reads wall-clock time for summaries and audit log stamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
