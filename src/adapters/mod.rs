//! Port implementations.
//!
//! `live` talks to the real system; `recording` keeps interactions in memory
//! so callers and tests can inspect what happened.

pub mod live;
pub mod recording;
