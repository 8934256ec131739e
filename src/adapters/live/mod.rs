//! Live adapters for real external interactions.

pub mod clock;
pub mod log;
pub mod shell;

pub use clock::LiveClock;
pub use log::LiveCommandLog;
pub use shell::LiveShellExecutor;
