//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the collection engine and the
//! outside world (time, audit log, command execution). Implementations live
//! in `src/adapters/`.

pub mod clock;
pub mod log;
pub mod shell;

pub use clock::Clock;
pub use log::{CommandLog, LogCategory};
pub use shell::{
    ArgvExecutor, CollisionPolicy, ExecStatus, ShellExecutor, ShellOutput, StdoutTarget,
    StreamSpec,
};
