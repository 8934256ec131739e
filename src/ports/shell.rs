//! Command execution ports.
//!
//! Two capabilities, split by trust level:
//!
//! - [`ShellExecutor`] hands a whole string to `sh -c`. Pipes, redirects,
//!   globs and variable expansion work, and so does anything else the string
//!   says. Only trusted templates may reach it.
//! - [`ArgvExecutor`] runs a program with an argument vector. Nothing is
//!   interpreted by a shell, and none of the above features are available.

use std::ffi::OsStr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The output of a command captured in memory.
#[derive(Debug, Clone)]
pub struct ShellOutput {
    /// The exit code of the process, `-1` when killed by a signal.
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    pub stderr: String,
}

/// How existing artifact files are treated when a command writes to them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Append to existing files (`>>`). Two loop lines that sanitize to the
    /// same file name accumulate into it.
    #[default]
    AppendOnCollision,
    /// Truncate existing files before writing (`>`).
    Overwrite,
}

/// Destination of a command's standard output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StdoutTarget {
    /// Write stdout to this file.
    File(PathBuf),
    /// Pipe stdout through `gzip -c` into this file.
    Gzip(PathBuf),
    /// Send stdout to the stderr file as well (`>> err 2>&1`).
    MergeWithStderr,
}

/// File streams for a redirected command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSpec {
    /// Where stdout goes.
    pub stdout: StdoutTarget,
    /// Where stderr goes.
    pub stderr: PathBuf,
    /// Append or truncate.
    pub policy: CollisionPolicy,
}

/// Result of a redirected command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecStatus {
    /// Exit code, `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    /// Bytes the command wrote to stdout (before compression).
    pub stdout_bytes: u64,
}

/// Runs trusted command strings through the host shell.
pub trait ShellExecutor: Send + Sync {
    /// Runs a command string with stdout and stderr streamed to files.
    ///
    /// The command is raw bytes so enumeration lines that are not UTF-8 reach
    /// the shell unchanged. Blocks until the command exits. A non-zero exit is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a stream file cannot be opened or the shell (or
    /// the compressor) cannot be spawned.
    fn run_redirected(
        &self,
        command: &OsStr,
        streams: &StreamSpec,
    ) -> Result<ExecStatus, Box<dyn std::error::Error + Send + Sync>>;
}

/// Runs programs with an explicit argument vector, without a shell.
pub trait ArgvExecutor: Send + Sync {
    /// Runs `program` with `args` and captures its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned (e.g. not on `PATH`).
    fn run_argv(
        &self,
        program: &str,
        args: &[&str],
    ) -> Result<ShellOutput, Box<dyn std::error::Error + Send + Sync>>;
}
