//! Recording adapter for the `ShellExecutor` port.

use std::ffi::OsStr;

use super::Transcript;
use crate::ports::shell::{ExecStatus, ShellExecutor, StdoutTarget, StreamSpec};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One command that went through the recording executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// The command handed to the shell, as lossy text.
    pub command: String,
    /// `true` when stdout went to a gzip stream.
    pub compressed: bool,
    /// `true` when stdout was merged into the stderr file.
    pub merged: bool,
    /// Exit code, if the command ran and exited normally.
    pub exit_code: Option<i32>,
}

/// Records shell interactions while delegating to an inner implementation.
pub struct RecordingShellExecutor {
    inner: Box<dyn ShellExecutor>,
    calls: Transcript<RecordedCall>,
}

impl RecordingShellExecutor {
    /// Creates a new recording executor wrapping the given implementation.
    #[must_use]
    pub fn new(inner: Box<dyn ShellExecutor>, calls: Transcript<RecordedCall>) -> Self {
        Self { inner, calls }
    }
}

impl ShellExecutor for RecordingShellExecutor {
    fn run_redirected(
        &self,
        command: &OsStr,
        streams: &StreamSpec,
    ) -> Result<ExecStatus, BoxError> {
        let result = self.inner.run_redirected(command, streams);
        self.calls.push(RecordedCall {
            command: command.to_string_lossy().into_owned(),
            compressed: matches!(streams.stdout, StdoutTarget::Gzip(_)),
            merged: streams.stdout == StdoutTarget::MergeWithStderr,
            exit_code: result.as_ref().ok().and_then(|s| s.exit_code),
        });
        result
    }
}
