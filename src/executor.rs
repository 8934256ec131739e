//! Runs one command template into its resolved output location.
//!
//! The mode is chosen by a single check: does the template contain
//! `%output_file%`?
//!
//! - **Self-directing**: the command writes the output file itself at the
//!   substituted path. Both of its streams are appended to the stderr file.
//! - **Captured**: stdout goes to the output file (or `<output>.gz` when
//!   compression is requested and gzip is available), stderr to the stderr
//!   file.
//!
//! Either way the empty artifacts are removed afterwards. A failing command
//! is not an error here; it shows up only as missing files.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::context::CollectorContext;
use crate::finalize::{finalize_if_empty, surviving};
use crate::paths::ResolvedPaths;
use crate::ports::log::LogCategory;
use crate::ports::shell::{CollisionPolicy, ExecStatus, StdoutTarget, StreamSpec};
use crate::template::{Bindings, Template};

/// How a command's stdout was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// The engine redirected stdout into the output file.
    Captured,
    /// The command wrote its own output file.
    SelfDirecting,
}

/// One command execution.
#[derive(Debug, Clone, Copy)]
pub struct Execution<'a> {
    /// Command template.
    pub command: &'a str,
    /// Where artifacts go.
    pub paths: &'a ResolvedPaths,
    /// Current enumeration line, in loop mode.
    pub line: Option<&'a OsStr>,
    /// Compression requested.
    pub compress: bool,
    /// Append or truncate existing artifacts.
    pub policy: CollisionPolicy,
}

/// What one execution left behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    /// Fully substituted command, as lossy text.
    pub command: String,
    /// Enumeration line in loop mode, as lossy text.
    pub line: Option<String>,
    /// Captured or self-directing.
    pub mode: ExecutionMode,
    /// Exit code; `None` if the command was killed or never started.
    pub exit_code: Option<i32>,
    /// Output artifact, if it exists and is non-empty.
    pub output_path: Option<PathBuf>,
    /// Stderr artifact, if it exists and is non-empty.
    pub stderr_path: Option<PathBuf>,
    /// `true` when stdout went through gzip.
    pub compressed: bool,
    /// Bytes the command wrote to a captured stdout.
    pub stdout_bytes: u64,
}

/// Runs one command and finalizes its artifacts.
pub fn execute(ctx: &CollectorContext, execution: &Execution<'_>) -> ExecutionReport {
    let template = Template::parse(execution.command);
    let output_path = execution.paths.output_path();
    let stderr_path = execution.paths.stderr_path();

    let (mode, command, stdout, final_output) = if template.has_output_file() {
        let bindings = Bindings { line: execution.line, output_file: Some(&output_path) };
        let command = template.render(&bindings);
        (ExecutionMode::SelfDirecting, command, StdoutTarget::MergeWithStderr, output_path)
    } else {
        let command = template.render(&Bindings::line(execution.line));
        if execution.compress && ctx.compression_available {
            let gz = execution.paths.compressed_output_path();
            (ExecutionMode::Captured, command, StdoutTarget::Gzip(gz.clone()), gz)
        } else {
            (ExecutionMode::Captured, command, StdoutTarget::File(output_path.clone()), output_path)
        }
    };
    let compressed = matches!(stdout, StdoutTarget::Gzip(_));
    let command_text = command.to_string_lossy().into_owned();

    ctx.log.log(LogCategory::Command, &command_text);

    let streams = StreamSpec { stdout, stderr: stderr_path.clone(), policy: execution.policy };
    let status = match ctx.shell.run_redirected(&command, &streams) {
        Ok(status) => status,
        Err(e) => {
            ctx.log.log(LogCategory::Error, &format!("could not run {command_text}: {e}"));
            ExecStatus::default()
        }
    };

    finalize_logged(ctx, &final_output);
    finalize_logged(ctx, &stderr_path);

    ExecutionReport {
        command: command_text,
        line: execution.line.map(|line| line.to_string_lossy().into_owned()),
        mode,
        exit_code: status.exit_code,
        output_path: surviving(&final_output),
        stderr_path: surviving(&stderr_path),
        compressed,
        stdout_bytes: status.stdout_bytes,
    }
}

/// Finalizes `path`, logging instead of failing.
pub(crate) fn finalize_logged(ctx: &CollectorContext, path: &Path) {
    match finalize_if_empty(path) {
        Ok(true) => {
            ctx.log.log(LogCategory::Debug, &format!("removed empty {}", path.display()));
        }
        Ok(false) => {}
        Err(e) => {
            let message = format!("could not finalize {}: {e}", path.display());
            ctx.log.log(LogCategory::Warning, &message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::LiveShellExecutor;
    use crate::adapters::recording::{
        RecordedCall, RecordingCommandLog, RecordingShellExecutor, Transcript,
    };
    use crate::paths::{resolve, OutputTemplates};
    use crate::ports::shell::ShellExecutor;

    /// Shell whose spawn always fails, after leaving an empty stderr file.
    struct UnspawnableShell;

    impl ShellExecutor for UnspawnableShell {
        fn run_redirected(
            &self,
            _command: &OsStr,
            streams: &StreamSpec,
        ) -> Result<ExecStatus, Box<dyn std::error::Error + Send + Sync>> {
            std::fs::File::create(&streams.stderr)?;
            Err("sh: not found".into())
        }
    }

    struct Harness {
        scratch: tempfile::TempDir,
        log: RecordingCommandLog,
        calls: Transcript<RecordedCall>,
        ctx: CollectorContext,
    }

    fn harness(compression_available: bool) -> Harness {
        let scratch = tempfile::tempdir().unwrap();
        let log = RecordingCommandLog::default();
        let calls = Transcript::default();
        let mut ctx = CollectorContext::with_log(scratch.path(), Box::new(log.clone()));
        let shell = RecordingShellExecutor::new(Box::new(LiveShellExecutor), calls.clone());
        ctx.shell = Box::new(shell);
        ctx.compression_available = compression_available;
        Harness { scratch, log, calls, ctx }
    }

    fn paths(h: &Harness, output_file: &str) -> ResolvedPaths {
        let templates =
            OutputTemplates { root_dir: "sys", sub_dir: None, output_file, stderr_file: None };
        resolve(h.scratch.path(), &templates, None).unwrap()
    }

    fn run(h: &Harness, command: &str, paths: &ResolvedPaths, compress: bool) -> ExecutionReport {
        execute(
            &h.ctx,
            &Execution {
                command,
                paths,
                line: None,
                compress,
                policy: CollisionPolicy::AppendOnCollision,
            },
        )
    }

    #[test]
    fn captures_stdout_and_drops_empty_stderr() {
        let h = harness(false);
        let p = paths(&h, "out.txt");

        let report = run(&h, "echo hi", &p, false);

        assert_eq!(std::fs::read_to_string(p.output_path()).unwrap(), "hi\n");
        assert!(!p.stderr_path().exists());
        assert_eq!(report.mode, ExecutionMode::Captured);
        assert_eq!(report.output_path, Some(p.output_path()));
        assert_eq!(report.stderr_path, None);
        assert_eq!(report.exit_code, Some(0));
    }

    #[test]
    fn failing_command_leaves_only_stderr() {
        let h = harness(false);
        let p = paths(&h, "missing.txt");

        let report = run(&h, "ls /definitely/not/here", &p, false);

        assert!(!p.output_path().exists());
        assert!(p.stderr_path().exists());
        assert_ne!(report.exit_code, Some(0));
        assert_eq!(report.output_path, None);
    }

    #[test]
    fn silent_command_leaves_nothing() {
        let h = harness(false);
        let p = paths(&h, "quiet.txt");

        run(&h, "true", &p, false);

        assert!(!p.output_path().exists());
        assert!(!p.stderr_path().exists());
    }

    #[test]
    fn logs_fully_substituted_command() {
        let h = harness(false);
        let p = paths(&h, "self.txt");

        run(&h, "echo x > %output_file%", &p, false);

        let expected = format!("echo x > {}", p.output_path().display());
        assert_eq!(h.log.commands(), vec![expected.clone()]);
        assert_eq!(h.calls.snapshot()[0].command, expected);
    }

    #[test]
    fn self_directing_command_writes_its_own_file() {
        let h = harness(true);
        let p = paths(&h, "self.txt");

        let report = run(&h, "echo own > %output_file%; echo chatter", &p, true);

        assert_eq!(report.mode, ExecutionMode::SelfDirecting);
        assert!(!report.compressed);
        assert_eq!(std::fs::read_to_string(p.output_path()).unwrap(), "own\n");
        assert_eq!(std::fs::read_to_string(p.stderr_path()).unwrap(), "chatter\n");
        assert!(h.calls.snapshot()[0].merged);
    }

    #[test]
    fn self_directing_empty_output_is_removed() {
        let h = harness(false);
        let p = paths(&h, "self.txt");

        run(&h, ": > %output_file%", &p, false);

        assert!(!p.output_path().exists());
        assert!(!p.stderr_path().exists());
    }

    #[test]
    fn compression_requested_but_unavailable_writes_plain_output() {
        let h = harness(false);
        let p = paths(&h, "ps.txt");

        let report = run(&h, "echo plain", &p, true);

        assert!(!report.compressed);
        assert_eq!(std::fs::read_to_string(p.output_path()).unwrap(), "plain\n");
        assert!(!p.compressed_output_path().exists());
        assert!(h.log.entries().iter().all(|e| e.category != LogCategory::Warning));
    }

    #[test]
    fn self_directing_ignores_compression_when_gzip_is_missing() {
        let h = harness(false);
        let p = paths(&h, "self.txt");

        let report = run(&h, "echo own > %output_file%", &p, true);

        assert_eq!(report.mode, ExecutionMode::SelfDirecting);
        assert!(!report.compressed);
        assert_eq!(std::fs::read_to_string(p.output_path()).unwrap(), "own\n");
        assert!(!p.compressed_output_path().exists());
        assert!(!h.calls.snapshot()[0].compressed);
    }

    #[test]
    fn spawn_failure_is_logged_and_artifacts_finalized() {
        let mut h = harness(false);
        h.ctx.shell = Box::new(UnspawnableShell);
        let p = paths(&h, "ps.txt");

        let report = run(&h, "ps -ef", &p, false);

        assert_eq!(report.exit_code, None);
        assert_eq!(report.stdout_bytes, 0);
        assert_eq!(report.output_path, None);
        assert_eq!(report.stderr_path, None);
        assert!(!p.stderr_path().exists());
        let errors: Vec<_> =
            h.log.entries().into_iter().filter(|e| e.category == LogCategory::Error).collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "could not run ps -ef: sh: not found");
        assert_eq!(h.log.commands(), vec!["ps -ef"]);
    }

    #[test]
    fn removed_artifacts_are_logged_at_debug() {
        let h = harness(false);
        let p = paths(&h, "quiet.txt");

        run(&h, "true", &p, false);

        let debug: Vec<_> = h
            .log
            .entries()
            .into_iter()
            .filter(|e| e.category == LogCategory::Debug)
            .map(|e| e.message)
            .collect();
        assert_eq!(
            debug,
            vec![
                format!("removed empty {}", p.output_path().display()),
                format!("removed empty {}", p.stderr_path().display()),
            ]
        );
    }

    #[test]
    fn compression_writes_gz_when_available() {
        if !crate::compression::gzip_available() {
            return;
        }
        let h = harness(true);
        let p = paths(&h, "ps.txt");

        let report = run(&h, "echo packed", &p, true);

        assert!(report.compressed);
        assert_eq!(report.output_path, Some(p.compressed_output_path()));
        assert!(!p.output_path().exists());
        assert!(h.calls.snapshot()[0].compressed);
    }

    #[test]
    fn compressed_empty_output_leaves_no_gz() {
        if !crate::compression::gzip_available() {
            return;
        }
        let h = harness(true);
        let p = paths(&h, "ps.txt");

        let report = run(&h, "true", &p, true);

        assert!(!p.compressed_output_path().exists());
        assert_eq!(report.output_path, None);
    }
}
