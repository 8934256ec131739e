//! Request driver: single-shot and per-line loop collection.

use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStringExt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::context::CollectorContext;
use crate::error::CollectError;
use crate::executor::{execute, finalize_logged, Execution, ExecutionReport};
use crate::paths::{resolve, root_directory, OutputTemplates};
use crate::ports::log::LogCategory;
use crate::ports::shell::{CollisionPolicy, StdoutTarget, StreamSpec};
use crate::request::{CollectionRequest, ValidatedRequest};

/// Stderr file of the enumeration command, inside the root output directory.
pub const LOOP_STDERR_FILE: &str = "loop_command.stderr";

/// Everything one request executed.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionSummary {
    /// When the request started.
    pub started_at: DateTime<Utc>,
    /// When the last execution finished.
    pub finished_at: DateTime<Utc>,
    /// One report per execution, in execution order.
    pub executions: Vec<ExecutionReport>,
}

/// Runs one collection request.
///
/// Without a loop command the template runs once. With one, the loop command
/// runs first and the template runs once per distinct output line, in
/// lexical order. Failures of individual executions never fail the request.
///
/// # Errors
///
/// - [`CollectError::MissingField`] before anything is executed or written.
/// - [`CollectError::EmptyEnumeration`] when the loop command printed no lines.
/// - [`CollectError::Io`] when the root directory or the enumeration buffer
///   cannot be created.
pub fn run_request(
    ctx: &CollectorContext,
    request: &CollectionRequest,
) -> Result<CollectionSummary, CollectError> {
    let request = request.validate()?;
    let started_at = ctx.clock.now();

    let executions = match request.loop_command.as_deref() {
        Some(loop_command) => run_loop(ctx, &request, loop_command)?,
        None => run_once(ctx, &request, None).into_iter().collect(),
    };

    Ok(CollectionSummary { started_at, finished_at: ctx.clock.now(), executions })
}

fn run_loop(
    ctx: &CollectorContext,
    request: &ValidatedRequest,
    loop_command: &str,
) -> Result<Vec<ExecutionReport>, CollectError> {
    let root = root_directory(&ctx.scratch_root, &request.root_output_dir);
    std::fs::create_dir_all(&root)?;
    let loop_stderr = root.join(LOOP_STDERR_FILE);

    let lines = enumerate(ctx, loop_command, &loop_stderr)?;
    if lines.is_empty() {
        finalize_logged(ctx, &loop_stderr);
        return Err(CollectError::EmptyEnumeration { command: loop_command.to_string() });
    }
    ctx.log.log(LogCategory::Info, &format!("{} distinct lines from {loop_command}", lines.len()));

    let executions = lines
        .iter()
        .filter_map(|line| run_once(ctx, request, Some(line.as_os_str())))
        .collect();

    finalize_logged(ctx, &loop_stderr);
    Ok(executions)
}

/// Runs the loop command into a private buffer and returns its distinct lines.
///
/// The buffer is a temporary file removed when this function returns, on
/// every path. Lines stay raw bytes and are only decoded lossily for logs and
/// artifact names.
fn enumerate(
    ctx: &CollectorContext,
    loop_command: &str,
    loop_stderr: &Path,
) -> Result<BTreeSet<OsString>, CollectError> {
    let buffer = tempfile::Builder::new().prefix("cmdcollect-loop-").tempfile()?;

    ctx.log.log(LogCategory::Command, loop_command);
    let streams = StreamSpec {
        stdout: StdoutTarget::File(buffer.path().to_path_buf()),
        stderr: loop_stderr.to_path_buf(),
        policy: CollisionPolicy::AppendOnCollision,
    };
    if let Err(e) = ctx.shell.run_redirected(OsStr::new(loop_command), &streams) {
        ctx.log.log(LogCategory::Error, &format!("could not run {loop_command}: {e}"));
    }

    let contents = std::fs::read(buffer.path())?;
    Ok(distinct_lines(&contents))
}

/// Splits enumeration output into deduplicated, non-blank lines in byte order.
///
/// A trailing `\r` is stripped so CRLF output matches LF output. Bytes that
/// are not UTF-8 are kept as they are.
#[must_use]
pub fn distinct_lines(output: &[u8]) -> BTreeSet<OsString> {
    output
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter(|line| !line.iter().all(u8::is_ascii_whitespace))
        .map(|line| OsString::from_vec(line.to_vec()))
        .collect()
}

fn run_once(
    ctx: &CollectorContext,
    request: &ValidatedRequest,
    line: Option<&OsStr>,
) -> Option<ExecutionReport> {
    let templates = OutputTemplates {
        root_dir: &request.root_output_dir,
        sub_dir: request.output_dir.as_deref(),
        output_file: &request.output_file,
        stderr_file: request.stderr_output_file.as_deref(),
    };

    let paths = match resolve(&ctx.scratch_root, &templates, line) {
        Ok(paths) => paths,
        Err(e) => {
            ctx.log.log(LogCategory::Error, &format!("could not create output directory: {e}"));
            return None;
        }
    };

    Some(execute(
        ctx,
        &Execution {
            command: &request.command,
            paths: &paths,
            line,
            compress: request.compress,
            policy: request.collision_policy,
        },
    ))
}
