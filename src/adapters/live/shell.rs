//! Live command executors using `std::process::Command`.

use std::ffi::OsStr;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};

use crate::ports::shell::{
    ArgvExecutor, CollisionPolicy, ExecStatus, ShellExecutor, ShellOutput, StdoutTarget,
    StreamSpec,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const PIPE_CHUNK: usize = 64 * 1024;

/// Program and arguments that compress stdin to stdout.
const COMPRESSOR: &[&str] = &["gzip", "-c"];

/// Live executor that runs commands via the system shell or directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveShellExecutor;

fn open_stream(path: &Path, policy: CollisionPolicy) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true);
    match policy {
        CollisionPolicy::AppendOnCollision => options.append(true),
        CollisionPolicy::Overwrite => options.write(true).truncate(true),
    };
    options.open(path)
}

fn file_len(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

fn shell(command: &OsStr) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command).stdin(Stdio::null());
    cmd
}

/// Copies `source` into a `compressor` process writing to `path`.
///
/// The compressor is only started once the first byte arrives, so a silent
/// command leaves no compressed file behind. Once started it is always
/// waited for, including when copying fails. Returns the uncompressed byte
/// count.
fn pump_compressed<R: Read>(
    source: &mut R,
    compressor: &[&str],
    path: &Path,
    policy: CollisionPolicy,
    stderr: &File,
) -> Result<u64, BoxError> {
    let mut child: Option<Child> = None;
    let pumped = feed(source, compressor, path, policy, stderr, &mut child);

    let reaped = child.map(|mut c| {
        drop(c.stdin.take());
        c.wait()
    });
    let total = pumped?;
    if let Some(status) = reaped {
        status?;
    }
    Ok(total)
}

fn feed<R: Read>(
    source: &mut R,
    compressor: &[&str],
    path: &Path,
    policy: CollisionPolicy,
    stderr: &File,
    child: &mut Option<Child>,
) -> Result<u64, BoxError> {
    let mut buf = vec![0u8; PIPE_CHUNK];
    let mut total = 0u64;

    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        if child.is_none() {
            let (program, args) = compressor.split_first().ok_or("empty compressor command")?;
            let target = open_stream(path, policy)?;
            let spawned = Command::new(program)
                .args(args)
                .stdin(Stdio::piped())
                .stdout(target)
                .stderr(stderr.try_clone()?)
                .spawn()?;
            *child = Some(spawned);
        }

        let stdin = child
            .as_mut()
            .and_then(|c| c.stdin.as_mut())
            .ok_or("compressor stdin is not piped")?;
        stdin.write_all(&buf[..n])?;
        total += n as u64;
    }

    Ok(total)
}

impl ShellExecutor for LiveShellExecutor {
    fn run_redirected(
        &self,
        command: &OsStr,
        streams: &StreamSpec,
    ) -> Result<ExecStatus, BoxError> {
        let stderr = open_stream(&streams.stderr, streams.policy)?;
        let mut cmd = shell(command);

        match &streams.stdout {
            StdoutTarget::File(path) => {
                let stdout = open_stream(path, streams.policy)?;
                let before = stdout.metadata()?.len();
                let status = cmd.stdout(stdout).stderr(stderr).status()?;
                Ok(ExecStatus {
                    exit_code: status.code(),
                    stdout_bytes: file_len(path).saturating_sub(before),
                })
            }
            StdoutTarget::MergeWithStderr => {
                let stdout = stderr.try_clone()?;
                let status = cmd.stdout(stdout).stderr(stderr).status()?;
                Ok(ExecStatus { exit_code: status.code(), stdout_bytes: 0 })
            }
            StdoutTarget::Gzip(path) => {
                // A silent run must not leave the previous archive behind.
                if streams.policy == CollisionPolicy::Overwrite {
                    match std::fs::remove_file(path) {
                        Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e.into()),
                        _ => {}
                    }
                }
                let mut child =
                    cmd.stdout(Stdio::piped()).stderr(stderr.try_clone()?).spawn()?;
                let mut pipe = child.stdout.take().ok_or("shell stdout is not piped")?;
                let pumped = pump_compressed(&mut pipe, COMPRESSOR, path, streams.policy, &stderr);
                drop(pipe);
                let status = child.wait()?;
                Ok(ExecStatus { exit_code: status.code(), stdout_bytes: pumped? })
            }
        }
    }
}

impl ArgvExecutor for LiveShellExecutor {
    fn run_argv(&self, program: &str, args: &[&str]) -> Result<ShellOutput, BoxError> {
        let output = Command::new(program).args(args).stdin(Stdio::null()).output()?;
        Ok(ShellOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
