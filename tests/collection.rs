//! End-to-end collection tests against the real shell.
//!
//! Every test builds a context over a fresh scratch root with an in-memory
//! audit log, runs one request, and inspects the resulting tree.

use std::path::{Path, PathBuf};

use cmdcollect::adapters::recording::RecordingCommandLog;
use cmdcollect::ports::LogCategory;
use cmdcollect::{run_request, CollectionRequest, CollectorContext};

struct Scratch {
    dir: tempfile::TempDir,
    log: RecordingCommandLog,
    ctx: CollectorContext,
}

fn scratch(compression_available: bool) -> Scratch {
    let dir = tempfile::tempdir().unwrap();
    let log = RecordingCommandLog::default();
    let mut ctx = CollectorContext::with_log(dir.path(), Box::new(log.clone()));
    ctx.compression_available = compression_available && cmdcollect::compression::gzip_available();
    Scratch { dir, log, ctx }
}

fn request(command: &str, output_file: &str) -> CollectionRequest {
    CollectionRequest {
        command: Some(command.into()),
        root_output_dir: Some("sys".into()),
        output_file: Some(output_file.into()),
        ..CollectionRequest::default()
    }
}

/// All files below `root`, relative and sorted.
fn tree(root: &Path) -> Vec<String> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path: PathBuf = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                out.push(path.strip_prefix(root).unwrap().to_string_lossy().into_owned());
            }
        }
    }
    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}

#[test]
fn single_shot_example() {
    let s = scratch(false);

    run_request(&s.ctx, &request("echo hi", "out.txt")).unwrap();

    assert_eq!(tree(s.dir.path()), vec!["sys/out.txt"]);
    assert_eq!(std::fs::read_to_string(s.dir.path().join("sys/out.txt")).unwrap(), "hi\n");
}

#[test]
fn loop_example_deduplicates_lines() {
    let s = scratch(false);
    let mut req = request("echo %line%", "%line%.txt");
    req.loop_command = Some("printf 'a\\nb\\na\\n'".into());

    run_request(&s.ctx, &req).unwrap();

    assert_eq!(tree(s.dir.path()), vec!["sys/a.txt", "sys/b.txt"]);
    assert_eq!(std::fs::read_to_string(s.dir.path().join("sys/a.txt")).unwrap(), "a\n");
    assert_eq!(std::fs::read_to_string(s.dir.path().join("sys/b.txt")).unwrap(), "b\n");
    assert_eq!(s.log.commands().iter().filter(|c| c.as_str() == "echo a").count(), 1);
}

#[test]
fn missing_fields_write_nothing() {
    for field in ["command", "root_output_directory", "output_file"] {
        let s = scratch(false);
        let mut req = request("echo hi", "out.txt");
        match field {
            "command" => req.command = None,
            "root_output_directory" => req.root_output_dir = None,
            _ => req.output_file = None,
        }

        let err = run_request(&s.ctx, &req).unwrap_err();

        assert_eq!(err.exit_code(), 22);
        assert!(err.to_string().contains(field));
        assert!(tree(s.dir.path()).is_empty());
        assert!(s.log.commands().is_empty());
    }
}

#[test]
fn empty_enumeration_writes_no_line_files() {
    let s = scratch(false);
    let mut req = request("echo %line%", "%line%.txt");
    req.loop_command = Some("ls /definitely/not/here 2>/dev/null".into());

    let err = run_request(&s.ctx, &req).unwrap_err();

    assert_eq!(err.exit_code(), 61);
    assert!(tree(s.dir.path()).is_empty());
}

#[test]
fn line_reaches_every_template() {
    let s = scratch(false);
    let req = CollectionRequest {
        loop_command: Some("echo alice".into()),
        command: Some("echo cmd-%line%; echo err-%line% >&2".into()),
        root_output_dir: Some("users".into()),
        output_dir: Some("home_%line%".into()),
        output_file: Some("ls_%line%.txt".into()),
        stderr_output_file: Some("ls_%line%.err".into()),
        ..CollectionRequest::default()
    };

    run_request(&s.ctx, &req).unwrap();

    assert_eq!(
        tree(s.dir.path()),
        vec!["users/home_alice/ls_alice.err", "users/home_alice/ls_alice.txt"]
    );
}

#[test]
fn self_directing_command_skips_capture() {
    let s = scratch(false);

    run_request(&s.ctx, &request("printf own > %output_file%; echo noise", "own.txt")).unwrap();

    let dir = s.dir.path().join("sys");
    assert_eq!(std::fs::read_to_string(dir.join("own.txt")).unwrap(), "own");
    assert_eq!(std::fs::read_to_string(dir.join("own.txt.stderr")).unwrap(), "noise\n");
}

#[test]
fn empty_output_never_survives() {
    let s = scratch(true);
    let mut req = request("true", "quiet.txt");
    req.compress = true;

    run_request(&s.ctx, &req).unwrap();
    run_request(&s.ctx, &request("true", "plain.txt")).unwrap();

    assert!(tree(s.dir.path()).is_empty());
}

#[test]
fn compressed_output_carries_gz_suffix() {
    let s = scratch(true);
    if !s.ctx.compression_available {
        return;
    }
    let mut req = request("echo zipped", "z.txt");
    req.compress = true;

    let summary = run_request(&s.ctx, &req).unwrap();

    assert_eq!(tree(s.dir.path()), vec!["sys/z.txt.gz"]);
    assert!(summary.executions[0].compressed);
}

#[test]
fn compression_falls_back_when_unavailable() {
    let s = scratch(false);
    let mut req = request("echo plain", "p.txt");
    req.compress = true;

    run_request(&s.ctx, &req).unwrap();

    assert_eq!(tree(s.dir.path()), vec!["sys/p.txt"]);
    assert!(s.log.entries().iter().all(|e| e.category != LogCategory::Warning));
}

#[test]
fn sanitized_name_collisions_append() {
    let s = scratch(false);
    let mut req = request("echo %line%", "%line%.txt");
    req.loop_command = Some("printf 'a:b\\na?b\\n'".into());

    run_request(&s.ctx, &req).unwrap();

    assert_eq!(tree(s.dir.path()), vec!["sys/a_b.txt"]);
    let merged = std::fs::read_to_string(s.dir.path().join("sys/a_b.txt")).unwrap();
    assert_eq!(merged, "a:b\na?b\n");
}

#[test]
fn lines_differing_only_in_invalid_bytes_run_separately() {
    let s = scratch(false);
    let mut req = request("printf %s '%line%' | od -An -tx1", "bytes.txt");
    req.loop_command = Some("printf 'u\\376\\nu\\377\\n'".into());

    let summary = run_request(&s.ctx, &req).unwrap();

    assert_eq!(summary.executions.len(), 2);
    let dump = std::fs::read_to_string(s.dir.path().join("sys/bytes.txt")).unwrap();
    let bytes: Vec<&str> = dump.split_whitespace().collect();
    assert_eq!(bytes, ["75", "fe", "75", "ff"]);
}

#[test]
fn traversal_in_lines_stays_inside_scratch_root() {
    let s = scratch(false);
    let mut req = request("echo x", "out.txt");
    req.loop_command = Some("echo ../../escape".into());
    req.output_dir = Some("%line%".into());

    run_request(&s.ctx, &req).unwrap();

    assert_eq!(tree(s.dir.path()), vec!["sys/escape/out.txt"]);
}
