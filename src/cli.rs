//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::ports::shell::CollisionPolicy;
use crate::request::CollectionRequest;

/// Top-level CLI parser for `cmdcollect`.
#[derive(Debug, Parser)]
#[command(name = "cmdcollect", version, about = "Collect command output into an artifact tree")]
pub struct Cli {
    /// Base directory for collected artifacts [env: `CMDCOLLECT_SCRATCH_ROOT`].
    #[arg(long, global = true, value_name = "DIR")]
    pub scratch_root: Option<PathBuf>,

    /// Append an audit log to this file [env: `CMDCOLLECT_LOG_FILE`].
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one command template, optionally once per enumerated line.
    Run(RunArgs),
    /// Run every command entry of an artifact file.
    Artifact {
        /// Path to the artifact YAML file.
        file: PathBuf,
        /// Root output directory for every entry.
        #[arg(long, value_name = "DIR")]
        root_output_dir: Option<String>,
        /// Print a JSON summary of every execution.
        #[arg(long)]
        report: bool,
    },
    /// Report whether gzip compression is available.
    Probe,
}

/// Arguments of `cmdcollect run`.
///
/// Required request fields are optional here so that missing values reach
/// request validation and exit with its dedicated code.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Enumeration command; the template runs once per distinct output line.
    #[arg(long, value_name = "COMMAND")]
    pub loop_command: Option<String>,
    /// Command template (`%line%`, `%output_file%`).
    #[arg(long, value_name = "TEMPLATE")]
    pub command: Option<String>,
    /// Root output directory under the scratch root.
    #[arg(long, value_name = "DIR")]
    pub root_output_dir: Option<String>,
    /// Subdirectory template under the root output directory.
    #[arg(long, value_name = "TEMPLATE")]
    pub output_dir: Option<String>,
    /// Output file name template.
    #[arg(long, value_name = "TEMPLATE")]
    pub output_file: Option<String>,
    /// Stderr file name template.
    #[arg(long, value_name = "TEMPLATE")]
    pub stderr_file: Option<String>,
    /// Compress captured output with gzip when available.
    #[arg(long)]
    pub compress: bool,
    /// Truncate existing artifact files instead of appending.
    #[arg(long)]
    pub overwrite: bool,
    /// Print a JSON summary of every execution.
    #[arg(long)]
    pub report: bool,
}

impl RunArgs {
    /// Builds the collection request these arguments describe.
    #[must_use]
    pub fn to_request(&self) -> CollectionRequest {
        CollectionRequest {
            loop_command: self.loop_command.clone(),
            command: self.command.clone(),
            root_output_dir: self.root_output_dir.clone(),
            output_dir: self.output_dir.clone(),
            output_file: self.output_file.clone(),
            stderr_output_file: self.stderr_file.clone(),
            compress: self.compress,
            collision_policy: if self.overwrite {
                CollisionPolicy::Overwrite
            } else {
                CollisionPolicy::AppendOnCollision
            },
        }
    }
}
