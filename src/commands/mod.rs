//! Command dispatch and handlers.

pub mod artifact;
pub mod probe;
pub mod run;

use serde::Serialize;

use crate::cli::{Cli, Command};
use crate::config::Settings;
use crate::context::CollectorContext;
use crate::error::CollectError;

/// Dispatch a parsed command line to its handler.
///
/// # Errors
///
/// Returns the request-level error of the selected handler.
pub fn dispatch(cli: &Cli) -> Result<(), CollectError> {
    if matches!(cli.command, Command::Probe) {
        return probe::run();
    }

    let settings = Settings::resolve(cli.scratch_root.clone(), cli.log_file.clone())?;
    let ctx = CollectorContext::live(&settings)?;
    dispatch_with_context(&cli.command, &ctx)
}

/// Dispatch a command with the given collector context.
fn dispatch_with_context(command: &Command, ctx: &CollectorContext) -> Result<(), CollectError> {
    match command {
        Command::Run(args) => run::run_with_context(ctx, args),
        Command::Artifact { file, root_output_dir, report } => {
            artifact::run_with_context(ctx, file, root_output_dir.as_deref(), *report)
        }
        Command::Probe => probe::run(),
    }
}

/// Print `value` as pretty JSON on stdout.
fn print_report<T: Serialize>(value: &T) -> Result<(), CollectError> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    println!("{json}");
    Ok(())
}
