//! Core library entry for the `cmdcollect` CLI.
//!
//! `cmdcollect` runs command templates through the host shell and files
//! their output into an artifact tree under a scratch root. A request can
//! run once, or once per distinct line printed by an enumeration command.

pub mod adapters;
pub mod artifact;
pub mod cli;
pub mod collector;
pub mod commands;
pub mod compression;
pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod finalize;
pub mod paths;
pub mod ports;
pub mod request;
pub mod sanitize;
pub mod template;

use clap::Parser;

pub use collector::{run_request, CollectionSummary};
pub use context::CollectorContext;
pub use error::CollectError;
pub use request::CollectionRequest;

/// Run the CLI with the provided arguments.
///
/// `--help` and `--version` print their text and succeed.
///
/// # Errors
///
/// Returns [`CollectError::Usage`] when argument parsing fails, otherwise the
/// selected command's error.
pub fn run<I, T>(args: I) -> Result<(), CollectError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(CollectError::Usage(err.to_string())),
    };
    commands::dispatch(&cli)
}
