//! `cmdcollect artifact` command.

use std::path::Path;

use crate::artifact::ArtifactFile;
use crate::context::CollectorContext;
use crate::error::CollectError;

/// Execute the `artifact` command against the given context.
///
/// Every entry is attempted; the first request-level error, if any, is
/// returned after the last entry ran.
///
/// # Errors
///
/// Returns an artifact error if the file cannot be loaded, otherwise the
/// first entry's request-level error.
pub fn run_with_context(
    ctx: &CollectorContext,
    file: &Path,
    root_output_dir: Option<&str>,
    report: bool,
) -> Result<(), CollectError> {
    let artifact = ArtifactFile::load(file)?;
    let outcome = artifact.run(ctx, root_output_dir);

    tracing::info!(
        file = %file.display(),
        requests = outcome.summaries.len(),
        failed = outcome.errors.len(),
        "artifact finished"
    );

    if report {
        super::print_report(&outcome.summaries)?;
    }

    match outcome.errors.into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
