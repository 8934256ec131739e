//! `cmdcollect run` command.

use crate::cli::RunArgs;
use crate::collector::run_request;
use crate::context::CollectorContext;
use crate::error::CollectError;

/// Execute the `run` command against the given context.
///
/// # Errors
///
/// Returns the request-level error from [`run_request`].
pub fn run_with_context(ctx: &CollectorContext, args: &RunArgs) -> Result<(), CollectError> {
    let summary = run_request(ctx, &args.to_request())?;

    let kept = summary.executions.iter().filter(|e| e.output_path.is_some()).count();
    tracing::info!(executions = summary.executions.len(), artifacts = kept, "collection finished");

    if args.report {
        super::print_report(&summary)?;
    }
    Ok(())
}
