//! Gzip availability probe.

use std::sync::OnceLock;

use crate::adapters::live::shell::LiveShellExecutor;
use crate::ports::shell::ArgvExecutor;

static GZIP_AVAILABLE: OnceLock<bool> = OnceLock::new();

/// Returns `true` if `gzip` can be run; probed once per process.
#[must_use]
pub fn gzip_available() -> bool {
    *GZIP_AVAILABLE.get_or_init(|| {
        let available = probe_gzip(&LiveShellExecutor);
        tracing::debug!(available, "probed gzip");
        available
    })
}

/// Checks whether `gzip -c` runs and exits cleanly on empty input.
#[must_use]
pub fn probe_gzip(executor: &dyn ArgvExecutor) -> bool {
    matches!(executor.run_argv("gzip", &["-c"]), Ok(output) if output.exit_code == 0)
}
