//! `cmdcollect probe` command.

use crate::compression::gzip_available;
use crate::error::CollectError;

/// Execute the `probe` command.
///
/// # Errors
///
/// Never fails; the signature matches the other handlers.
pub fn run() -> Result<(), CollectError> {
    let state = if gzip_available() { "available" } else { "unavailable" };
    println!("gzip: {state}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn probe_command_runs() {
        assert!(run().is_ok());
    }
}
