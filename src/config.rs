//! Runtime settings.
//!
//! Each value is taken from the command line, then the environment (after
//! `.env` has been loaded by `main`), then a default.

use std::env;
use std::io;
use std::path::PathBuf;

/// Environment variable naming the scratch root.
pub const SCRATCH_ROOT_ENV: &str = "CMDCOLLECT_SCRATCH_ROOT";

/// Environment variable naming the audit log file.
pub const LOG_FILE_ENV: &str = "CMDCOLLECT_LOG_FILE";

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base directory every artifact is written beneath.
    pub scratch_root: PathBuf,
    /// Audit log file, if one should be written.
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Resolves settings from flags and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no scratch root is given and the current
    /// directory cannot be determined.
    pub fn resolve(scratch_root: Option<PathBuf>, log_file: Option<PathBuf>) -> io::Result<Self> {
        Self::resolve_with(
            scratch_root,
            log_file,
            env::var_os(SCRATCH_ROOT_ENV).map(PathBuf::from),
            env::var_os(LOG_FILE_ENV).map(PathBuf::from),
        )
    }

    fn resolve_with(
        scratch_flag: Option<PathBuf>,
        log_flag: Option<PathBuf>,
        scratch_env: Option<PathBuf>,
        log_env: Option<PathBuf>,
    ) -> io::Result<Self> {
        let scratch_root = match scratch_flag.or(scratch_env).filter(|p| !p.as_os_str().is_empty())
        {
            Some(path) => path,
            None => env::current_dir()?,
        };
        let log_file = log_flag.or(log_env).filter(|p| !p.as_os_str().is_empty());
        Ok(Self { scratch_root, log_file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_win_over_environment() {
        let settings = Settings::resolve_with(
            Some("/flag".into()),
            Some("/flag.log".into()),
            Some("/env".into()),
            Some("/env.log".into()),
        )
        .unwrap();

        assert_eq!(settings.scratch_root, PathBuf::from("/flag"));
        assert_eq!(settings.log_file, Some(PathBuf::from("/flag.log")));
    }

    #[test]
    fn environment_fills_missing_flags() {
        let settings =
            Settings::resolve_with(None, None, Some("/env".into()), Some("/env.log".into()))
                .unwrap();

        assert_eq!(settings.scratch_root, PathBuf::from("/env"));
        assert_eq!(settings.log_file, Some(PathBuf::from("/env.log")));
    }

    #[test]
    fn defaults_to_current_directory_without_log() {
        let settings = Settings::resolve_with(None, None, Some(PathBuf::new()), None).unwrap();

        assert_eq!(settings.scratch_root, env::current_dir().unwrap());
        assert_eq!(settings.log_file, None);
    }
}
