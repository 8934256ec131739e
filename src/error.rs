//! Error taxonomy for collection requests.
//!
//! Only request-level problems are errors. A collected command that fails or
//! prints nothing is not an error; it simply leaves no artifact behind.

use std::path::PathBuf;

/// Exit code for a missing required configuration field (`EINVAL`).
pub const EXIT_MISSING_FIELD: u8 = 22;

/// Exit code for an enumeration command that produced no lines (`ENODATA`).
pub const EXIT_EMPTY_ENUMERATION: u8 = 61;

/// Exit code for command-line usage errors.
pub const EXIT_USAGE: u8 = 2;

/// Exit code for any other failure.
pub const EXIT_FAILURE: u8 = 1;

/// Errors that abort a whole collection request.
#[derive(thiserror::Error, Debug)]
pub enum CollectError {
    /// A required request field is missing or blank.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the missing field, as spelled in artifact files.
        field: &'static str,
    },

    /// The loop command ran but produced no lines to iterate over.
    #[error("loop command produced no results: {command}")]
    EmptyEnumeration {
        /// The fully substituted loop command.
        command: String,
    },

    /// Filesystem setup failed (root directory, temporary buffer).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// An artifact file could not be read or parsed.
    #[error("invalid artifact file {}: {message}", path.display())]
    Artifact {
        /// Path of the artifact file.
        path: PathBuf,
        /// Reader or parser error text.
        message: String,
    },

    /// Invalid command-line usage.
    #[error("{0}")]
    Usage(String),
}

impl CollectError {
    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::MissingField { .. } => EXIT_MISSING_FIELD,
            Self::EmptyEnumeration { .. } => EXIT_EMPTY_ENUMERATION,
            Self::Usage(_) => EXIT_USAGE,
            Self::Io(_) | Self::Artifact { .. } => EXIT_FAILURE,
        }
    }
}
