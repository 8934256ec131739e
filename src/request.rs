//! Collection requests and their validation.

use serde::{Deserialize, Serialize};

use crate::error::CollectError;
use crate::ports::shell::CollisionPolicy;

/// A command collection request as supplied by a caller or artifact file.
///
/// Field names on the wire follow artifact files (`output_directory`,
/// `compress_output_file`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRequest {
    /// Enumeration command; its output lines drive loop mode.
    #[serde(default)]
    pub loop_command: Option<String>,
    /// Command template; may contain `%line%` and `%output_file%`.
    #[serde(default)]
    pub command: Option<String>,
    /// Root output directory relative to the scratch root.
    #[serde(default, rename = "root_output_directory")]
    pub root_output_dir: Option<String>,
    /// Subdirectory template below the root.
    #[serde(default, rename = "output_directory")]
    pub output_dir: Option<String>,
    /// Output file name template.
    #[serde(default)]
    pub output_file: Option<String>,
    /// Stderr file name template; defaults to `<output_file>.stderr`.
    #[serde(default)]
    pub stderr_output_file: Option<String>,
    /// Compress captured stdout with gzip when available.
    #[serde(default, rename = "compress_output_file")]
    pub compress: bool,
    /// How repeated writes to one artifact file combine.
    #[serde(default)]
    pub collision_policy: CollisionPolicy,
}

/// A request whose required fields are known to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    /// Enumeration command, if running in loop mode.
    pub loop_command: Option<String>,
    /// Command template.
    pub command: String,
    /// Root output directory.
    pub root_output_dir: String,
    /// Subdirectory template.
    pub output_dir: Option<String>,
    /// Output file name template.
    pub output_file: String,
    /// Stderr file name template.
    pub stderr_output_file: Option<String>,
    /// Compression requested.
    pub compress: bool,
    /// Collision policy.
    pub collision_policy: CollisionPolicy,
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

fn required(value: Option<&String>, field: &'static str) -> Result<String, CollectError> {
    non_blank(value).ok_or(CollectError::MissingField { field })
}

impl CollectionRequest {
    /// Checks required fields in order: `command`, `root_output_directory`,
    /// `output_file`. A blank `loop_command` means single-shot mode.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::MissingField`] naming the first missing field.
    pub fn validate(&self) -> Result<ValidatedRequest, CollectError> {
        let command = required(self.command.as_ref(), "command")?;
        let root_output_dir = required(self.root_output_dir.as_ref(), "root_output_directory")?;
        let output_file = required(self.output_file.as_ref(), "output_file")?;

        Ok(ValidatedRequest {
            loop_command: non_blank(self.loop_command.as_ref()),
            command,
            root_output_dir,
            output_dir: non_blank(self.output_dir.as_ref()),
            output_file,
            stderr_output_file: non_blank(self.stderr_output_file.as_ref()),
            compress: self.compress,
            collision_policy: self.collision_policy,
        })
    }
}
