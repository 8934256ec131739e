//! Artifact files: YAML batches of collection requests.
//!
//! ```yaml
//! version: 1.0
//! output_directory: live_response/process
//! artifacts:
//!   - description: Process list.
//!     collector: command
//!     command: ps -ef
//!     output_file: ps_-ef.txt
//! ```
//!
//! The file-level `output_directory` is the default root output directory
//! for every entry. Entries for other collectors are skipped.

use std::path::Path;

use serde::Deserialize;

use crate::collector::{run_request, CollectionSummary};
use crate::context::CollectorContext;
use crate::error::CollectError;
use crate::ports::log::LogCategory;
use crate::request::CollectionRequest;

/// Collector name handled by this engine.
pub const COMMAND_COLLECTOR: &str = "command";

/// One entry of an artifact file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArtifactEntry {
    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Collector kind; absent means `command`.
    #[serde(default)]
    pub collector: Option<String>,
    /// The request itself.
    #[serde(flatten)]
    pub request: CollectionRequest,
}

impl ArtifactEntry {
    fn is_command(&self) -> bool {
        self.collector.as_deref().unwrap_or(COMMAND_COLLECTOR) == COMMAND_COLLECTOR
    }

    fn label(&self) -> &str {
        self.description.as_deref().or(self.request.command.as_deref()).unwrap_or("<unnamed>")
    }
}

/// A parsed artifact file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArtifactFile {
    /// Default root output directory for the entries.
    #[serde(default)]
    pub output_directory: Option<String>,
    /// Entries, in file order.
    #[serde(default)]
    pub artifacts: Vec<ArtifactEntry>,
}

/// Results of running every entry of an artifact file.
#[derive(Debug, Default)]
pub struct ArtifactRun {
    /// Summaries of the entries that ran.
    pub summaries: Vec<CollectionSummary>,
    /// Request-level errors, in entry order.
    pub errors: Vec<CollectError>,
}

impl ArtifactFile {
    /// Parses an artifact file from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::Artifact`] if the YAML is malformed.
    pub fn parse(path: &Path, yaml: &str) -> Result<Self, CollectError> {
        serde_yaml::from_str(yaml).map_err(|e| CollectError::Artifact {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Reads and parses an artifact file.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::Artifact`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CollectError> {
        let yaml = std::fs::read_to_string(path).map_err(|e| CollectError::Artifact {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(path, &yaml)
    }

    /// Runs every command entry in order.
    ///
    /// The root output directory of an entry is `root_override`, else its own
    /// `root_output_directory`, else the file-level `output_directory`. One
    /// entry failing does not stop the others.
    pub fn run(&self, ctx: &CollectorContext, root_override: Option<&str>) -> ArtifactRun {
        let mut outcome = ArtifactRun::default();

        for entry in &self.artifacts {
            if !entry.is_command() {
                ctx.log.log(
                    LogCategory::Warning,
                    &format!(
                        "skipping {}: unsupported collector {}",
                        entry.label(),
                        entry.collector.as_deref().unwrap_or_default()
                    ),
                );
                continue;
            }

            let mut request = entry.request.clone();
            request.root_output_dir = root_override
                .map(str::to_string)
                .or(request.root_output_dir)
                .or_else(|| self.output_directory.clone());

            match run_request(ctx, &request) {
                Ok(summary) => outcome.summaries.push(summary),
                Err(e) => {
                    ctx.log.log(LogCategory::Error, &format!("{}: {e}", entry.label()));
                    outcome.errors.push(e);
                }
            }
        }

        outcome
    }
}
