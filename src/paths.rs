//! Output location resolution.
//!
//! Directory and file templates are rendered with the current line,
//! sanitized, and anchored under the scratch root:
//!
//! ```text
//! <scratch>/<sanitize(root + "/" + sub)>/<sanitize_filename(output)>
//! <scratch>/<sanitize(root + "/" + sub)>/<sanitize_filename(stderr)>
//! ```
//!
//! Names are built from the lossy text of the rendered template, so bytes
//! that are not UTF-8 show up as `U+FFFD` in the artifact tree.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use crate::sanitize::{sanitize_filename, sanitize_path};
use crate::template::render_line;

/// Suffix for stderr files when no explicit stderr template is given.
pub const STDERR_SUFFIX: &str = ".stderr";

/// Suffix appended to compressed output files.
pub const GZIP_SUFFIX: &str = ".gz";

/// Where one execution writes its artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Sanitized absolute directory under the scratch root.
    pub directory: PathBuf,
    /// Sanitized output file name.
    pub output_file_name: String,
    /// Sanitized stderr file name.
    pub stderr_file_name: String,
}

impl ResolvedPaths {
    /// Full path of the uncompressed output file.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.directory.join(&self.output_file_name)
    }

    /// Full path of the compressed output file.
    #[must_use]
    pub fn compressed_output_path(&self) -> PathBuf {
        self.directory.join(format!("{}{GZIP_SUFFIX}", self.output_file_name))
    }

    /// Full path of the stderr file.
    #[must_use]
    pub fn stderr_path(&self) -> PathBuf {
        self.directory.join(&self.stderr_file_name)
    }
}

/// Output templates for one request.
#[derive(Debug, Clone, Copy)]
pub struct OutputTemplates<'a> {
    /// Root output directory, relative to the scratch root.
    pub root_dir: &'a str,
    /// Optional subdirectory template.
    pub sub_dir: Option<&'a str>,
    /// Output file name template.
    pub output_file: &'a str,
    /// Optional stderr file name template.
    pub stderr_file: Option<&'a str>,
}

/// Sanitized root output directory under the scratch root.
#[must_use]
pub fn root_directory(scratch_root: &Path, root_dir: &str) -> PathBuf {
    scratch_root.join(sanitize_path(root_dir))
}

/// Resolves and creates the output location for one execution.
///
/// The subdirectory is joined to the root before sanitizing, so `..` in a
/// rendered subdirectory cannot climb out of the scratch root.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn resolve(
    scratch_root: &Path,
    templates: &OutputTemplates<'_>,
    line: Option<&OsStr>,
) -> io::Result<ResolvedPaths> {
    let sub_dir = templates.sub_dir.map(|t| render_text(t, line)).unwrap_or_default();
    let joined = format!("{}/{sub_dir}", templates.root_dir);
    let directory = scratch_root.join(sanitize_path(&joined));

    let output_file_name = sanitize_filename(&render_text(templates.output_file, line));
    let stderr_file_name = match templates.stderr_file.filter(|t| !t.trim().is_empty()) {
        Some(template) => sanitize_filename(&render_text(template, line)),
        None => format!("{output_file_name}{STDERR_SUFFIX}"),
    };

    std::fs::create_dir_all(&directory)?;

    Ok(ResolvedPaths { directory, output_file_name, stderr_file_name })
}

fn render_text(template: &str, line: Option<&OsStr>) -> String {
    render_line(template, line).to_string_lossy().into_owned()
}
