//! Removal of zero-length artifacts after a command ran.

use std::io;
use std::path::Path;

/// Deletes `path` if it is a zero-length file.
///
/// Returns `Ok(true)` when a file was removed. A missing file, a non-empty
/// file, or a directory is left alone.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be inspected or removed.
pub fn finalize_if_empty(path: &Path) -> io::Result<bool> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    if !metadata.is_file() || metadata.len() > 0 {
        return Ok(false);
    }

    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Returns the path if it still exists as a non-empty file.
pub(crate) fn surviving(path: &Path) -> Option<std::path::PathBuf> {
    std::fs::metadata(path)
        .ok()
        .filter(|m| m.is_file() && m.len() > 0)
        .map(|_| path.to_path_buf())
}
