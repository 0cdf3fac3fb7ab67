//! Atomic file writes
//!
//! Both persisted files (the task checklist and the history document) are
//! rewritten wholesale on every change. Each write goes to a temporary
//! sibling that is then renamed over the target, so readers see either the
//! old or the new contents, never a truncated file.
//!
//! There is no locking: one process owns a data directory at a time.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Atomically write data to a file
///
/// Writes to a temporary file in the same directory, then renames it to the
/// target path. Parent directories are created as needed.
pub fn write_atomic(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension(format!(
        "{}.tmp.{}",
        path.extension().and_then(|e| e.to_str()).unwrap_or(""),
        std::process::id()
    ));

    let mut temp_file = File::create(&temp_path)?;
    temp_file.write_all(data)?;
    temp_file.sync_all()?;
    drop(temp_file);

    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }

    Ok(())
}

/// Atomically write string data to a file
pub fn write_atomic_str(path: impl AsRef<Path>, data: &str) -> Result<()> {
    write_atomic(path, data.as_bytes())
}
