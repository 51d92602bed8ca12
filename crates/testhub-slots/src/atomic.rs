//! Atomic whole-file writes.
//!
//! Slot contents are written with the temp-file-then-rename pattern:
//!
//! 1. The contents go to a sibling file with a `.tmp` suffix
//! 2. The temporary file is flushed and synced to disk
//! 3. The temporary file is renamed over the target path
//!
//! Renames within one filesystem are atomic on POSIX systems, so a crash at
//! any point leaves either the old contents or the new contents in place,
//! never a truncated mix. A stray `.tmp` file may remain after a crash and is
//! overwritten by the next successful write.

use crate::Result;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically replace the contents of `path` with `contents`.
///
/// # Errors
///
/// Returns an IO error if the temporary file cannot be created or written,
/// or if the final rename fails. On failure the target file is unchanged
/// and the temporary file is removed on a best-effort basis.
pub fn write_atomic<P: AsRef<Path>>(path: P, contents: &str) -> Result<()> {
    let path = path.as_ref();
    let temp_path = make_temp_path(path);

    if let Err(e) = write_to_temp_file(&temp_path, contents) {
        // Best-effort cleanup of temp file
        let _ = std::fs::remove_file(&temp_path);
        return Err(e);
    }

    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e.into());
    }

    tracing::trace!(path = %path.display(), bytes = contents.len(), "atomic write complete");
    Ok(())
}

/// Creates a temporary file path for an atomic write.
///
/// The temp path is created by appending `.tmp` to the original filename.
/// If the original path has no extension, `.tmp` is appended directly.
/// If it has an extension, the extension is replaced with `{ext}.tmp`.
pub(crate) fn make_temp_path(path: &Path) -> PathBuf {
    let mut temp_path = path.to_path_buf();
    let new_extension = match path.extension() {
        Some(ext) => {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".tmp");
            new_ext
        }
        None => std::ffi::OsString::from("tmp"),
    };
    temp_path.set_extension(new_extension);
    temp_path
}

fn write_to_temp_file(temp_path: &Path, contents: &str) -> Result<()> {
    let mut file = File::create(temp_path)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn make_temp_path_with_extension() {
        let path = Path::new("/path/to/testhub_bugs.json");
        let temp = make_temp_path(path);
        assert_eq!(temp, Path::new("/path/to/testhub_bugs.json.tmp"));
    }

    #[test]
    fn make_temp_path_without_extension() {
        let path = Path::new("/path/to/file");
        let temp = make_temp_path(path);
        assert_eq!(temp, Path::new("/path/to/file.tmp"));
    }

    #[test]
    fn make_temp_path_relative() {
        let path = Path::new("data.json");
        let temp = make_temp_path(path);
        assert_eq!(temp, Path::new("data.json.tmp"));
    }

    #[test]
    fn write_atomic_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("slot.json");

        write_atomic(&path, "[1,2,3]").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[1,2,3]");
        assert!(!make_temp_path(&path).exists());
    }

    #[test]
    fn write_atomic_replaces_existing_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("slot.json");
        std::fs::write(&path, "a much longer original value").unwrap();

        write_atomic(&path, "short").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "short");
    }

    #[test]
    fn write_atomic_into_missing_directory_fails_and_leaves_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("slot.json");

        assert!(write_atomic(&path, "x").is_err());
        assert!(!path.exists());
        assert!(!make_temp_path(&path).exists());
    }
}
