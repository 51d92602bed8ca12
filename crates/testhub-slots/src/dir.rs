//! File-backed slot store.
//!
//! Each slot is a file `<dir>/<slot>.json`. Writes go through
//! [`write_atomic`](crate::atomic::write_atomic), so a slot file always holds
//! one complete value.

use crate::atomic::write_atomic;
use crate::slot::validate_slot_name;
use crate::{Result, SlotStore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File extension used for slot files.
pub const SLOT_FILE_EXTENSION: &str = "json";

/// Slot store keeping one file per slot in a directory.
#[derive(Debug, Clone)]
pub struct DirSlotStore {
    dir: PathBuf,
}

impl DirSlotStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the directory cannot be created.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), "opened slot directory");
        Ok(Self { dir })
    }

    /// The directory holding the slot files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file backing `slot`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSlotName` if `slot` is not a valid name.
    pub fn slot_path(&self, slot: &str) -> Result<PathBuf> {
        validate_slot_name(slot)?;
        Ok(self.dir.join(format!("{slot}.{SLOT_FILE_EXTENSION}")))
    }
}

impl SlotStore for DirSlotStore {
    fn get(&self, slot: &str) -> Result<Option<String>> {
        let path = self.slot_path(slot)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, slot: &str, value: &str) -> Result<()> {
        let path = self.slot_path(slot)?;
        write_atomic(&path, value)
    }

    fn remove(&mut self, slot: &str) -> Result<()> {
        let path = self.slot_path(slot)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SLOT_FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_slot_name(stem).is_ok() {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}
