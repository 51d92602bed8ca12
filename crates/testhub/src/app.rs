//! Application context for CLI command execution.
//!
//! This module provides the `App` struct that locates the project, opens
//! the configured slot backend, and owns the record store for the duration
//! of a command.
//!
//! # Example
//!
//! ```no_run
//! use testhub::app::App;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_directory(Path::new(".")).await?;
//!     println!("{} bugs", app.store().summary().total_bugs);
//!     Ok(())
//! }
//! ```

use crate::commands::init::find_testhub_root;
use crate::config::{CONFIG_FILE_NAME, StorageBackend, TESTHUB_DIR_NAME, TesthubConfig};
use crate::error::{ConfigError, Result};
use crate::store::{LoadWarning, RecordStore};
use std::path::{Path, PathBuf};

/// Application context for CLI operations.
///
/// The store is loaded from the configured slots on creation; problems
/// found while loading are kept for the command to report.
pub struct App {
    /// The record store
    store: RecordStore,

    /// Path to the testhub directory (.testhub)
    testhub_dir: PathBuf,

    /// Resolved storage backend
    backend: StorageBackend,

    /// Problems found while loading the collections
    load_warnings: Vec<LoadWarning>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("testhub_dir", &self.testhub_dir)
            .field("backend", &self.backend)
            .field("store", &self.store)
            .field("load_warnings", &self.load_warnings.len())
            .finish()
    }
}

impl App {
    /// Create an App instance from the given working directory.
    ///
    /// Searches up the directory tree to find a `.testhub/` directory,
    /// loads configuration, and opens the store.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No testhub project is found in the directory tree
    /// - Configuration cannot be loaded or names an unknown backend
    /// - The slot directory cannot be created
    pub async fn from_directory(working_dir: &Path) -> Result<Self> {
        let root_dir = find_testhub_root(working_dir).ok_or(ConfigError::NotInitialized)?;

        let testhub_dir = root_dir.join(TESTHUB_DIR_NAME);
        let config_path = testhub_dir.join(CONFIG_FILE_NAME);

        let config = TesthubConfig::load(&config_path).await?;
        let namespace = config.namespace()?;
        let backend = config.storage.to_backend(&root_dir)?;

        tracing::debug!(?backend, namespace = %namespace, "Opening record store");
        if !backend.is_persistent() {
            tracing::warn!("Memory backend: changes are discarded when this command exits");
        }
        let (store, load_warnings) = RecordStore::open(backend.open()?, namespace);

        Ok(Self {
            store,
            testhub_dir,
            backend,
            load_warnings,
        })
    }

    /// Get an immutable reference to the store.
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Get a mutable reference to the store.
    pub fn store_mut(&mut self) -> &mut RecordStore {
        &mut self.store
    }

    /// Get the path to the testhub directory.
    #[must_use]
    pub fn testhub_dir(&self) -> &Path {
        &self.testhub_dir
    }

    /// Get the resolved storage backend.
    #[must_use]
    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    /// Problems found while loading the collections.
    #[must_use]
    pub fn load_warnings(&self) -> &[LoadWarning] {
        &self.load_warnings
    }

    /// Make sure every change has reached the slots.
    ///
    /// Store mutations persist as they happen; this retries any write that
    /// failed so the command can report it instead of exiting silently.
    ///
    /// # Errors
    ///
    /// Returns the first slot write error that persists after retrying.
    pub fn finish(&mut self) -> Result<()> {
        self.store.flush()
    }
}
