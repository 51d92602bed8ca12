//! Project configuration stored in `.testhub/config.yaml`.
//!
//! ```yaml
//! namespace: testhub
//! storage:
//!   backend: directory
//!   data_dir: .testhub/data
//! ```

use crate::commands::init::validate_namespace;
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use testhub_slots::{DirSlotStore, MemorySlotStore, Namespace, SlotStore, DEFAULT_NAMESPACE};
use tokio::fs;

/// Name of the testhub directory
pub const TESTHUB_DIR_NAME: &str = ".testhub";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Name of the slot directory within `.testhub`
pub const DATA_DIR_NAME: &str = "data";

/// Backend name for one-file-per-slot storage
pub const BACKEND_DIRECTORY: &str = "directory";

/// Backend name for ephemeral in-process storage
pub const BACKEND_MEMORY: &str = "memory";

/// Configuration file structure for testhub
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TesthubConfig {
    /// Prefix of the durable slot names (e.g. "testhub" for "testhub_bugs")
    pub namespace: String,

    /// Storage configuration
    pub storage: StorageConfig,
}

/// Storage configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Storage backend type ("directory" or "memory")
    pub backend: String,

    /// Slot directory, relative to the project root
    pub data_dir: String,
}

/// A resolved storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// One JSON file per slot in the given directory
    Directory(PathBuf),
    /// Slots held in process memory, gone on exit
    Memory,
}

impl StorageConfig {
    /// Resolve the backend, interpreting `data_dir` relative to `root_dir`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownBackend` for an unrecognized backend name.
    pub fn to_backend(&self, root_dir: &Path) -> Result<StorageBackend> {
        match self.backend.as_str() {
            BACKEND_DIRECTORY => Ok(StorageBackend::Directory(root_dir.join(&self.data_dir))),
            BACKEND_MEMORY => Ok(StorageBackend::Memory),
            other => Err(ConfigError::UnknownBackend(other.to_string()).into()),
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Directory(dir) => write!(f, "{BACKEND_DIRECTORY} ({})", dir.display()),
            Self::Memory => f.write_str(BACKEND_MEMORY),
        }
    }
}

impl StorageBackend {
    /// Whether records outlive the process that wrote them.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    /// Open the slot store for this backend.
    ///
    /// # Errors
    ///
    /// Returns a slot error if the data directory cannot be created.
    pub fn open(&self) -> Result<Box<dyn SlotStore>> {
        let slots: Box<dyn SlotStore> = match self {
            Self::Directory(dir) => Box::new(DirSlotStore::open(dir)?),
            Self::Memory => Box::new(MemorySlotStore::new()),
        };
        Ok(slots)
    }
}

impl TesthubConfig {
    /// Create a configuration with directory storage under `.testhub/data`.
    #[must_use]
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            storage: StorageConfig {
                backend: BACKEND_DIRECTORY.to_string(),
                data_dir: format!("{TESTHUB_DIR_NAME}/{DATA_DIR_NAME}"),
            },
        }
    }

    /// Create a configuration with ephemeral storage.
    #[must_use]
    pub fn in_memory(namespace: &str) -> Self {
        let mut config = Self::new(namespace);
        config.storage.backend = BACKEND_MEMORY.to_string();
        config
    }

    /// The configured namespace, validated as a slot prefix.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidNamespace` if the value cannot prefix
    /// slot names. A hand-edited config is held to the same rules as
    /// `init`, including the length limit.
    pub fn namespace(&self) -> Result<Namespace> {
        validate_namespace(&self.namespace)?;
        Namespace::new(self.namespace.as_str())
            .map_err(|e| ConfigError::InvalidNamespace(e.to_string()).into())
    }

    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read, or
    /// `ConfigError::Parse` if it is not valid configuration YAML.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }
}

impl Default for TesthubConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    #[test]
    fn test_config_new() {
        let config = TesthubConfig::new("qa");
        assert_eq!(config.namespace, "qa");
        assert_eq!(config.storage.backend, "directory");
        assert_eq!(config.storage.data_dir, ".testhub/data");
    }

    #[test]
    fn test_namespace_rejects_overlong_hand_edited_value() {
        let mut config = TesthubConfig::new("qa");
        config.namespace = "a".repeat(120);

        let err = config.namespace().unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::InvalidNamespace(_))));
        assert!(err.to_string().contains("cannot exceed"));

        config.namespace = "a".repeat(32);
        assert_eq!(config.namespace().unwrap().slot("testcases").len(), 42);
    }

    #[test]
    fn test_config_default_namespace() {
        assert_eq!(TesthubConfig::default().namespace, DEFAULT_NAMESPACE);
    }

    #[test]
    fn test_to_backend_resolves_relative_dir() {
        let config = TesthubConfig::new("qa");
        let backend = config.storage.to_backend(Path::new("/work")).unwrap();
        assert_eq!(
            backend,
            StorageBackend::Directory(PathBuf::from("/work/.testhub/data"))
        );

        assert!(backend.is_persistent());

        let config = TesthubConfig::in_memory("qa");
        let backend = config.storage.to_backend(Path::new("/work")).unwrap();
        assert_eq!(backend, StorageBackend::Memory);
        assert!(!backend.is_persistent());
    }

    #[test]
    fn test_unknown_backend() {
        let mut config = TesthubConfig::new("qa");
        config.storage.backend = "sqlite".to_string();
        let result = config.storage.to_backend(Path::new("."));
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::UnknownBackend(name))) if name == "sqlite"
        ));
    }

    #[test]
    fn test_invalid_namespace_in_file() {
        let mut config = TesthubConfig::new("qa");
        config.namespace = "../escape".to_string();
        assert!(matches!(
            config.namespace(),
            Err(Error::Config(ConfigError::InvalidNamespace(_)))
        ));
    }

    #[tokio::test]
    async fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);

        let original = TesthubConfig::in_memory("team_a");
        original.save(&config_path).await.unwrap();

        let content = tokio::fs::read_to_string(&config_path).await.unwrap();
        assert!(content.contains("namespace: team_a"));
        assert!(content.contains("backend: memory"));

        let loaded = TesthubConfig::load(&config_path).await.unwrap();
        assert_eq!(original, loaded);
    }

    #[tokio::test]
    async fn test_config_load_rejects_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        tokio::fs::write(&config_path, "namespace: [unclosed")
            .await
            .unwrap();

        let result = TesthubConfig::load(&config_path).await;
        assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
    }
}
