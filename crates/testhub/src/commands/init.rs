//! Implementation of the `init` command.
//!
//! This module handles initialization of a new testhub project, creating
//! the `.testhub/` directory with its configuration and slot directory.

use crate::config::{
    BACKEND_DIRECTORY, CONFIG_FILE_NAME, DATA_DIR_NAME, TESTHUB_DIR_NAME, TesthubConfig,
};
use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};
use testhub_slots::{DEFAULT_NAMESPACE, Namespace};
use tokio::fs;

/// Name of the gitignore file within .testhub
pub const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Maximum namespace length
pub const MAX_NAMESPACE_LENGTH: usize = 32;

/// Maximum directory depth to traverse when searching for the testhub root
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Result of the init command
#[derive(Debug)]
pub struct InitResult {
    /// Path to the created testhub directory
    pub testhub_dir: PathBuf,
    /// Path to the created config file
    pub config_file: PathBuf,
    /// Path to the created slot directory, if the backend uses one
    pub data_dir: Option<PathBuf>,
    /// The namespace prefixing slot names
    pub namespace: String,
}

/// Validate a namespace.
///
/// Requirements:
/// - At most 32 characters
/// - A valid slot name: ASCII letters, digits, `_`, `-`, `.`, no leading dot
///
/// Note: Expects pre-trimmed input. Callers should trim whitespace before calling.
///
/// # Errors
///
/// Returns `ConfigError::InvalidNamespace` describing the first violation.
pub fn validate_namespace(namespace: &str) -> Result<()> {
    if namespace.len() > MAX_NAMESPACE_LENGTH {
        return Err(ConfigError::InvalidNamespace(format!(
            "Namespace cannot exceed {MAX_NAMESPACE_LENGTH} characters"
        ))
        .into());
    }

    Namespace::new(namespace)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidNamespace(e.to_string()).into())
}

/// Initialize a new testhub project in the given directory.
///
/// # Arguments
///
/// * `base_dir` - The base directory where `.testhub/` will be created
/// * `namespace` - Optional slot namespace (defaults to "testhub")
/// * `memory` - Use ephemeral in-memory storage instead of slot files
///
/// # Errors
///
/// Returns an error if:
/// - The `.testhub/` directory already exists
/// - The namespace is invalid
/// - File system operations fail
pub async fn init(base_dir: &Path, namespace: Option<&str>, memory: bool) -> Result<InitResult> {
    let namespace = namespace.unwrap_or(DEFAULT_NAMESPACE).trim();
    validate_namespace(namespace)?;

    let testhub_dir = base_dir.join(TESTHUB_DIR_NAME);
    if testhub_dir.exists() {
        return Err(ConfigError::AlreadyInitialized(TESTHUB_DIR_NAME.to_string()).into());
    }

    fs::create_dir_all(&testhub_dir).await?;

    let config = if memory {
        TesthubConfig::in_memory(namespace)
    } else {
        TesthubConfig::new(namespace)
    };
    let config_file = testhub_dir.join(CONFIG_FILE_NAME);
    config.save(&config_file).await?;

    let data_dir = if config.storage.backend == BACKEND_DIRECTORY {
        let dir = base_dir.join(&config.storage.data_dir);
        fs::create_dir_all(&dir).await?;
        Some(dir)
    } else {
        None
    };

    let gitignore_file = testhub_dir.join(GITIGNORE_FILE_NAME);
    let gitignore_content = format!(
        "\
# Slot files under {DATA_DIR_NAME}/ hold the project's records and should be tracked
# Leftover temporary files from interrupted writes
*.tmp
"
    );
    fs::write(&gitignore_file, gitignore_content).await?;

    tracing::info!(dir = %testhub_dir.display(), namespace, "Initialized testhub project");

    Ok(InitResult {
        testhub_dir,
        config_file,
        data_dir,
        namespace: namespace.to_string(),
    })
}

/// Check if a directory has been initialized with testhub.
///
/// Returns `true` if the `.testhub/` directory exists.
#[must_use]
pub fn is_initialized(base_dir: &Path) -> bool {
    base_dir.join(TESTHUB_DIR_NAME).exists()
}

/// Find the testhub root directory by searching up the directory tree.
///
/// Starts from the given directory and traverses parent directories
/// until a `.testhub/` directory is found, the root is reached, or
/// the maximum traversal depth is exceeded.
///
/// # Returns
///
/// Returns `Some(path)` with the directory containing `.testhub/`,
/// or `None` if no testhub project is found within the depth limit.
#[must_use]
pub fn find_testhub_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if is_initialized(&current) {
            return Some(current);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rstest::rstest;
    use tempfile::TempDir;

    // ========== Namespace Validation Tests ==========

    #[rstest]
    #[case::default("testhub")]
    #[case::short("qa")]
    #[case::underscore("team_a")]
    #[case::hyphen("release-2")]
    #[case::max_length("a".repeat(MAX_NAMESPACE_LENGTH))]
    fn test_validate_namespace_valid(#[case] namespace: impl AsRef<str>) {
        assert!(validate_namespace(namespace.as_ref()).is_ok());
    }

    #[rstest]
    #[case::empty("", "empty")]
    #[case::too_long("a".repeat(MAX_NAMESPACE_LENGTH + 1), "cannot exceed 32")]
    #[case::slash("team/a", "not allowed")]
    #[case::space("team a", "not allowed")]
    #[case::leading_dot(".hidden", "cannot start with")]
    fn test_validate_namespace_invalid(
        #[case] namespace: impl AsRef<str>,
        #[case] expected_error: &str,
    ) {
        let result = validate_namespace(namespace.as_ref());
        let err_msg = result.unwrap_err().to_string().to_lowercase();
        assert!(
            err_msg.contains(&expected_error.to_lowercase()),
            "Expected error to contain '{expected_error}', got: '{err_msg}'"
        );
    }

    // ========== Init Command Tests ==========

    #[tokio::test]
    async fn test_init_creates_directory_structure() {
        let temp_dir = TempDir::new().unwrap();

        let result = init(temp_dir.path(), None, false).await.unwrap();

        assert!(result.testhub_dir.exists());
        assert!(result.config_file.exists());
        assert!(result.data_dir.as_ref().is_some_and(|d| d.is_dir()));
        assert!(result.testhub_dir.join(GITIGNORE_FILE_NAME).exists());
        assert_eq!(result.namespace, DEFAULT_NAMESPACE);
    }

    #[tokio::test]
    async fn test_init_with_custom_namespace() {
        let temp_dir = TempDir::new().unwrap();

        let result = init(temp_dir.path(), Some("  qa_team "), false)
            .await
            .unwrap();

        assert_eq!(result.namespace, "qa_team");
        let config = TesthubConfig::load(&result.config_file).await.unwrap();
        assert_eq!(config.namespace, "qa_team");
    }

    #[tokio::test]
    async fn test_init_memory_backend_skips_data_dir() {
        let temp_dir = TempDir::new().unwrap();

        let result = init(temp_dir.path(), None, true).await.unwrap();

        assert!(result.data_dir.is_none());
        let config = TesthubConfig::load(&result.config_file).await.unwrap();
        assert_eq!(config.storage.backend, "memory");
    }

    #[tokio::test]
    async fn test_init_fails_if_already_initialized() {
        let temp_dir = TempDir::new().unwrap();

        init(temp_dir.path(), None, false).await.unwrap();
        let result = init(temp_dir.path(), None, false).await;

        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::AlreadyInitialized(_)))
        ));
    }

    #[tokio::test]
    async fn test_init_fails_with_invalid_namespace() {
        let temp_dir = TempDir::new().unwrap();

        let result = init(temp_dir.path(), Some("bad/name"), false).await;

        assert!(result.is_err());
        assert!(!is_initialized(temp_dir.path()));
    }

    // ========== Utility Function Tests ==========

    #[test]
    fn test_find_testhub_root_in_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join(TESTHUB_DIR_NAME)).unwrap();

        let sub_dir = temp_dir.path().join("sub").join("nested");
        std::fs::create_dir_all(&sub_dir).unwrap();

        let found = find_testhub_root(&sub_dir);
        assert_eq!(found, Some(temp_dir.path().to_path_buf()));
    }

    #[test]
    fn test_find_testhub_root_not_found() {
        let temp_dir = TempDir::new().unwrap();

        assert!(find_testhub_root(temp_dir.path()).is_none());
    }
}
