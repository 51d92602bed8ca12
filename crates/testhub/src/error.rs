//! Error types for testhub operations.

use crate::domain::CollectionKind;
use std::io;
use thiserror::Error;

/// The error type for testhub operations.
///
/// Of the store's mutating operations only `add` fails, and only with
/// [`Error::DuplicateKey`]. Persistence problems are absorbed by the store
/// and reported through [`RecordStore::pending_writes`] and
/// [`RecordStore::flush`].
///
/// [`RecordStore::pending_writes`]: crate::store::RecordStore::pending_writes
/// [`RecordStore::flush`]: crate::store::RecordStore::flush
#[derive(Debug, Error)]
pub enum Error {
    /// A record with the same unique key already exists in the collection.
    #[error("{collection} ID \"{key}\" already exists")]
    DuplicateKey {
        /// Collection the record was added to
        collection: CollectionKind,
        /// The colliding key
        key: String,
    },

    /// No record with the key exists in the collection.
    #[error("{collection} not found: {key}")]
    NotFound {
        /// Collection searched
        collection: CollectionKind,
        /// The missing key
        key: String,
    },

    /// An import document has no recognizable collections.
    #[error("Invalid import document: {0}")]
    InvalidDocument(String),

    /// Durable slot error.
    #[error("Storage error: {0}")]
    Slot(#[from] testhub_slots::Error),

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration and repository layout errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No `.testhub/` directory was found in the directory tree.
    #[error("Not a testhub repository (or any parent up to the filesystem root). Run 'testhub init' first")]
    NotInitialized,

    /// `.testhub/` already exists in the target directory.
    #[error("testhub is already initialized in this directory. Found existing '{0}'")]
    AlreadyInitialized(String),

    /// Namespace cannot be used as a slot prefix.
    #[error("Invalid namespace: {0}")]
    InvalidNamespace(String),

    /// Configuration file could not be parsed or written.
    #[error("Configuration error: {0}")]
    Parse(String),

    /// Storage backend name not recognized.
    #[error("Unknown storage backend '{0}'. Valid backends: directory, memory")]
    UnknownBackend(String),
}

/// A specialized Result type for testhub operations.
pub type Result<T> = std::result::Result<T, Error>;
