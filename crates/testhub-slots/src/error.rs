//! Error types for slot store operations.

use std::io;
use thiserror::Error;

/// The error type for slot store operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading or writing a slot.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Slot name cannot be used as a storage key.
    #[error("Invalid slot name: {0}")]
    InvalidSlotName(String),

    /// Writing the slot would exceed the store's capacity.
    #[error("Quota exceeded writing slot '{slot}': needs {needed} bytes, {available} available")]
    QuotaExceeded {
        /// The slot being written.
        slot: String,
        /// Bytes the write would occupy.
        needed: usize,
        /// Bytes left in the store, excluding the slot's previous contents.
        available: usize,
    },
}

/// A specialized Result type for slot store operations.
pub type Result<T> = std::result::Result<T, Error>;
