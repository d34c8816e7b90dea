//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The resource name cannot be mapped onto the store.
    #[error("invalid resource name: {name:?}")]
    InvalidResourceName {
        /// The rejected name.
        name: String,
    },

    /// The stored resource is unreadable.
    #[error("resource corrupted: {0}")]
    Corrupted(String),
}

impl StorageError {
    /// Creates an invalid resource name error.
    pub fn invalid_resource_name(name: impl Into<String>) -> Self {
        Self::InvalidResourceName { name: name.into() }
    }
}
