//! In-memory resource store for testing.

use crate::error::StorageResult;
use crate::store::{validate_resource_name, ResourceStore};
use parking_lot::RwLock;
use std::collections::HashMap;

/// An in-memory resource store.
///
/// This store keeps every resource in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral catalogs that don't need persistence
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use bookcase_storage::{InMemoryStore, ResourceStore};
///
/// let store = InMemoryStore::new();
/// store.write("users.cbor", b"data").unwrap();
/// assert!(store.exists("users.cbor").unwrap());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    resources: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with one pre-existing resource.
    ///
    /// Useful for testing load paths, including corrupt payloads.
    #[must_use]
    pub fn with_resource(resource: &str, data: Vec<u8>) -> Self {
        let store = Self::new();
        store.resources.write().insert(resource.to_string(), data);
        store
    }

    /// Returns the names of all written resources, sorted.
    #[must_use]
    pub fn resource_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.resources.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Removes every resource.
    pub fn clear(&self) {
        self.resources.write().clear();
    }
}

impl ResourceStore for InMemoryStore {
    fn read(&self, resource: &str) -> StorageResult<Option<Vec<u8>>> {
        validate_resource_name(resource)?;
        Ok(self.resources.read().get(resource).cloned())
    }

    fn write(&self, resource: &str, data: &[u8]) -> StorageResult<()> {
        validate_resource_name(resource)?;
        self.resources
            .write()
            .insert(resource.to_string(), data.to_vec());
        Ok(())
    }

    fn exists(&self, resource: &str) -> StorageResult<bool> {
        validate_resource_name(resource)?;
        Ok(self.resources.read().contains_key(resource))
    }
}
