//! Resource store trait definition.

use crate::error::{StorageError, StorageResult};

/// A named-resource persistence service.
///
/// Every entity kind is persisted as a single resource holding the whole
/// collection. Bookcase owns the encoding; stores only move bytes.
///
/// # Invariants
///
/// - `write` replaces the previous contents of the resource entirely
/// - `read` returns exactly the bytes of the last successful `write`
/// - `read` of a resource that was never written returns `Ok(None)`
/// - A failed `write` leaves the previous contents readable
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - For testing
/// - [`super::DirectoryStore`] - For persistent storage
pub trait ResourceStore: Send + Sync {
    /// Reads the full contents of `resource`.
    ///
    /// Returns `Ok(None)` if the resource does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or an I/O error occurs.
    fn read(&self, resource: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Replaces the contents of `resource` with `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or the data cannot be made
    /// durable.
    fn write(&self, resource: &str, data: &[u8]) -> StorageResult<()>;

    /// Returns `true` if the resource has been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or an I/O error occurs.
    fn exists(&self, resource: &str) -> StorageResult<bool> {
        Ok(self.read(resource)?.is_some())
    }
}

/// Checks that a resource name is a single plain path component.
///
/// Names such as `books.cbor` are accepted. Empty names, names containing
/// path separators and the special names `.` / `..` are rejected.
///
/// # Errors
///
/// Returns [`StorageError::InvalidResourceName`] for rejected names.
pub fn validate_resource_name(name: &str) -> StorageResult<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if bad {
        return Err(StorageError::invalid_resource_name(name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_are_valid() {
        assert!(validate_resource_name("books.cbor").is_ok());
        assert!(validate_resource_name("users").is_ok());
    }

    #[test]
    fn path_like_names_are_rejected() {
        for name in ["", ".", "..", "../books", "a/b", "a\\b"] {
            assert!(
                matches!(
                    validate_resource_name(name),
                    Err(StorageError::InvalidResourceName { .. })
                ),
                "{name:?} should be rejected"
            );
        }
    }
}
