//! Directory-based resource store for persistent storage.

use crate::error::StorageResult;
use crate::store::{validate_resource_name, ResourceStore};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// A resource store backed by one file per resource.
///
/// Resources live directly under a root directory; `books.cbor` is stored
/// as `<root>/books.cbor`. Data survives process restarts.
///
/// # Durability
///
/// `write` goes to a sibling temporary file first, is synced with
/// `File::sync_all()`, then renamed over the target. A failed write never
/// clobbers the previous contents.
///
/// # Thread Safety
///
/// Writes are serialized by an internal lock.
///
/// # Example
///
/// ```no_run
/// use bookcase_storage::{DirectoryStore, ResourceStore};
/// use std::path::Path;
///
/// let store = DirectoryStore::open_with_create_dirs(Path::new("data")).unwrap();
/// store.write("books.cbor", b"persistent data").unwrap();
/// ```
#[derive(Debug)]
pub struct DirectoryStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl DirectoryStore {
    /// Opens a store rooted at an existing directory.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` does not exist or is not a directory.
    pub fn open(root: &Path) -> StorageResult<Self> {
        let metadata = fs::metadata(root)?;
        if !metadata.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", root.display()),
            )
            .into());
        }
        Ok(Self {
            root: root.to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    /// Opens a store, creating the root directory and its parents if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created.
    pub fn open_with_create_dirs(root: &Path) -> StorageResult<Self> {
        fs::create_dir_all(root)?;
        Self::open(root)
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file path a resource maps to.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource name is invalid.
    pub fn resource_path(&self, resource: &str) -> StorageResult<PathBuf> {
        validate_resource_name(resource)?;
        Ok(self.root.join(resource))
    }
}

impl ResourceStore for DirectoryStore {
    fn read(&self, resource: &str) -> StorageResult<Option<Vec<u8>>> {
        let path = self.resource_path(resource)?;
        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        Ok(Some(buffer))
    }

    fn write(&self, resource: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.resource_path(resource)?;
        let tmp_path = self.root.join(format!(".{resource}.tmp"));

        let _guard = self.write_lock.lock();
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&tmp_path)?;
            file.write_all(data)?;
            file.sync_all()?;
        }
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        tracing::trace!(resource, bytes = data.len(), "resource written");
        Ok(())
    }

    fn exists(&self, resource: &str) -> StorageResult<bool> {
        Ok(self.resource_path(resource)?.is_file())
    }
}
