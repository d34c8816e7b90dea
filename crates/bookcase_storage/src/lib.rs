//! # Bookcase Storage
//!
//! Persistence service for Bookcase.
//!
//! Resource stores are **opaque byte stores keyed by name**. Each entity kind
//! is saved as one resource holding a whole serialized collection; the store
//! does not interpret what it holds.
//!
//! ## Design Principles
//!
//! - Two operations only: write a resource, read a resource back
//! - An absent resource is not an error: `read` returns `Ok(None)`
//! - No knowledge of entity kinds or encodings
//! - Must be `Send + Sync` so a store can be shared between controllers
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - For testing and ephemeral sessions
//! - [`DirectoryStore`] - One file per resource under a data directory
//!
//! ## Example
//!
//! ```rust
//! use bookcase_storage::{InMemoryStore, ResourceStore};
//!
//! let store = InMemoryStore::new();
//! store.write("books.cbor", b"payload").unwrap();
//! assert_eq!(store.read("books.cbor").unwrap(), Some(b"payload".to_vec()));
//! assert_eq!(store.read("users.cbor").unwrap(), None);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod directory;
mod error;
mod memory;
mod store;

pub use directory::DirectoryStore;
pub use error::{StorageError, StorageResult};
pub use memory::InMemoryStore;
pub use store::{validate_resource_name, ResourceStore};
