//! # Bookcase Core
//!
//! Entity lifecycle and relationship management for Bookcase.
//!
//! This crate provides:
//! - Entity types for users, shelves, books, reviews and categories
//! - Per-kind ID sequencing and in-memory entity stores
//! - Lifecycle controllers with create, update, lookup, delete, save and load
//! - A current-user context that controllers observe for login and logout
//! - Whole-collection CBOR encoding over a [`bookcase_storage`] resource store
//! - Integrity verification and catalog statistics
//!
//! ## Relationships
//!
//! - Reviews live inside their book and are saved with it
//! - Shelves live inside their user and are saved with them
//! - Books and categories link many-to-many, and both sides are kept in step
//! - Categories nest; deleting one deletes its whole subtree
//!
//! ## Example
//!
//! ```rust
//! use bookcase_core::{Catalog, Controller, Identified, NewCategory, NewBook};
//!
//! let catalog = Catalog::open_in_memory();
//! let book = catalog.books().create(NewBook::named("Dune").price(9.5)).unwrap();
//! let sf = catalog.categories().create(NewCategory::named("SF")).unwrap();
//!
//! let (book_id, sf_id) = (book.read().id(), sf.read().id());
//! assert!(catalog.categories().add_book_to_category(sf_id, book_id));
//! assert_eq!(book.read().category_ids(), &[sf_id]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
pub mod collection;
mod config;
mod context;
pub mod controller;
pub mod entity;
mod error;
mod integrity;
pub mod model;
mod stats;

pub use catalog::Catalog;
pub use collection::{decode_collection, encode_collection, Entity, FORMAT_VERSION};
pub use config::Config;
pub use context::{UserContext, UserObserver};
pub use controller::{
    BookController, CategoryController, Controller, Lifecycle, ReviewController, ShelfController,
    UserController,
};
pub use entity::{shared, EntityId, EntityStore, IdSequencer, Identified, Shared};
pub use error::{CoreError, CoreResult};
pub use integrity::IntegrityReport;
pub use model::{
    AuthorRef, Book, BookPatch, Category, CategoryPatch, NewBook, NewCategory, NewShelf, NewUser,
    Review, ReviewBuilder, ReviewPatch, Shelf, ShelfPatch, User, UserPatch, DEFAULT_AUTHOR,
    DEFAULT_BOOK_NAME, DEFAULT_CATEGORY_NAME, DEFAULT_PUBLISHER, DEFAULT_USERNAME, MAX_SCORE,
    MIN_SCORE,
};
pub use stats::CatalogStats;

/// Crate version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
