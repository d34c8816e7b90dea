//! Per-user shelves.

use crate::entity::{EntityId, Identified};
use crate::model::trimmed;
use serde::{Deserialize, Serialize};

/// A named list of books belonging to one user.
///
/// Shelf IDs are only unique within their owner's shelf list. Books are
/// referenced by ID and are not owned by the shelf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shelf {
    id: EntityId,
    name: String,
    #[serde(default)]
    books: Vec<EntityId>,
}

impl Shelf {
    /// Creates an empty shelf.
    #[must_use]
    pub fn new(id: EntityId, draft: NewShelf) -> Self {
        Self {
            id,
            name: trimmed(draft.name.as_deref()),
            books: Vec::new(),
        }
    }

    /// Returns the shelf name, possibly empty.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the name, trimmed.
    pub fn set_name(&mut self, name: &str) {
        self.name = trimmed(Some(name));
    }

    /// Returns the IDs of the stored books in insertion order.
    #[must_use]
    pub fn book_ids(&self) -> &[EntityId] {
        &self.books
    }

    /// Returns `true` if the book is on this shelf.
    #[must_use]
    pub fn contains_book(&self, book: EntityId) -> bool {
        self.books.contains(&book)
    }

    /// Adds a book; returns `false` if it was already present.
    pub fn add_book(&mut self, book: EntityId) -> bool {
        if self.contains_book(book) {
            return false;
        }
        self.books.push(book);
        true
    }

    /// Removes a book; returns `false` if it was not present.
    pub fn remove_book(&mut self, book: EntityId) -> bool {
        let before = self.books.len();
        self.books.retain(|b| *b != book);
        self.books.len() != before
    }

    /// Applies every present field of `patch`.
    pub fn apply(&mut self, patch: ShelfPatch) {
        if let Some(name) = patch.name {
            self.set_name(&name);
        }
    }
}

impl Identified for Shelf {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Arguments for creating a shelf.
#[derive(Debug, Clone, Default)]
pub struct NewShelf {
    /// Shelf name.
    pub name: Option<String>,
}

impl NewShelf {
    /// Creates a draft with the given name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Partial update of a shelf.
#[derive(Debug, Clone, Default)]
pub struct ShelfPatch {
    /// New name.
    pub name: Option<String>,
}

impl ShelfPatch {
    /// Creates a patch renaming the shelf.
    #[must_use]
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}
