//! Book lifecycle.

use crate::controller::{Controller, Lifecycle};
use crate::entity::{EntityId, EntityStore, Shared};
use crate::error::CoreResult;
use crate::model::{Book, BookPatch, Category, NewBook, User};
use bookcase_storage::ResourceStore;
use std::sync::Arc;

/// Manages books.
///
/// Deleting a book drops its reviews, detaches it from every category and
/// takes it off every user's shelves before it leaves the store. Nothing
/// keeps the ID, so a later book that reuses it starts unreferenced.
#[derive(Debug)]
pub struct BookController {
    lifecycle: Lifecycle<Book>,
    categories: Arc<EntityStore<Category>>,
    users: Arc<EntityStore<User>>,
}

impl BookController {
    /// Creates a controller over `store`, resolving category links through
    /// `categories` and shelf entries through `users`.
    pub fn new(
        store: Arc<EntityStore<Book>>,
        categories: Arc<EntityStore<Category>>,
        users: Arc<EntityStore<User>>,
        resources: Arc<dyn ResourceStore>,
    ) -> Self {
        Self {
            lifecycle: Lifecycle::new(store, resources),
            categories,
            users,
        }
    }

    /// Returns the book store.
    #[must_use]
    pub fn store(&self) -> &Arc<EntityStore<Book>> {
        self.lifecycle.store()
    }

    /// Returns how many records the last load dropped for repeating an ID.
    #[must_use]
    pub fn discarded_on_load(&self) -> usize {
        self.lifecycle.discarded_on_load()
    }

    /// Returns the ID the next new book will get.
    #[must_use]
    pub fn next_id(&self) -> EntityId {
        self.lifecycle.next_id()
    }

    /// Returns the mean review score of a book, or `None` if it is unknown.
    #[must_use]
    pub fn score(&self, id: EntityId) -> Option<f64> {
        self.lifecycle.find_by_id(id).map(|b| b.read().score())
    }

    /// Persists the book collection, returning the error on failure.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the resource write fails.
    pub fn try_save_all(&self) -> CoreResult<usize> {
        self.lifecycle.try_save_all()
    }
}

impl Controller for BookController {
    type Record = Shared<Book>;
    type Draft = NewBook;
    type Patch = BookPatch;

    fn create(&self, draft: NewBook) -> Option<Shared<Book>> {
        Some(self.lifecycle.create(draft))
    }

    fn update(&self, id: EntityId, patch: BookPatch) -> bool {
        self.lifecycle.update(id, patch)
    }

    fn find_by_id(&self, id: EntityId) -> Option<Shared<Book>> {
        self.lifecycle.find_by_id(id)
    }

    fn list_all(&self) -> Vec<Shared<Book>> {
        self.lifecycle.list_all()
    }

    fn delete_by_id(&self, id: EntityId) -> bool {
        let Some(book) = self.lifecycle.find_by_id(id) else {
            return false;
        };

        let (reviews, linked) = {
            let mut book = book.write();
            (book.clear_reviews(), book.take_categories())
        };

        // Scan every category so a one-sided link cannot survive.
        let mut detached = 0usize;
        for category in self.categories.list_snapshot() {
            if category.write().remove_book(id) {
                detached += 1;
            }
        }

        let unshelved: usize = self
            .users
            .list_snapshot()
            .iter()
            .map(|u| u.write().remove_book_from_shelves(id))
            .sum();

        tracing::debug!(
            %id,
            reviews,
            categories = linked.len(),
            detached,
            unshelved,
            "severed book links"
        );
        self.lifecycle.delete_by_id(id)
    }

    fn save_all(&self) -> bool {
        self.lifecycle.save_all()
    }

    fn load_all(&self) -> usize {
        self.lifecycle.load_all()
    }
}
