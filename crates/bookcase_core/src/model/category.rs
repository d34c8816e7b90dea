//! Categories: a tree of sub-categories plus a set of books.

use crate::entity::{EntityId, Identified};
use crate::model::non_blank;
use serde::{Deserialize, Serialize};

/// Name used when none (or a blank one) is given.
pub const DEFAULT_CATEGORY_NAME: &str = "Untitled";

/// A category node.
///
/// Sub-categories and books are held as IDs into their stores. The book
/// list is kept symmetric with each book's category list by the category
/// controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    id: EntityId,
    name: String,
    #[serde(default)]
    sub_categories: Vec<EntityId>,
    #[serde(default)]
    books: Vec<EntityId>,
}

impl Category {
    /// Creates an empty category.
    #[must_use]
    pub fn new(id: EntityId, draft: NewCategory) -> Self {
        Self {
            id,
            name: non_blank(draft.name.as_deref(), DEFAULT_CATEGORY_NAME),
            sub_categories: Vec::new(),
            books: Vec::new(),
        }
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the name; blank input falls back to [`DEFAULT_CATEGORY_NAME`].
    pub fn set_name(&mut self, name: &str) {
        self.name = non_blank(Some(name), DEFAULT_CATEGORY_NAME);
    }

    /// Returns the direct sub-category IDs in attachment order.
    #[must_use]
    pub fn sub_category_ids(&self) -> &[EntityId] {
        &self.sub_categories
    }

    /// Returns the IDs of the books in this category.
    #[must_use]
    pub fn book_ids(&self) -> &[EntityId] {
        &self.books
    }

    /// Returns `true` if `child` is a direct sub-category.
    #[must_use]
    pub fn has_sub_category(&self, child: EntityId) -> bool {
        self.sub_categories.contains(&child)
    }

    /// Returns `true` if the book belongs to this category.
    #[must_use]
    pub fn has_book(&self, book: EntityId) -> bool {
        self.books.contains(&book)
    }

    /// Attaches a direct sub-category.
    ///
    /// Returns `false` for self-attachment and for an existing child.
    pub(crate) fn attach_sub_category(&mut self, child: EntityId) -> bool {
        if child == self.id || self.has_sub_category(child) {
            return false;
        }
        self.sub_categories.push(child);
        true
    }

    /// Detaches a direct sub-category; `false` if it was not attached.
    pub(crate) fn detach_sub_category(&mut self, child: EntityId) -> bool {
        let before = self.sub_categories.len();
        self.sub_categories.retain(|c| *c != child);
        self.sub_categories.len() != before
    }

    pub(crate) fn add_book(&mut self, book: EntityId) -> bool {
        if self.has_book(book) {
            return false;
        }
        self.books.push(book);
        true
    }

    pub(crate) fn remove_book(&mut self, book: EntityId) -> bool {
        let before = self.books.len();
        self.books.retain(|b| *b != book);
        self.books.len() != before
    }

    /// Applies every present field of `patch`.
    pub fn apply(&mut self, patch: CategoryPatch) {
        if let Some(name) = patch.name {
            self.set_name(&name);
        }
    }
}

impl Identified for Category {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Arguments for creating a category.
#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    /// Category name.
    pub name: Option<String>,
}

impl NewCategory {
    /// Creates a draft with the given name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Partial update of a category.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    /// New name.
    pub name: Option<String>,
}

impl CategoryPatch {
    /// Creates a patch renaming the category.
    #[must_use]
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}
