//! Category tree management.
//!
//! Categories form a tree of sub-category IDs and a many-to-many link with
//! books. The book link is kept symmetric: a category lists a book exactly
//! when the book lists the category.
//!
//! Deleting a category is a postorder cascade. Every sub-category is deleted
//! first, depth-first, then the category's book links are severed and it is
//! removed from the store. By the time a node leaves the store none of its
//! descendants remain.

use crate::controller::{Controller, Lifecycle};
use crate::entity::{EntityId, EntityStore, Identified, Shared};
use crate::error::{CoreError, CoreResult};
use crate::model::{Book, Category, CategoryPatch, NewCategory};
use bookcase_storage::ResourceStore;
use std::collections::HashSet;
use std::sync::Arc;

/// Manages categories, their sub-category tree and their books.
#[derive(Debug)]
pub struct CategoryController {
    lifecycle: Lifecycle<Category>,
    books: Arc<EntityStore<Book>>,
    strict_tree: bool,
}

impl CategoryController {
    /// Creates a controller over `store`, resolving book links through
    /// `books`.
    ///
    /// With `strict_tree`, [`attach_sub_category`](Self::attach_sub_category)
    /// also rejects attaching an ancestor beneath one of its descendants.
    pub fn new(
        store: Arc<EntityStore<Category>>,
        books: Arc<EntityStore<Book>>,
        resources: Arc<dyn ResourceStore>,
        strict_tree: bool,
    ) -> Self {
        Self {
            lifecycle: Lifecycle::new(store, resources),
            books,
            strict_tree,
        }
    }

    /// Returns the category store.
    #[must_use]
    pub fn store(&self) -> &Arc<EntityStore<Category>> {
        self.lifecycle.store()
    }

    /// Returns how many records the last load dropped for repeating an ID.
    #[must_use]
    pub fn discarded_on_load(&self) -> usize {
        self.lifecycle.discarded_on_load()
    }

    /// Returns the ID the next new category will get.
    #[must_use]
    pub fn next_id(&self) -> EntityId {
        self.lifecycle.next_id()
    }

    /// Creates a category and attaches it beneath `parent_id`.
    ///
    /// Returns `None` without creating anything if the parent is unknown.
    pub fn add_sub_category(
        &self,
        parent_id: EntityId,
        draft: NewCategory,
    ) -> Option<Shared<Category>> {
        let parent = self.lifecycle.find_by_id(parent_id)?;
        let child = self.lifecycle.create(draft);
        let child_id = child.read().id();
        parent.write().attach_sub_category(child_id);
        tracing::debug!(parent = %parent_id, child = %child_id, "added sub-category");
        Some(child)
    }

    /// Attaches an existing category beneath `parent_id`.
    ///
    /// Returns `Ok(false)` if either category is unknown or the child is
    /// already attached.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CategoryCycle`] when attaching a category to
    /// itself, and, in strict mode, when `parent_id` is reachable from
    /// `child_id`.
    pub fn attach_sub_category(&self, parent_id: EntityId, child_id: EntityId) -> CoreResult<bool> {
        let cycle = CoreError::CategoryCycle {
            parent: parent_id,
            child: child_id,
        };
        if parent_id == child_id {
            return Err(cycle);
        }

        let Some(parent) = self.lifecycle.find_by_id(parent_id) else {
            return Ok(false);
        };
        if !self.store().contains(child_id) {
            return Ok(false);
        }
        if self.strict_tree && self.is_reachable(child_id, parent_id) {
            tracing::warn!(parent = %parent_id, child = %child_id, "refused cyclic attachment");
            return Err(cycle);
        }

        let attached = parent.write().attach_sub_category(child_id);
        Ok(attached)
    }

    /// Detaches `sub_id` from `parent_id` and deletes it with its subtree.
    ///
    /// Returns `false` if `sub_id` was not a child of `parent_id`.
    pub fn remove_sub_category(&self, parent_id: EntityId, sub_id: EntityId) -> bool {
        let Some(parent) = self.lifecycle.find_by_id(parent_id) else {
            return false;
        };
        let detached = parent.write().detach_sub_category(sub_id);
        if detached {
            self.delete_by_id(sub_id);
        }
        detached
    }

    /// Links a book and a category on both sides.
    ///
    /// Returns `false` if either is unknown or they were already linked.
    pub fn add_book_to_category(&self, category_id: EntityId, book_id: EntityId) -> bool {
        let Some((category, book)) = self.resolve(category_id, book_id) else {
            return false;
        };
        let added = category.write().add_book(book_id);
        let back = book.write().add_category(category_id);
        added || back
    }

    /// Unlinks a book and a category on both sides.
    ///
    /// Returns `false` if either is unknown or they were not linked.
    pub fn remove_book_from_category(&self, category_id: EntityId, book_id: EntityId) -> bool {
        let Some((category, book)) = self.resolve(category_id, book_id) else {
            return false;
        };
        let removed = category.write().remove_book(book_id);
        let back = book.write().remove_category(category_id);
        removed || back
    }

    /// Returns the books of a category in link order, skipping stale IDs.
    #[must_use]
    pub fn list_books_in_category(&self, category_id: EntityId) -> Vec<Shared<Book>> {
        let Some(category) = self.lifecycle.find_by_id(category_id) else {
            return Vec::new();
        };
        let ids = category.read().book_ids().to_vec();
        ids.into_iter()
            .filter_map(|id| self.books.find_by_id(id))
            .collect()
    }

    /// Returns the direct sub-categories in attachment order.
    #[must_use]
    pub fn list_sub_categories(&self, category_id: EntityId) -> Vec<Shared<Category>> {
        let Some(category) = self.lifecycle.find_by_id(category_id) else {
            return Vec::new();
        };
        let ids = category.read().sub_category_ids().to_vec();
        ids.into_iter()
            .filter_map(|id| self.store().find_by_id(id))
            .collect()
    }

    fn resolve(
        &self,
        category_id: EntityId,
        book_id: EntityId,
    ) -> Option<(Shared<Category>, Shared<Book>)> {
        let category = self.lifecycle.find_by_id(category_id)?;
        let book = self.books.find_by_id(book_id)?;
        Some((category, book))
    }

    /// Returns `true` if `target` is `from` or lies in its subtree.
    fn is_reachable(&self, from: EntityId, target: EntityId) -> bool {
        let mut visited = HashSet::new();
        let mut pending = vec![from];
        while let Some(id) = pending.pop() {
            if id == target {
                return true;
            }
            if !visited.insert(id) {
                continue;
            }
            if let Some(category) = self.store().find_by_id(id) {
                pending.extend_from_slice(category.read().sub_category_ids());
            }
        }
        false
    }

    fn cascade(&self, id: EntityId, visited: &mut HashSet<EntityId>) {
        if !visited.insert(id) {
            return;
        }
        let Some(category) = self.lifecycle.find_by_id(id) else {
            return;
        };

        let children = category.read().sub_category_ids().to_vec();
        for child in children {
            self.cascade(child, visited);
        }

        for book in self.books.list_snapshot() {
            book.write().remove_category(id);
        }
        for other in self.store().list_snapshot() {
            other.write().detach_sub_category(id);
        }

        self.lifecycle.delete_by_id(id);
        tracing::debug!(%id, "cascade deleted category");
    }
}

impl Controller for CategoryController {
    type Record = Shared<Category>;
    type Draft = NewCategory;
    type Patch = CategoryPatch;

    fn create(&self, draft: NewCategory) -> Option<Shared<Category>> {
        Some(self.lifecycle.create(draft))
    }

    fn update(&self, id: EntityId, patch: CategoryPatch) -> bool {
        self.lifecycle.update(id, patch)
    }

    fn find_by_id(&self, id: EntityId) -> Option<Shared<Category>> {
        self.lifecycle.find_by_id(id)
    }

    fn list_all(&self) -> Vec<Shared<Category>> {
        self.lifecycle.list_all()
    }

    /// Deletes the category and its whole subtree.
    fn delete_by_id(&self, id: EntityId) -> bool {
        if !self.store().contains(id) {
            return false;
        }
        let mut visited = HashSet::new();
        self.cascade(id, &mut visited);
        tracing::debug!(%id, removed = visited.len(), "deleted category tree");
        true
    }

    fn save_all(&self) -> bool {
        self.lifecycle.save_all()
    }

    fn load_all(&self) -> usize {
        self.lifecycle.load_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::shared;
    use crate::model::NewBook;
    use bookcase_storage::InMemoryStore;

    struct Fixture {
        categories: CategoryController,
        books: Arc<EntityStore<Book>>,
    }

    impl Fixture {
        fn new(strict: bool) -> Self {
            let books = Arc::new(EntityStore::new());
            let categories = CategoryController::new(
                Arc::new(EntityStore::new()),
                Arc::clone(&books),
                Arc::new(InMemoryStore::new()),
                strict,
            );
            Self { categories, books }
        }

        fn category(&self, name: &str) -> EntityId {
            self.categories
                .create(NewCategory::named(name))
                .unwrap()
                .read()
                .id()
        }

        fn book(&self, id: u32) -> Shared<Book> {
            let book = shared(Book::new(EntityId::new(id), NewBook::named("b")));
            self.books.add(Arc::clone(&book));
            book
        }
    }

    #[test]
    fn add_sub_category_requires_parent() {
        let f = Fixture::new(false);
        assert!(f
            .categories
            .add_sub_category(EntityId::new(9), NewCategory::named("x"))
            .is_none());
        assert!(f.categories.list_all().is_empty());

        let root = f.category("root");
        let child = f
            .categories
            .add_sub_category(root, NewCategory::named("child"))
            .unwrap();
        let listed = f.categories.list_sub_categories(root);
        assert_eq!(listed.len(), 1);
        assert!(Arc::ptr_eq(&listed[0], &child));
    }

    #[test]
    fn self_attachment_is_a_cycle() {
        let f = Fixture::new(false);
        let root = f.category("root");
        let result = f.categories.attach_sub_category(root, root);
        assert!(matches!(result, Err(CoreError::CategoryCycle { .. })));
    }

    #[test]
    fn duplicate_attachment_is_a_no_op() {
        let f = Fixture::new(false);
        let a = f.category("a");
        let b = f.category("b");
        assert!(f.categories.attach_sub_category(a, b).unwrap());
        assert!(!f.categories.attach_sub_category(a, b).unwrap());
        assert_eq!(f.categories.list_sub_categories(a).len(), 1);
    }

    #[test]
    fn ancestor_cycle_only_rejected_in_strict_mode() {
        let lax = Fixture::new(false);
        let a = lax.category("a");
        let b = lax.categories.add_sub_category(a, NewCategory::named("b")).unwrap();
        let b = b.read().id();
        assert!(lax.categories.attach_sub_category(b, a).unwrap());

        let strict = Fixture::new(true);
        let a = strict.category("a");
        let b = strict.categories.add_sub_category(a, NewCategory::named("b")).unwrap();
        let b = b.read().id();
        let c = strict.categories.add_sub_category(b, NewCategory::named("c")).unwrap();
        let c = c.read().id();
        let result = strict.categories.attach_sub_category(c, a);
        assert!(matches!(result, Err(CoreError::CategoryCycle { .. })));
    }

    #[test]
    fn book_links_are_symmetric() {
        let f = Fixture::new(false);
        let cat = f.category("SF");
        let book = f.book(1);

        assert!(f.categories.add_book_to_category(cat, EntityId::new(1)));
        assert!(!f.categories.add_book_to_category(cat, EntityId::new(1)));
        assert_eq!(book.read().category_ids(), &[cat]);
        assert_eq!(f.categories.list_books_in_category(cat).len(), 1);

        assert!(f.categories.remove_book_from_category(cat, EntityId::new(1)));
        assert!(!f.categories.remove_book_from_category(cat, EntityId::new(1)));
        assert!(book.read().category_ids().is_empty());
        assert!(f.categories.list_books_in_category(cat).is_empty());
    }

    #[test]
    fn linking_unknown_book_fails() {
        let f = Fixture::new(false);
        let cat = f.category("SF");
        assert!(!f.categories.add_book_to_category(cat, EntityId::new(42)));
        assert!(!f.categories.add_book_to_category(EntityId::new(42), EntityId::new(42)));
    }

    #[test]
    fn delete_cascades_postorder() {
        let f = Fixture::new(false);
        let root = f.category("root");
        let left = f.categories.add_sub_category(root, NewCategory::named("l")).unwrap();
        let right = f.categories.add_sub_category(root, NewCategory::named("r")).unwrap();
        let (left, right) = (left.read().id(), right.read().id());

        let b1 = f.book(1);
        let b2 = f.book(2);
        f.categories.add_book_to_category(left, EntityId::new(1));
        f.categories.add_book_to_category(right, EntityId::new(2));

        assert!(f.categories.delete_by_id(root));
        assert!(f.categories.list_all().is_empty());
        assert!(b1.read().category_ids().is_empty());
        assert!(b2.read().category_ids().is_empty());
        assert_eq!(f.books.len(), 2);
    }

    #[test]
    fn delete_detaches_from_other_parents() {
        let f = Fixture::new(false);
        let a = f.category("a");
        let b = f.category("b");
        let shared_child = f.categories.add_sub_category(a, NewCategory::named("c")).unwrap();
        let c = shared_child.read().id();
        f.categories.attach_sub_category(b, c).unwrap();

        assert!(f.categories.delete_by_id(c));
        assert!(f.categories.list_sub_categories(a).is_empty());
        assert!(f.categories.find_by_id(b).unwrap().read().sub_category_ids().is_empty());
    }

    #[test]
    fn delete_terminates_on_cycles() {
        let f = Fixture::new(false);
        let a = f.category("a");
        let b = f.categories.add_sub_category(a, NewCategory::named("b")).unwrap();
        let b = b.read().id();
        f.categories.attach_sub_category(b, a).unwrap();

        assert!(f.categories.delete_by_id(a));
        assert!(f.categories.list_all().is_empty());
    }

    #[test]
    fn remove_sub_category_deletes_the_child() {
        let f = Fixture::new(false);
        let root = f.category("root");
        let child = f.categories.add_sub_category(root, NewCategory::named("c")).unwrap();
        let child = child.read().id();
        let grandchild = f.categories.add_sub_category(child, NewCategory::named("g")).unwrap();
        let grandchild = grandchild.read().id();

        assert!(!f.categories.remove_sub_category(root, grandchild));
        assert!(f.categories.remove_sub_category(root, child));
        assert!(f.categories.find_by_id(child).is_none());
        assert!(f.categories.find_by_id(grandchild).is_none());
        assert_eq!(f.categories.list_all().len(), 1);
    }

    #[test]
    fn delete_unknown_category() {
        let f = Fixture::new(false);
        assert!(!f.categories.delete_by_id(EntityId::new(3)));
    }
}
