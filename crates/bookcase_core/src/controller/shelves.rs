//! Shelves of the current user.

use crate::context::{UserContext, UserObserver};
use crate::controller::Controller;
use crate::entity::{EntityId, EntityStore, Identified, Shared};
use crate::model::{Book, NewShelf, Shelf, ShelfPatch, User};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Manages the shelves of whichever user is logged in.
///
/// There is no shelf store: every operation works on the bound user's own
/// shelf list, so a login or logout redirects all later calls at once.
/// Without a bound user every operation fails closed. Shelf IDs are only
/// unique within one user.
pub struct ShelfController {
    books: Arc<EntityStore<Book>>,
    current: RwLock<Option<Shared<User>>>,
}

impl ShelfController {
    /// Creates a controller and registers it with `context`.
    pub fn new(books: Arc<EntityStore<Book>>, context: &UserContext) -> Arc<Self> {
        let controller = Arc::new(Self {
            books,
            current: RwLock::new(context.current_user()),
        });
        let observer: Arc<dyn UserObserver> = controller.clone();
        context.register_observer(observer);
        controller
    }

    /// Puts a book on a shelf. The book must exist.
    ///
    /// Returns `false` if the shelf or book is unknown or the book is
    /// already there.
    pub fn add_book_to_shelf(&self, shelf_id: EntityId, book_id: EntityId) -> bool {
        let Some(user) = self.bound_user("add book") else {
            return false;
        };
        if !self.books.contains(book_id) {
            return false;
        }
        let added = user
            .write()
            .shelf_mut(shelf_id)
            .is_some_and(|shelf| shelf.add_book(book_id));
        added
    }

    /// Takes a book off a shelf.
    pub fn remove_book_by_id(&self, shelf_id: EntityId, book_id: EntityId) -> bool {
        let Some(user) = self.bound_user("remove book") else {
            return false;
        };
        let removed = user
            .write()
            .shelf_mut(shelf_id)
            .is_some_and(|shelf| shelf.remove_book(book_id));
        removed
    }

    /// Returns the books on a shelf. Books deleted since are skipped.
    #[must_use]
    pub fn books(&self, shelf_id: EntityId) -> Vec<Shared<Book>> {
        let Some(shelf) = self.find_by_id(shelf_id) else {
            return Vec::new();
        };
        shelf
            .book_ids()
            .iter()
            .filter_map(|id| self.books.find_by_id(*id))
            .collect()
    }

    fn bound_user(&self, operation: &str) -> Option<Shared<User>> {
        let user = self.current.read().clone();
        if user.is_none() {
            tracing::warn!(operation, "shelf operation refused: no user is logged in");
        }
        user
    }
}

impl Controller for ShelfController {
    type Record = Shelf;
    type Draft = NewShelf;
    type Patch = ShelfPatch;

    fn create(&self, draft: NewShelf) -> Option<Shelf> {
        let user = self.bound_user("create")?;
        let mut user = user.write();
        let shelf = Shelf::new(user.next_shelf_id(), draft);
        user.add_shelf(shelf.clone());
        tracing::debug!(user = %user.id(), shelf = %shelf.id(), "shelf created");
        Some(shelf)
    }

    fn update(&self, id: EntityId, patch: ShelfPatch) -> bool {
        let Some(user) = self.bound_user("update") else {
            return false;
        };
        let mut user = user.write();
        match user.shelf_mut(id) {
            Some(shelf) => {
                shelf.apply(patch);
                true
            }
            None => false,
        }
    }

    fn find_by_id(&self, id: EntityId) -> Option<Shelf> {
        self.bound_user("find")?
            .read()
            .shelves()
            .iter()
            .find(|s| s.id() == id)
            .cloned()
    }

    fn list_all(&self) -> Vec<Shelf> {
        self.bound_user("list")
            .map(|u| u.read().shelves().to_vec())
            .unwrap_or_default()
    }

    fn delete_by_id(&self, id: EntityId) -> bool {
        let Some(user) = self.bound_user("delete") else {
            return false;
        };
        let removed = user.write().remove_shelf(id).is_some();
        removed
    }

    /// Shelves are saved with their owner.
    fn save_all(&self) -> bool {
        true
    }

    /// Shelves are loaded with their owner. Returns the bound user's shelf
    /// count.
    fn load_all(&self) -> usize {
        self.current
            .read()
            .as_ref()
            .map_or(0, |u| u.read().shelves().len())
    }
}

impl UserObserver for ShelfController {
    fn on_user_changed(&self, user: Option<&Shared<User>>) {
        *self.current.write() = user.cloned();
    }
}

impl fmt::Debug for ShelfController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let user = self.current.read().as_ref().map(|u| u.read().id());
        f.debug_struct("ShelfController")
            .field("user", &user)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::shared;
    use crate::model::NewBook;

    struct Fixture {
        context: UserContext,
        books: Arc<EntityStore<Book>>,
        shelves: Arc<ShelfController>,
    }

    impl Fixture {
        fn new() -> Self {
            let context = UserContext::new();
            let books = Arc::new(EntityStore::new());
            let shelves = ShelfController::new(Arc::clone(&books), &context);
            Self {
                context,
                books,
                shelves,
            }
        }

        fn user(&self, id: u32, name: &str) -> Shared<User> {
            shared(User::new(EntityId::new(id), Some(name), None))
        }

        fn book(&self, id: u32) -> EntityId {
            let id = EntityId::new(id);
            self.books.add(shared(Book::new(id, NewBook::named("b"))));
            id
        }
    }

    #[test]
    fn fails_closed_without_user() {
        let f = Fixture::new();
        assert!(f.shelves.create(NewShelf::named("s")).is_none());
        assert!(f.shelves.list_all().is_empty());
        assert!(!f.shelves.update(EntityId::new(1), ShelfPatch::rename("x")));
        assert!(!f.shelves.delete_by_id(EntityId::new(1)));
        assert!(!f.shelves.add_book_to_shelf(EntityId::new(1), EntityId::new(1)));
    }

    #[test]
    fn shelves_follow_the_current_user() {
        let f = Fixture::new();
        let ana = f.user(1, "ana");
        let bia = f.user(2, "bia");

        f.context.set_user(Some(Arc::clone(&ana)));
        let shelf = f.shelves.create(NewShelf::named("to read")).unwrap();
        assert_eq!(shelf.id(), EntityId::new(1));

        f.context.set_user(Some(Arc::clone(&bia)));
        assert!(f.shelves.list_all().is_empty());
        assert_eq!(ana.read().shelves().len(), 1);

        f.context.set_user(Some(ana));
        assert_eq!(f.shelves.list_all(), vec![shelf]);
    }

    #[test]
    fn shelf_ids_are_per_user() {
        let f = Fixture::new();
        f.context.set_user(Some(f.user(1, "ana")));
        f.shelves.create(NewShelf::named("a"));
        let second = f.shelves.create(NewShelf::named("b")).unwrap();
        assert_eq!(second.id(), EntityId::new(2));

        f.context.set_user(Some(f.user(2, "bia")));
        let first = f.shelves.create(NewShelf::named("c")).unwrap();
        assert_eq!(first.id(), EntityId::new(1));
    }

    #[test]
    fn books_must_exist() {
        let f = Fixture::new();
        f.context.set_user(Some(f.user(1, "ana")));
        let shelf = f.shelves.create(NewShelf::named("s")).unwrap().id();
        let book = f.book(5);

        assert!(!f.shelves.add_book_to_shelf(shelf, EntityId::new(6)));
        assert!(f.shelves.add_book_to_shelf(shelf, book));
        assert!(!f.shelves.add_book_to_shelf(shelf, book));
        assert_eq!(f.shelves.books(shelf).len(), 1);

        assert!(f.shelves.remove_book_by_id(shelf, book));
        assert!(f.shelves.books(shelf).is_empty());
    }

    #[test]
    fn deleted_books_are_skipped() {
        let f = Fixture::new();
        f.context.set_user(Some(f.user(1, "ana")));
        let shelf = f.shelves.create(NewShelf::named("s")).unwrap().id();
        let book = f.book(5);
        f.shelves.add_book_to_shelf(shelf, book);

        let handle = f.books.find_by_id(book).unwrap();
        f.books.remove(&handle);
        assert!(f.shelves.books(shelf).is_empty());
        assert_eq!(f.shelves.find_by_id(shelf).unwrap().book_ids(), &[book]);
    }

    #[test]
    fn rename_and_delete() {
        let f = Fixture::new();
        f.context.set_user(Some(f.user(1, "ana")));
        let shelf = f.shelves.create(NewShelf::named("s")).unwrap().id();

        assert!(f.shelves.update(shelf, ShelfPatch::rename("favourites")));
        assert_eq!(f.shelves.find_by_id(shelf).unwrap().name(), "favourites");
        assert!(f.shelves.delete_by_id(shelf));
        assert!(f.shelves.find_by_id(shelf).is_none());
    }
}
