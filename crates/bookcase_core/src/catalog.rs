//! The catalog facade.
//!
//! A [`Catalog`] owns the entity stores, the [`UserContext`] and one
//! controller per entity kind, all wired to the same resource store.

use crate::config::Config;
use crate::context::UserContext;
use crate::controller::{
    BookController, CategoryController, Controller, ReviewController, ShelfController,
    UserController,
};
use crate::entity::{EntityStore, Shared};
use crate::error::{CoreError, CoreResult};
use crate::integrity::{self, IntegrityReport, LoadDiscards};
use crate::model::{NewUser, User};
use crate::stats::{CatalogStats, ScoreAccumulator};
use bookcase_storage::{DirectoryStore, InMemoryStore, ResourceStore};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// A catalog of users, books, reviews, categories and shelves.
///
/// # Example
///
/// ```rust
/// use bookcase_core::{Catalog, Controller, Identified, NewBook, NewUser};
///
/// let catalog = Catalog::open_in_memory();
/// catalog.register(NewUser::new("ana", "secret")).unwrap();
/// catalog.login("ana", "secret").unwrap();
///
/// let book = catalog.books().create(NewBook::named("Dune")).unwrap();
/// let id = book.read().id();
/// catalog.reviews().create(id, "Great", Some(5.0)).unwrap();
/// assert_eq!(catalog.books().score(id), Some(5.0));
/// ```
pub struct Catalog {
    config: Config,
    resources: Arc<dyn ResourceStore>,
    context: Arc<UserContext>,
    users: UserController,
    books: Arc<BookController>,
    reviews: Arc<ReviewController>,
    categories: CategoryController,
    shelves: Arc<ShelfController>,
}

impl Catalog {
    /// Opens a catalog stored under `path` with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn open(path: &Path) -> CoreResult<Self> {
        Self::open_with_config(path, Config::default())
    }

    /// Opens a catalog stored under `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DataDirectoryMissing`] if the directory does not
    /// exist and `create_if_missing` is off, or a storage error if it cannot
    /// be created.
    pub fn open_with_config(path: &Path, config: Config) -> CoreResult<Self> {
        let store = if config.create_if_missing {
            DirectoryStore::open_with_create_dirs(path)?
        } else {
            if !path.is_dir() {
                return Err(CoreError::DataDirectoryMissing {
                    path: path.to_path_buf(),
                });
            }
            DirectoryStore::open(path)?
        };
        tracing::info!(path = %path.display(), "opening catalog");
        Ok(Self::with_store(Arc::new(store), config))
    }

    /// Opens an empty catalog that lives only in memory.
    #[must_use]
    pub fn open_in_memory() -> Self {
        Self::with_store(Arc::new(InMemoryStore::new()), Config::default())
    }

    /// Builds a catalog over an arbitrary resource store.
    ///
    /// Every collection is loaded first when `load_on_open` is set.
    pub fn with_store(resources: Arc<dyn ResourceStore>, config: Config) -> Self {
        let context = Arc::new(UserContext::new());
        let user_store = Arc::new(EntityStore::new());
        let book_store = Arc::new(EntityStore::new());
        let category_store = Arc::new(EntityStore::new());

        let users = UserController::new(
            Arc::clone(&user_store),
            Arc::clone(&resources),
            Arc::clone(&context),
        );
        let books = Arc::new(BookController::new(
            Arc::clone(&book_store),
            Arc::clone(&category_store),
            Arc::clone(&user_store),
            Arc::clone(&resources),
        ));
        let reviews = ReviewController::new(
            Arc::clone(&books),
            user_store,
            &context,
            config.autosave_reviews,
        );
        let categories = CategoryController::new(
            category_store,
            Arc::clone(&book_store),
            Arc::clone(&resources),
            config.strict_category_tree,
        );
        let shelves = ShelfController::new(book_store, &context);

        let catalog = Self {
            config,
            resources,
            context,
            users,
            books,
            reviews,
            categories,
            shelves,
        };
        if catalog.config.load_on_open {
            catalog.load_all();
        }
        catalog
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the resource store collections are saved to.
    #[must_use]
    pub fn resources(&self) -> &Arc<dyn ResourceStore> {
        &self.resources
    }

    /// Returns the user context.
    #[must_use]
    pub fn context(&self) -> &Arc<UserContext> {
        &self.context
    }

    /// Returns the user controller.
    #[must_use]
    pub fn users(&self) -> &UserController {
        &self.users
    }

    /// Returns the book controller.
    #[must_use]
    pub fn books(&self) -> &BookController {
        &self.books
    }

    /// Returns the review controller.
    #[must_use]
    pub fn reviews(&self) -> &ReviewController {
        &self.reviews
    }

    /// Returns the category controller.
    #[must_use]
    pub fn categories(&self) -> &CategoryController {
        &self.categories
    }

    /// Returns the shelf controller.
    #[must_use]
    pub fn shelves(&self) -> &ShelfController {
        &self.shelves
    }

    /// Registers a user. Returns `None` if the username is taken.
    pub fn register(&self, draft: NewUser) -> Option<Shared<User>> {
        self.users.register(draft)
    }

    /// Logs in. Returns `None` and keeps the current user on failure.
    pub fn login(&self, username: &str, password: &str) -> Option<Shared<User>> {
        self.users.login(username, password)
    }

    /// Logs out the current user.
    pub fn logout(&self) {
        self.users.logout();
    }

    /// Returns the logged-in user.
    #[must_use]
    pub fn current_user(&self) -> Option<Shared<User>> {
        self.context.current_user()
    }

    /// Saves every collection. Returns `false` if any write failed.
    ///
    /// Every collection is attempted even after a failure. Reviews and
    /// shelves are written with their books and users, so each resource is
    /// written once.
    pub fn save_all(&self) -> bool {
        self.reviews.recover_ids();
        let results = [
            self.users.save_all(),
            self.books.save_all(),
            self.categories.save_all(),
            self.shelves.save_all(),
        ];
        let ok = results.iter().all(|saved| *saved);
        if ok {
            tracing::info!("catalog saved");
        } else {
            tracing::error!("catalog saved with failures");
        }
        ok
    }

    /// Reloads every collection and re-binds the current user.
    ///
    /// Returns the number of users, books and categories loaded.
    pub fn load_all(&self) -> usize {
        let users = self.users.load_all();
        let books = self.books.load_all();
        let reviews = self.reviews.load_all();
        let categories = self.categories.load_all();
        self.users.rebind_current();
        tracing::info!(users, books, reviews, categories, "catalog loaded");
        users + books + categories
    }

    /// Takes a snapshot of entity counts and sequencer positions.
    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        let shelves = self
            .users
            .store()
            .list_snapshot()
            .iter()
            .map(|u| u.read().shelves().len())
            .sum();

        let mut scores = ScoreAccumulator::default();
        let mut reviews = 0;
        for book in self.books.store().list_snapshot() {
            for review in book.read().reviews() {
                scores.add(review.score());
                reviews += 1;
            }
        }

        CatalogStats {
            users: self.users.store().len(),
            shelves,
            books: self.books.store().len(),
            reviews,
            categories: self.categories.store().len(),
            next_user_id: self.users.next_id(),
            next_book_id: self.books.next_id(),
            next_review_id: self.reviews.next_id(),
            next_category_id: self.categories.next_id(),
            average_score: scores.mean(),
        }
    }

    /// Checks the catalog's cross-entity invariants.
    #[must_use]
    pub fn verify(&self) -> IntegrityReport {
        let discards = LoadDiscards {
            users: self.users.discarded_on_load(),
            books: self.books.discarded_on_load(),
            categories: self.categories.discarded_on_load(),
        };
        let report = integrity::check(
            self.users.store(),
            self.books.store(),
            self.categories.store(),
            discards,
        );
        if !report.is_ok() {
            tracing::warn!(errors = report.errors.len(), "catalog failed verification");
        }
        report
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("config", &self.config)
            .field("context", &self.context)
            .field("users", &self.users.store().len())
            .field("books", &self.books.store().len())
            .field("categories", &self.categories.store().len())
            .finish_non_exhaustive()
    }
}
