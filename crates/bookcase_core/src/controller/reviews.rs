//! Reviews and their authorship rules.
//!
//! Reviews live inside their book and are persisted with the book
//! collection. Every change requires a logged-in user, and only a review's
//! author may update or delete it.
//!
//! While the author exists they are matched by user ID, so a rename keeps
//! ownership and a later namesake gains none. Reviews of a deleted author
//! fall back to the recorded username. Refusals leave state unchanged, are
//! logged at `warn`, and surface as [`CoreError::NotAuthenticated`] or
//! [`CoreError::NotAuthor`].

use crate::context::{UserContext, UserObserver};
use crate::controller::{BookController, Controller};
use crate::entity::{EntityId, EntityStore, IdSequencer, Identified, Shared};
use crate::error::{CoreError, CoreResult};
use crate::model::{AuthorRef, Review, ReviewPatch, User};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Manages reviews across all books.
pub struct ReviewController {
    books: Arc<BookController>,
    users: Arc<EntityStore<User>>,
    sequencer: IdSequencer,
    current: RwLock<Option<Shared<User>>>,
    autosave: bool,
}

impl ReviewController {
    /// Creates a controller and registers it with `context`.
    ///
    /// Authors are resolved through `users`. With `autosave`, every
    /// successful change saves the book collection.
    pub fn new(
        books: Arc<BookController>,
        users: Arc<EntityStore<User>>,
        context: &UserContext,
        autosave: bool,
    ) -> Arc<Self> {
        let controller = Arc::new(Self {
            books,
            users,
            sequencer: IdSequencer::new(),
            current: RwLock::new(context.current_user()),
            autosave,
        });
        let observer: Arc<dyn UserObserver> = controller.clone();
        context.register_observer(observer);
        controller
    }

    /// Returns the ID the next review will get.
    #[must_use]
    pub fn next_id(&self) -> EntityId {
        self.sequencer.peek()
    }

    /// Writes a review of `book_id` as the current user.
    ///
    /// Returns `Ok(None)` if the book is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotAuthenticated`] if nobody is logged in.
    pub fn create(
        &self,
        book_id: EntityId,
        comment: &str,
        score: Option<f64>,
    ) -> CoreResult<Option<Review>> {
        let user = self.acting_user("create")?;
        let Some(book) = self.books.find_by_id(book_id) else {
            return Ok(None);
        };

        let author = AuthorRef::from(&*user.read());
        let review = Review::builder()
            .comment(comment)
            .score(score)
            .author(author)
            .build(&self.sequencer)?;
        book.write().add_review(review.clone());

        tracing::debug!(book = %book_id, review = %review.id(), "review created");
        self.persist();
        Ok(Some(review))
    }

    /// Updates a review written by the current user.
    ///
    /// Returns `Ok(false)` if the book or review is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotAuthenticated`] if nobody is logged in and
    /// [`CoreError::NotAuthor`] if the review belongs to someone else.
    pub fn update(
        &self,
        book_id: EntityId,
        review_id: EntityId,
        patch: ReviewPatch,
    ) -> CoreResult<bool> {
        let user = self.acting_user("update")?;
        let Some(book) = self.books.find_by_id(book_id) else {
            return Ok(false);
        };

        {
            let mut book = book.write();
            let Some(review) = book.review_mut(review_id) else {
                return Ok(false);
            };
            self.check_author(review, &user)?;
            review.apply(patch);
        }

        tracing::debug!(book = %book_id, review = %review_id, "review updated");
        self.persist();
        Ok(true)
    }

    /// Deletes a review written by the current user.
    ///
    /// Returns `Ok(false)` if the book or review is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotAuthenticated`] if nobody is logged in and
    /// [`CoreError::NotAuthor`] if the review belongs to someone else.
    pub fn delete_by_id(&self, book_id: EntityId, review_id: EntityId) -> CoreResult<bool> {
        let user = self.acting_user("delete")?;
        let Some(book) = self.books.find_by_id(book_id) else {
            return Ok(false);
        };

        {
            let mut book = book.write();
            let Some(review) = book.review(review_id) else {
                return Ok(false);
            };
            self.check_author(review, &user)?;
            book.remove_review(review_id);
        }

        tracing::debug!(book = %book_id, review = %review_id, "review deleted");
        self.persist();
        Ok(true)
    }

    /// Returns a copy of one review.
    #[must_use]
    pub fn find(&self, book_id: EntityId, review_id: EntityId) -> Option<Review> {
        self.books
            .find_by_id(book_id)
            .and_then(|b| b.read().review(review_id).cloned())
    }

    /// Returns copies of a book's reviews in insertion order.
    #[must_use]
    pub fn list_for_book(&self, book_id: EntityId) -> Vec<Review> {
        self.books
            .find_by_id(book_id)
            .map(|b| b.read().reviews().to_vec())
            .unwrap_or_default()
    }

    /// Returns `true` if the current user wrote `review`.
    #[must_use]
    pub fn is_own_review(&self, review: &Review) -> bool {
        self.current
            .read()
            .as_ref()
            .is_some_and(|u| self.is_author(review, &u.read()))
    }

    /// Returns the mean score of a book's reviews, or `None` if the book is
    /// unknown.
    #[must_use]
    pub fn score(&self, book_id: EntityId) -> Option<f64> {
        self.books.score(book_id)
    }

    /// Resets the sequencer past every review ID in the book store.
    pub fn recover_ids(&self) -> EntityId {
        let ids: Vec<EntityId> = self
            .books
            .store()
            .list_snapshot()
            .iter()
            .flat_map(|b| {
                b.read()
                    .reviews()
                    .iter()
                    .map(Identified::id)
                    .collect::<Vec<_>>()
            })
            .collect();
        self.sequencer.reset_after(ids)
    }

    /// Saves the book collection, which holds every review.
    pub fn save_all(&self) -> bool {
        self.recover_ids();
        self.books.save_all()
    }

    /// Recovers the review sequencer after the books were loaded.
    ///
    /// Returns the number of reviews found.
    pub fn load_all(&self) -> usize {
        let next = self.recover_ids();
        let count = self
            .books
            .store()
            .list_snapshot()
            .iter()
            .map(|b| b.read().reviews().len())
            .sum();
        tracing::info!(count, next_id = %next, "recovered reviews");
        count
    }

    fn acting_user(&self, operation: &str) -> CoreResult<Shared<User>> {
        self.current.read().clone().ok_or_else(|| {
            tracing::warn!(operation, "review change refused: no user is logged in");
            CoreError::NotAuthenticated
        })
    }

    fn is_author(&self, review: &Review, user: &User) -> bool {
        if self.users.contains(review.author().user_id) {
            review.is_written_by(user)
        } else {
            review.is_claimed_by(user)
        }
    }

    fn check_author(&self, review: &Review, user: &Shared<User>) -> CoreResult<()> {
        let user = user.read();
        if self.is_author(review, &user) {
            return Ok(());
        }
        tracing::warn!(
            review = %review.id(),
            user = %user.username(),
            author = %review.author().username,
            "review change refused: not the author"
        );
        Err(CoreError::NotAuthor {
            review_id: review.id(),
        })
    }

    fn persist(&self) {
        if self.autosave {
            self.books.save_all();
        }
    }
}

impl UserObserver for ReviewController {
    fn on_user_changed(&self, user: Option<&Shared<User>>) {
        *self.current.write() = user.cloned();
    }
}

impl fmt::Debug for ReviewController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReviewController")
            .field("next_id", &self.sequencer.peek())
            .field("autosave", &self.autosave)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Entity;
    use crate::entity::{shared, EntityStore};
    use crate::model::{Book, NewBook, UserPatch};
    use bookcase_storage::{InMemoryStore, ResourceStore};

    struct Fixture {
        context: UserContext,
        books: Arc<BookController>,
        users: Arc<EntityStore<User>>,
        reviews: Arc<ReviewController>,
        resources: Arc<InMemoryStore>,
        book: EntityId,
    }

    impl Fixture {
        fn new(autosave: bool) -> Self {
            let context = UserContext::new();
            let resources = Arc::new(InMemoryStore::new());
            let users = Arc::new(EntityStore::new());
            let books = Arc::new(BookController::new(
                Arc::new(EntityStore::new()),
                Arc::new(EntityStore::new()),
                Arc::clone(&users),
                resources.clone(),
            ));
            let book = books.create(NewBook::named("Dune")).unwrap().read().id();
            let reviews =
                ReviewController::new(Arc::clone(&books), Arc::clone(&users), &context, autosave);
            Self {
                context,
                books,
                users,
                reviews,
                resources,
                book,
            }
        }

        /// Binds the stored user with `id`, registering it first if needed.
        fn login(&self, id: u32, name: &str) -> Shared<User> {
            let id = EntityId::new(id);
            let user = self.users.find_by_id(id).unwrap_or_else(|| {
                let user = shared(User::new(id, Some(name), Some("pw")));
                self.users.add(Arc::clone(&user));
                user
            });
            self.context.set_user(Some(Arc::clone(&user)));
            user
        }
    }

    #[test]
    fn create_requires_a_user() {
        let f = Fixture::new(false);
        let result = f.reviews.create(f.book, "great", Some(5.0));
        assert!(matches!(result, Err(CoreError::NotAuthenticated)));
        assert!(f.reviews.list_for_book(f.book).is_empty());
    }

    #[test]
    fn create_records_the_author() {
        let f = Fixture::new(false);
        f.login(1, "ana");
        let review = f.reviews.create(f.book, " great ", Some(4.0)).unwrap().unwrap();

        assert_eq!(review.comment(), "great");
        assert_eq!(review.author().username, "ana");
        assert!(f.reviews.is_own_review(&review));
        assert_eq!(f.reviews.find(f.book, review.id()), Some(review));
    }

    #[test]
    fn create_on_missing_book() {
        let f = Fixture::new(false);
        f.login(1, "ana");
        assert!(f.reviews.create(EntityId::new(99), "x", None).unwrap().is_none());
        assert_eq!(f.reviews.next_id(), EntityId::new(1));
    }

    #[test]
    fn score_is_mean_and_tracks_changes() {
        let f = Fixture::new(false);
        f.login(1, "ana");
        let first = f.reviews.create(f.book, "", Some(4.0)).unwrap().unwrap();
        f.reviews.create(f.book, "", Some(2.0)).unwrap();
        assert_eq!(f.reviews.score(f.book), Some(3.0));

        f.reviews
            .update(f.book, first.id(), ReviewPatch::new().score(5.0))
            .unwrap();
        assert_eq!(f.reviews.score(f.book), Some(3.5));
    }

    #[test]
    fn non_author_cannot_delete() {
        let f = Fixture::new(false);
        f.login(1, "ana");
        let review = f.reviews.create(f.book, "mine", Some(3.0)).unwrap().unwrap();

        f.login(2, "bia");
        let result = f.reviews.delete_by_id(f.book, review.id());
        assert!(matches!(result, Err(CoreError::NotAuthor { .. })));
        assert!(!f.reviews.is_own_review(&review));
        assert_eq!(f.reviews.find(f.book, review.id()), Some(review));
    }

    #[test]
    fn non_author_cannot_update() {
        let f = Fixture::new(false);
        f.login(1, "ana");
        let review = f.reviews.create(f.book, "mine", Some(3.0)).unwrap().unwrap();

        f.login(2, "bia");
        let result = f
            .reviews
            .update(f.book, review.id(), ReviewPatch::new().comment("hijacked"));
        assert!(result.unwrap_err().is_refusal());
        assert_eq!(f.reviews.find(f.book, review.id()).unwrap().comment(), "mine");
    }

    #[test]
    fn author_can_delete() {
        let f = Fixture::new(false);
        f.login(1, "ana");
        let review = f.reviews.create(f.book, "", None).unwrap().unwrap();
        assert!(f.reviews.delete_by_id(f.book, review.id()).unwrap());
        assert!(!f.reviews.delete_by_id(f.book, review.id()).unwrap());
    }

    #[test]
    fn logout_revokes_rights() {
        let f = Fixture::new(false);
        f.login(1, "ana");
        let review = f.reviews.create(f.book, "", None).unwrap().unwrap();
        f.context.set_user(None);
        let result = f.reviews.delete_by_id(f.book, review.id());
        assert!(matches!(result, Err(CoreError::NotAuthenticated)));
    }

    #[test]
    fn autosave_writes_books() {
        let f = Fixture::new(true);
        f.login(1, "ana");
        assert!(!f.resources.exists(Book::RESOURCE).unwrap());
        f.reviews.create(f.book, "saved", Some(5.0)).unwrap();
        assert!(f.resources.exists(Book::RESOURCE).unwrap());
    }

    #[test]
    fn recover_ids_continues_after_loaded_reviews() {
        let f = Fixture::new(false);
        f.login(1, "ana");
        for _ in 0..3 {
            f.reviews.create(f.book, "", None).unwrap();
        }
        assert!(f.reviews.save_all());

        let books = Arc::new(BookController::new(
            Arc::new(EntityStore::new()),
            Arc::new(EntityStore::new()),
            Arc::clone(&f.users),
            f.resources.clone(),
        ));
        books.load_all();
        let reviews =
            ReviewController::new(Arc::clone(&books), Arc::clone(&f.users), &f.context, false);
        assert_eq!(reviews.load_all(), 3);
        assert_eq!(reviews.next_id(), EntityId::new(4));
        assert!(f.books.find_by_id(f.book).is_some());
    }

    #[test]
    fn renamed_author_keeps_ownership_and_namesake_gains_none() {
        let f = Fixture::new(false);
        let ana = f.login(1, "ana");
        let review = f.reviews.create(f.book, "mine", Some(3.0)).unwrap().unwrap();

        ana.write().apply(UserPatch::new().username("anabel"));
        assert!(f.reviews.is_own_review(&review));
        assert!(f
            .reviews
            .update(f.book, review.id(), ReviewPatch::new().comment("still mine"))
            .unwrap());

        f.login(2, "ana");
        assert!(!f.reviews.is_own_review(&review));
        let result = f.reviews.delete_by_id(f.book, review.id());
        assert!(matches!(result, Err(CoreError::NotAuthor { .. })));
        assert_eq!(f.reviews.list_for_book(f.book).len(), 1);
    }

    #[test]
    fn deleted_author_falls_back_to_recorded_username() {
        let f = Fixture::new(false);
        let ana = f.login(1, "ana");
        let review = f.reviews.create(f.book, "orphan", None).unwrap().unwrap();
        f.users.remove(&ana);

        f.login(2, "bia");
        assert!(f.reviews.delete_by_id(f.book, review.id()).is_err());

        f.login(3, "ana");
        assert!(f.reviews.delete_by_id(f.book, review.id()).unwrap());
    }
}
