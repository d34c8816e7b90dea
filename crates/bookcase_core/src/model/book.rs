//! Books, their reviews and their category back-references.

use crate::entity::{EntityId, Identified};
use crate::model::{count, non_blank, non_negative, Review};
use serde::{Deserialize, Serialize};

/// Name used when none (or a blank one) is given.
pub const DEFAULT_BOOK_NAME: &str = "Untitled";

/// Author used when none (or a blank one) is given.
pub const DEFAULT_AUTHOR: &str = "Unknown author";

/// Publisher used when none (or a blank one) is given.
pub const DEFAULT_PUBLISHER: &str = "Unknown publisher";

/// A catalogued book.
///
/// A book owns its reviews. The category list is a back-reference kept
/// symmetric with each category's book list by the category controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    id: EntityId,
    name: String,
    price: f64,
    author: String,
    publisher: String,
    pages: u32,
    #[serde(default)]
    reviews: Vec<Review>,
    #[serde(default)]
    categories: Vec<EntityId>,
}

impl Book {
    /// Creates a book from a draft, normalizing every field.
    #[must_use]
    pub fn new(id: EntityId, draft: NewBook) -> Self {
        Self {
            id,
            name: non_blank(draft.name.as_deref(), DEFAULT_BOOK_NAME),
            price: non_negative(draft.price),
            author: non_blank(draft.author.as_deref(), DEFAULT_AUTHOR),
            publisher: non_blank(draft.publisher.as_deref(), DEFAULT_PUBLISHER),
            pages: count(draft.pages),
            reviews: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// Returns the book name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the price, never negative.
    #[must_use]
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Returns the author.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the publisher.
    #[must_use]
    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    /// Returns the page count.
    #[must_use]
    pub fn pages(&self) -> u32 {
        self.pages
    }

    /// Sets the name; blank input falls back to [`DEFAULT_BOOK_NAME`].
    pub fn set_name(&mut self, name: &str) {
        self.name = non_blank(Some(name), DEFAULT_BOOK_NAME);
    }

    /// Sets the price; negative input becomes zero.
    pub fn set_price(&mut self, price: f64) {
        self.price = non_negative(Some(price));
    }

    /// Sets the author; blank input falls back to [`DEFAULT_AUTHOR`].
    pub fn set_author(&mut self, author: &str) {
        self.author = non_blank(Some(author), DEFAULT_AUTHOR);
    }

    /// Sets the publisher; blank input falls back to [`DEFAULT_PUBLISHER`].
    pub fn set_publisher(&mut self, publisher: &str) {
        self.publisher = non_blank(Some(publisher), DEFAULT_PUBLISHER);
    }

    /// Sets the page count; negative input becomes zero.
    pub fn set_pages(&mut self, pages: i64) {
        self.pages = count(Some(pages));
    }

    /// Returns the reviews in insertion order.
    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// Returns the review with `id`.
    #[must_use]
    pub fn review(&self, id: EntityId) -> Option<&Review> {
        self.reviews.iter().find(|r| r.id() == id)
    }

    /// Returns a mutable reference to the review with `id`.
    pub fn review_mut(&mut self, id: EntityId) -> Option<&mut Review> {
        self.reviews.iter_mut().find(|r| r.id() == id)
    }

    /// Attaches a review unless one with the same ID is present.
    pub fn add_review(&mut self, review: Review) -> bool {
        if self.review(review.id()).is_some() {
            return false;
        }
        self.reviews.push(review);
        true
    }

    /// Detaches the review with `id`.
    pub fn remove_review(&mut self, id: EntityId) -> Option<Review> {
        let index = self.reviews.iter().position(|r| r.id() == id)?;
        Some(self.reviews.remove(index))
    }

    /// Drops every review, returning how many there were.
    pub fn clear_reviews(&mut self) -> usize {
        let count = self.reviews.len();
        self.reviews.clear();
        count
    }

    /// Returns the mean review score, or 0 without reviews.
    ///
    /// Computed on every call from the current reviews.
    #[must_use]
    pub fn score(&self) -> f64 {
        if self.reviews.is_empty() {
            return 0.0;
        }
        let total: f64 = self.reviews.iter().map(Review::score).sum();
        total / self.reviews.len() as f64
    }

    /// Returns the score with one decimal, or `"(?)"` without reviews.
    #[must_use]
    pub fn score_display(&self) -> String {
        if self.reviews.is_empty() {
            return "(?)".to_string();
        }
        format!("{:.1}", self.score())
    }

    /// Returns the IDs of the categories this book belongs to.
    #[must_use]
    pub fn category_ids(&self) -> &[EntityId] {
        &self.categories
    }

    /// Records membership in a category; `false` if already recorded.
    pub(crate) fn add_category(&mut self, category: EntityId) -> bool {
        if self.categories.contains(&category) {
            return false;
        }
        self.categories.push(category);
        true
    }

    /// Forgets membership in a category; `false` if not recorded.
    pub(crate) fn remove_category(&mut self, category: EntityId) -> bool {
        let before = self.categories.len();
        self.categories.retain(|c| *c != category);
        self.categories.len() != before
    }

    /// Forgets every category membership, returning the old list.
    pub(crate) fn take_categories(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.categories)
    }

    /// Applies every present field of `patch`.
    pub fn apply(&mut self, patch: BookPatch) {
        if let Some(name) = patch.name {
            self.set_name(&name);
        }
        if let Some(price) = patch.price {
            self.set_price(price);
        }
        if let Some(author) = patch.author {
            self.set_author(&author);
        }
        if let Some(publisher) = patch.publisher {
            self.set_publisher(&publisher);
        }
        if let Some(pages) = patch.pages {
            self.set_pages(pages);
        }
    }
}

impl Identified for Book {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Arguments for creating a book.
#[derive(Debug, Clone, Default)]
pub struct NewBook {
    /// Title.
    pub name: Option<String>,
    /// Price.
    pub price: Option<f64>,
    /// Author.
    pub author: Option<String>,
    /// Publisher.
    pub publisher: Option<String>,
    /// Page count.
    pub pages: Option<i64>,
}

impl NewBook {
    /// Creates a draft with the given title.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sets the price.
    #[must_use]
    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Sets the author.
    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Sets the publisher.
    #[must_use]
    pub fn publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    /// Sets the page count.
    #[must_use]
    pub fn pages(mut self, pages: i64) -> Self {
        self.pages = Some(pages);
        self
    }
}

/// Partial update of a book. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct BookPatch {
    /// New title.
    pub name: Option<String>,
    /// New price.
    pub price: Option<f64>,
    /// New author.
    pub author: Option<String>,
    /// New publisher.
    pub publisher: Option<String>,
    /// New page count.
    pub pages: Option<i64>,
}

impl BookPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the new title.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the new price.
    #[must_use]
    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Sets the new author.
    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Sets the new publisher.
    #[must_use]
    pub fn publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    /// Sets the new page count.
    #[must_use]
    pub fn pages(mut self, pages: i64) -> Self {
        self.pages = Some(pages);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::IdSequencer;
    use crate::model::AuthorRef;

    fn review(seq: &IdSequencer, score: f64) -> Review {
        Review::builder()
            .score(Some(score))
            .author(AuthorRef {
                user_id: EntityId::new(1),
                username: "ana".to_string(),
            })
            .build(seq)
            .unwrap()
    }

    #[test]
    fn defaults_and_clamps() {
        let book = Book::new(
            EntityId::new(1),
            NewBook {
                name: Some("  ".into()),
                price: Some(-3.0),
                pages: Some(-10),
                ..NewBook::default()
            },
        );
        assert_eq!(book.name(), DEFAULT_BOOK_NAME);
        assert_eq!(book.author(), DEFAULT_AUTHOR);
        assert_eq!(book.publisher(), DEFAULT_PUBLISHER);
        assert_eq!(book.price(), 0.0);
        assert_eq!(book.pages(), 0);
    }

    #[test]
    fn patch_leaves_absent_fields() {
        let mut book = Book::new(EntityId::new(1), NewBook::named("Dune").price(20.0).pages(412));
        book.apply(BookPatch::new().price(9.99));
        assert_eq!(book.name(), "Dune");
        assert_eq!(book.price(), 9.99);
        assert_eq!(book.pages(), 412);
    }

    #[test]
    fn score_is_mean_of_reviews() {
        let seq = IdSequencer::new();
        let mut book = Book::new(EntityId::new(1), NewBook::named("Dune"));
        assert_eq!(book.score(), 0.0);
        assert_eq!(book.score_display(), "(?)");

        book.add_review(review(&seq, 4.0));
        book.add_review(review(&seq, 5.0));
        assert_eq!(book.score(), 4.5);
        assert_eq!(book.score_display(), "4.5");

        let first = book.reviews()[0].id();
        book.remove_review(first);
        assert_eq!(book.score(), 5.0);
    }

    #[test]
    fn duplicate_review_is_ignored() {
        let seq = IdSequencer::new();
        let mut book = Book::new(EntityId::new(1), NewBook::named("Dune"));
        let r = review(&seq, 3.0);
        assert!(book.add_review(r.clone()));
        assert!(!book.add_review(r));
        assert_eq!(book.reviews().len(), 1);
    }

    #[test]
    fn category_refs_are_a_set() {
        let mut book = Book::new(EntityId::new(1), NewBook::named("Dune"));
        assert!(book.add_category(EntityId::new(2)));
        assert!(!book.add_category(EntityId::new(2)));
        assert!(book.remove_category(EntityId::new(2)));
        assert!(!book.remove_category(EntityId::new(2)));
    }
}
