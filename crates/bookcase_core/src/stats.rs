//! Catalog statistics.
//!
//! A [`CatalogStats`] is a point-in-time snapshot of entity counts and
//! sequencer positions, taken with [`Catalog::stats`](crate::Catalog::stats).

use crate::entity::EntityId;
use serde::Serialize;

/// Snapshot of catalog counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    /// Number of users.
    pub users: usize,
    /// Number of shelves across all users.
    pub shelves: usize,
    /// Number of books.
    pub books: usize,
    /// Number of reviews across all books.
    pub reviews: usize,
    /// Number of categories.
    pub categories: usize,
    /// ID the next user will get.
    pub next_user_id: EntityId,
    /// ID the next book will get.
    pub next_book_id: EntityId,
    /// ID the next review will get.
    pub next_review_id: EntityId,
    /// ID the next category will get.
    pub next_category_id: EntityId,
    /// Mean score over every review, if there are any.
    pub average_score: Option<f64>,
}

impl CatalogStats {
    /// Returns the total number of entities of every kind.
    #[must_use]
    pub fn total_entities(&self) -> usize {
        self.users + self.shelves + self.books + self.reviews + self.categories
    }
}

/// Running mean of review scores.
#[derive(Debug, Default)]
pub(crate) struct ScoreAccumulator {
    total: f64,
    count: usize,
}

impl ScoreAccumulator {
    pub(crate) fn add(&mut self, score: f64) {
        self.total += score;
        self.count += 1;
    }

    pub(crate) fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total / self.count as f64)
    }
}
