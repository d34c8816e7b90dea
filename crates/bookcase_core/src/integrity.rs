//! Integrity checks over a loaded catalog.
//!
//! Errors are broken invariants: records dropped at load for repeating an
//! ID, duplicate review IDs, one-sided book/category links, references to
//! missing categories or books, and categories reachable from themselves.
//! Warnings are accepted states worth reporting: reviews whose author was
//! deleted and shelves holding deleted books.

use crate::entity::{EntityId, EntityStore, Identified};
use crate::model::{Book, Category, User};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Outcome of [`Catalog::verify`](crate::Catalog::verify).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    /// Broken invariants.
    pub errors: Vec<String>,
    /// Accepted but notable states.
    pub warnings: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no invariant is broken. Warnings do not count.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, message: String) {
        self.errors.push(message);
    }

    fn warning(&mut self, message: String) {
        self.warnings.push(message);
    }
}

/// Records dropped for a repeated ID by the last load, per entity kind.
///
/// Stores never hold two entities with one ID, so duplicates on disk are
/// only visible through these counts.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LoadDiscards {
    pub(crate) users: usize,
    pub(crate) books: usize,
    pub(crate) categories: usize,
}

/// Checks every invariant across the three stores.
pub(crate) fn check(
    users: &EntityStore<User>,
    books: &EntityStore<Book>,
    categories: &EntityStore<Category>,
    discards: LoadDiscards,
) -> IntegrityReport {
    let mut report = IntegrityReport::default();
    let users = users.to_vec();
    let books = books.to_vec();
    let categories = categories.to_vec();

    for (kind, count) in [
        ("user", discards.users),
        ("book", discards.books),
        ("category", discards.categories),
    ] {
        if count > 0 {
            report.error(format!(
                "{count} {kind} record(s) repeating an earlier id were dropped at load"
            ));
        }
    }
    duplicate_ids(
        &mut report,
        "review",
        books.iter().flat_map(|b| b.reviews().iter().map(Identified::id)),
    );

    let books_by_id: HashMap<EntityId, &Book> = books.iter().map(|b| (b.id(), b)).collect();
    let categories_by_id: HashMap<EntityId, &Category> =
        categories.iter().map(|c| (c.id(), c)).collect();

    for book in &books {
        for category_id in book.category_ids() {
            match categories_by_id.get(category_id) {
                None => report.error(format!(
                    "book {} references missing category {category_id}",
                    book.id()
                )),
                Some(category) if !category.has_book(book.id()) => report.error(format!(
                    "book {} lists category {category_id}, which does not list it back",
                    book.id()
                )),
                Some(_) => {}
            }
        }
    }

    for category in &categories {
        for book_id in category.book_ids() {
            match books_by_id.get(book_id) {
                None => report.error(format!(
                    "category {} references missing book {book_id}",
                    category.id()
                )),
                Some(book) if !book.category_ids().contains(&category.id()) => {
                    report.error(format!(
                        "category {} lists book {book_id}, which does not list it back",
                        category.id()
                    ));
                }
                Some(_) => {}
            }
        }
        for child in category.sub_category_ids() {
            if !categories_by_id.contains_key(child) {
                report.error(format!(
                    "category {} references missing sub-category {child}",
                    category.id()
                ));
            }
        }
    }

    for category in &categories {
        if reaches_itself(category.id(), &categories_by_id) {
            report.error(format!("category {} is reachable from itself", category.id()));
        }
    }

    let user_ids: HashSet<EntityId> = users.iter().map(Identified::id).collect();
    for book in &books {
        for review in book.reviews() {
            let author = review.author();
            if !user_ids.contains(&author.user_id) {
                report.warning(format!(
                    "review {} on book {} was written by deleted user {} ({})",
                    review.id(),
                    book.id(),
                    author.user_id,
                    author.username
                ));
            }
        }
    }

    for user in &users {
        for shelf in user.shelves() {
            for book_id in shelf.book_ids() {
                if !books_by_id.contains_key(book_id) {
                    report.warning(format!(
                        "shelf {} of user {} holds deleted book {book_id}",
                        shelf.id(),
                        user.id()
                    ));
                }
            }
        }
    }

    report
}

fn duplicate_ids(
    report: &mut IntegrityReport,
    kind: &str,
    ids: impl Iterator<Item = EntityId>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            report.error(format!("duplicate {kind} id {id}"));
        }
    }
}

fn reaches_itself(start: EntityId, categories: &HashMap<EntityId, &Category>) -> bool {
    let mut visited = HashSet::new();
    let mut pending: Vec<EntityId> = categories
        .get(&start)
        .map(|c| c.sub_category_ids().to_vec())
        .unwrap_or_default();

    while let Some(id) = pending.pop() {
        if id == start {
            return true;
        }
        if visited.insert(id) {
            if let Some(category) = categories.get(&id) {
                pending.extend_from_slice(category.sub_category_ids());
            }
        }
    }
    false
}
