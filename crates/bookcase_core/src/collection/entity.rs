//! Entity trait for persisted collections.

use crate::entity::{EntityId, Identified};
use crate::model::{
    Book, BookPatch, Category, CategoryPatch, NewBook, NewCategory, NewUser, User, UserPatch,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Trait for entity kinds kept in a global store and persisted as a whole
/// collection.
///
/// Implementors provide:
/// - `KIND`: a short name used in logs and in the encoded envelope
/// - `RESOURCE`: the fixed resource name the collection is saved under
/// - `build()`: the constructor recipe used by `create`
/// - `apply()`: the partial-update recipe used by `update`
pub trait Entity:
    Identified + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Kind name, e.g. `"book"`.
    const KIND: &'static str;

    /// Resource name the collection is persisted under.
    const RESOURCE: &'static str;

    /// Arguments for creating an entity.
    type Draft;

    /// Partial update of an entity.
    type Patch;

    /// Builds a new entity with the given ID.
    fn build(id: EntityId, draft: Self::Draft) -> Self;

    /// Applies the present fields of `patch`, leaving the rest untouched.
    fn apply_patch(&mut self, patch: Self::Patch);
}

impl Entity for User {
    const KIND: &'static str = "user";
    const RESOURCE: &'static str = "users.cbor";

    type Draft = NewUser;
    type Patch = UserPatch;

    fn build(id: EntityId, draft: NewUser) -> Self {
        User::new(id, draft.username.as_deref(), draft.password.as_deref())
    }

    fn apply_patch(&mut self, patch: UserPatch) {
        self.apply(patch);
    }
}

impl Entity for Book {
    const KIND: &'static str = "book";
    const RESOURCE: &'static str = "books.cbor";

    type Draft = NewBook;
    type Patch = BookPatch;

    fn build(id: EntityId, draft: NewBook) -> Self {
        Book::new(id, draft)
    }

    fn apply_patch(&mut self, patch: BookPatch) {
        self.apply(patch);
    }
}

impl Entity for Category {
    const KIND: &'static str = "category";
    const RESOURCE: &'static str = "categories.cbor";

    type Draft = NewCategory;
    type Patch = CategoryPatch;

    fn build(id: EntityId, draft: NewCategory) -> Self {
        Category::new(id, draft)
    }

    fn apply_patch(&mut self, patch: CategoryPatch) {
        self.apply(patch);
    }
}
