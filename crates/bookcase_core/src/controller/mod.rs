//! Lifecycle controllers.
//!
//! Every entity kind is managed through a controller implementing the
//! [`Controller`] contract: create, partial update, lookup, listing,
//! deletion, and whole-collection save/load.
//!
//! - [`Lifecycle`] is the generic implementation over one [`Entity`] kind
//! - [`UserController`], [`BookController`] and [`CategoryController`] wrap
//!   a `Lifecycle` and add relationship handling
//! - [`ShelfController`] works on the current user's shelves instead of a
//!   global store
//! - [`ReviewController`] manages reviews inside their books and enforces
//!   authorship
//!
//! [`Entity`]: crate::collection::Entity

mod books;
mod categories;
mod lifecycle;
mod reviews;
mod shelves;
mod users;

pub use books::BookController;
pub use categories::CategoryController;
pub use lifecycle::Lifecycle;
pub use reviews::ReviewController;
pub use shelves::ShelfController;
pub use users::UserController;

use crate::entity::EntityId;

/// Create/read/update/delete plus persistence for one entity kind.
///
/// Lookups of a missing ID return `None` or `false`, never an error.
/// `save_all` and `load_all` never fail: persistence failures are logged
/// and degrade to a no-op (save) or an empty collection (load).
pub trait Controller {
    /// What lookups return.
    type Record;
    /// Arguments for `create`.
    type Draft;
    /// Arguments for `update`.
    type Patch;

    /// Creates an entity with a fresh ID.
    ///
    /// Returns `None` only when the controller refuses the operation.
    fn create(&self, draft: Self::Draft) -> Option<Self::Record>;

    /// Applies the present fields of `patch`. Returns `false` if `id` is
    /// unknown.
    fn update(&self, id: EntityId, patch: Self::Patch) -> bool;

    /// Returns the entity with `id`.
    fn find_by_id(&self, id: EntityId) -> Option<Self::Record>;

    /// Returns every entity, in insertion order, as a fresh list.
    fn list_all(&self) -> Vec<Self::Record>;

    /// Deletes the entity with `id` after severing its relationships.
    fn delete_by_id(&self, id: EntityId) -> bool;

    /// Persists the collection. Returns `false` if the write failed.
    fn save_all(&self) -> bool;

    /// Replaces the collection with the persisted one. Returns the number
    /// of entities loaded.
    fn load_all(&self) -> usize;
}
