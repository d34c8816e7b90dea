//! Ordered in-memory store of one entity kind.

use crate::entity::{EntityId, Identified};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// A shared, mutable handle to one entity.
///
/// Handles returned by a store alias the stored entity: writes through a
/// handle are visible to every other holder, including the store itself.
pub type Shared<T> = Arc<RwLock<T>>;

/// Wraps an entity in a [`Shared`] handle.
pub fn shared<T>(entity: T) -> Shared<T> {
    Arc::new(RwLock::new(entity))
}

/// An ordered collection of entities of one kind, keyed by identity.
///
/// The store keeps insertion order and guarantees that no two elements share
/// an [`EntityId`]. IDs are cached next to each handle, so store operations
/// never lock an entity. Callers may therefore hold an entity guard while
/// calling into the store.
pub struct EntityStore<T> {
    entries: RwLock<Vec<(EntityId, Shared<T>)>>,
}

impl<T: Identified> EntityStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Appends `entity` unless an element with the same ID is present.
    ///
    /// Returns `true` if the entity was added.
    pub fn add(&self, entity: Shared<T>) -> bool {
        let id = entity.read().id();
        let mut entries = self.entries.write();
        if entries.iter().any(|(existing, _)| *existing == id) {
            return false;
        }
        entries.push((id, entity));
        true
    }

    /// Returns the first element with the given ID.
    #[must_use]
    pub fn find_by_id(&self, id: EntityId) -> Option<Shared<T>> {
        self.entries
            .read()
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, entity)| Arc::clone(entity))
    }

    /// Returns `true` if an element with the given ID is present.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.read().iter().any(|(existing, _)| *existing == id)
    }

    /// Removes `entity` by handle identity, not by ID.
    ///
    /// Returns `true` if the handle was found and removed.
    pub fn remove(&self, entity: &Shared<T>) -> bool {
        let mut entries = self.entries.write();
        match entries.iter().position(|(_, e)| Arc::ptr_eq(e, entity)) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns a fresh list of handles in insertion order.
    ///
    /// Changing the returned `Vec` does not affect the store.
    #[must_use]
    pub fn list_snapshot(&self) -> Vec<Shared<T>> {
        self.entries
            .read()
            .iter()
            .map(|(_, entity)| Arc::clone(entity))
            .collect()
    }

    /// Returns the IDs of all elements in insertion order.
    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        self.entries.read().iter().map(|(id, _)| *id).collect()
    }

    /// Discards the current contents and installs `entities`.
    ///
    /// Later duplicates of an ID are dropped. Returns the number installed.
    pub fn replace_all(&self, entities: Vec<T>) -> usize {
        let mut fresh: Vec<(EntityId, Shared<T>)> = Vec::with_capacity(entities.len());
        for entity in entities {
            let id = entity.id();
            if fresh.iter().any(|(existing, _)| *existing == id) {
                tracing::warn!(%id, "duplicate id in loaded collection, dropping");
                continue;
            }
            fresh.push((id, shared(entity)));
        }
        let count = fresh.len();
        *self.entries.write() = fresh;
        count
    }

    /// Removes every element.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if the store holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<T: Clone> EntityStore<T> {
    /// Returns owned copies of every element, in insertion order.
    ///
    /// This is the flat sequence that gets persisted.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.entries
            .read()
            .iter()
            .map(|(_, entity)| entity.read().clone())
            .collect()
    }
}

impl<T: Identified> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for EntityStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityStore")
            .field("len", &self.entries.read().len())
            .finish_non_exhaustive()
    }
}
