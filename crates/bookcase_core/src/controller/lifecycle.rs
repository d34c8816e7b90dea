//! Generic lifecycle over one entity kind.

use crate::collection::{decode_collection, encode_collection, Entity};
use crate::controller::Controller;
use crate::entity::{shared, EntityId, EntityStore, IdSequencer, Identified, Shared};
use crate::error::CoreResult;
use bookcase_storage::ResourceStore;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Create/update/delete/list plus save/load for one entity kind.
///
/// Composes an [`EntityStore`], an [`IdSequencer`] and the resource store
/// the collection is persisted to. The entity store is shared so that other
/// controllers can resolve references into it.
pub struct Lifecycle<T: Entity> {
    store: Arc<EntityStore<T>>,
    sequencer: IdSequencer,
    resources: Arc<dyn ResourceStore>,
    discarded: AtomicUsize,
}

impl<T: Entity> Lifecycle<T> {
    /// Creates a lifecycle over `store`, persisted to `resources`.
    pub fn new(store: Arc<EntityStore<T>>, resources: Arc<dyn ResourceStore>) -> Self {
        Self {
            store,
            sequencer: IdSequencer::new(),
            resources,
            discarded: AtomicUsize::new(0),
        }
    }

    /// Returns the underlying entity store.
    #[must_use]
    pub fn store(&self) -> &Arc<EntityStore<T>> {
        &self.store
    }

    /// Returns how many records the last load dropped for repeating an ID.
    #[must_use]
    pub fn discarded_on_load(&self) -> usize {
        self.discarded.load(Ordering::Relaxed)
    }

    /// Returns the ID the next `create` will use.
    #[must_use]
    pub fn next_id(&self) -> EntityId {
        self.sequencer.peek()
    }

    /// Builds a new entity with a fresh ID and inserts it.
    pub fn create(&self, draft: T::Draft) -> Shared<T> {
        let mut id = self.sequencer.next();
        // Skip IDs installed without going through the sequencer.
        while self.store.contains(id) {
            id = self.sequencer.next();
        }

        let entity = shared(T::build(id, draft));
        self.store.add(Arc::clone(&entity));
        tracing::debug!(kind = T::KIND, %id, "created");
        entity
    }

    /// Applies `patch` to the entity with `id`.
    pub fn update(&self, id: EntityId, patch: T::Patch) -> bool {
        match self.store.find_by_id(id) {
            Some(entity) => {
                entity.write().apply_patch(patch);
                tracing::debug!(kind = T::KIND, %id, "updated");
                true
            }
            None => false,
        }
    }

    /// Returns the entity with `id`.
    #[must_use]
    pub fn find_by_id(&self, id: EntityId) -> Option<Shared<T>> {
        self.store.find_by_id(id)
    }

    /// Returns every entity in insertion order.
    #[must_use]
    pub fn list_all(&self) -> Vec<Shared<T>> {
        self.store.list_snapshot()
    }

    /// Removes the entity with `id` without touching its relationships.
    pub fn delete_by_id(&self, id: EntityId) -> bool {
        let Some(entity) = self.store.find_by_id(id) else {
            return false;
        };
        let removed = self.store.remove(&entity);
        if removed {
            tracing::debug!(kind = T::KIND, %id, "deleted");
        }
        removed
    }

    /// Persists the collection, returning the number of entities written.
    ///
    /// The sequencer is first reset to one past the largest ID present.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the resource write fails. In-memory
    /// state is unchanged apart from the sequencer reset.
    pub fn try_save_all(&self) -> CoreResult<usize> {
        let items = self.store.to_vec();
        let next = self
            .sequencer
            .reset_after(items.iter().map(Identified::id));

        let bytes = encode_collection(items.as_slice())?;
        self.resources.write(T::RESOURCE, &bytes)?;

        tracing::info!(
            kind = T::KIND,
            resource = T::RESOURCE,
            count = items.len(),
            next_id = %next,
            "saved collection"
        );
        Ok(items.len())
    }

    /// Persists the collection, logging any failure.
    pub fn save_all(&self) -> bool {
        match self.try_save_all() {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(
                    kind = T::KIND,
                    resource = T::RESOURCE,
                    error = %e,
                    "failed to save collection"
                );
                false
            }
        }
    }

    /// Reads the persisted collection.
    ///
    /// An absent or empty resource is an empty collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be read or decoded.
    pub fn read_collection(&self) -> CoreResult<Vec<T>> {
        match self.resources.read(T::RESOURCE)? {
            Some(bytes) => decode_collection(&bytes),
            None => {
                tracing::debug!(kind = T::KIND, resource = T::RESOURCE, "resource absent");
                Ok(Vec::new())
            }
        }
    }

    /// Replaces the store contents with the persisted collection.
    ///
    /// A failed read is logged and treated as an empty collection. Records
    /// repeating an earlier ID are dropped and counted in
    /// [`discarded_on_load`](Self::discarded_on_load). The sequencer is reset
    /// to one past the largest ID loaded, or to 1.
    pub fn load_all(&self) -> usize {
        self.store.clear();

        let items = self.read_collection().unwrap_or_else(|e| {
            tracing::error!(
                kind = T::KIND,
                resource = T::RESOURCE,
                error = %e,
                "failed to load collection, starting empty"
            );
            Vec::new()
        });

        let total = items.len();
        let count = self.store.replace_all(items);
        let discarded = total - count;
        self.discarded.store(discarded, Ordering::Relaxed);
        if discarded > 0 {
            tracing::warn!(kind = T::KIND, discarded, "dropped records with duplicate ids");
        }
        let next = self.sequencer.reset_after(self.store.ids());
        tracing::info!(
            kind = T::KIND,
            resource = T::RESOURCE,
            count,
            next_id = %next,
            "loaded collection"
        );
        count
    }
}

impl<T: Entity> Controller for Lifecycle<T> {
    type Record = Shared<T>;
    type Draft = T::Draft;
    type Patch = T::Patch;

    fn create(&self, draft: T::Draft) -> Option<Shared<T>> {
        Some(Lifecycle::create(self, draft))
    }

    fn update(&self, id: EntityId, patch: T::Patch) -> bool {
        Lifecycle::update(self, id, patch)
    }

    fn find_by_id(&self, id: EntityId) -> Option<Shared<T>> {
        Lifecycle::find_by_id(self, id)
    }

    fn list_all(&self) -> Vec<Shared<T>> {
        Lifecycle::list_all(self)
    }

    fn delete_by_id(&self, id: EntityId) -> bool {
        Lifecycle::delete_by_id(self, id)
    }

    fn save_all(&self) -> bool {
        Lifecycle::save_all(self)
    }

    fn load_all(&self) -> usize {
        Lifecycle::load_all(self)
    }
}

impl<T: Entity> fmt::Debug for Lifecycle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("kind", &T::KIND)
            .field("len", &self.store.len())
            .field("next_id", &self.sequencer.peek())
            .finish_non_exhaustive()
    }
}
