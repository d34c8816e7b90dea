//! Entity identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an entity within its kind.
///
/// Entity IDs are small positive integers that are:
/// - Unique within one entity kind (a book and a user may share an ID)
/// - Immutable once assigned
/// - Handed out in increasing order by an [`IdSequencer`](super::IdSequencer)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates an entity ID from a raw value.
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the ID that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(raw: u32) -> Self {
        Self::new(raw)
    }
}

impl From<EntityId> for u32 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Types that carry an [`EntityId`].
///
/// The ID must not change over the entity's lifetime.
pub trait Identified {
    /// Returns the entity's identifier.
    fn id(&self) -> EntityId;
}
