//! Per-kind identity sequencer.

use crate::entity::EntityId;
use std::sync::atomic::{AtomicU32, Ordering};

/// Hands out monotonically increasing [`EntityId`]s for one entity kind.
///
/// Each controller owns its own sequencer, so identities generated during a
/// session stay unique even when the backing store is emptied and refilled.
/// After a bulk load the owner calls [`reset_after`](Self::reset_after) so
/// the next identity lands above everything restored.
#[derive(Debug)]
pub struct IdSequencer {
    next: AtomicU32,
}

impl IdSequencer {
    /// The first identity a fresh sequencer hands out.
    pub const FIRST: u32 = 1;

    /// Creates a sequencer starting at [`FIRST`](Self::FIRST).
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Self::FIRST)
    }

    /// Creates a sequencer whose next identity is `next`.
    #[must_use]
    pub fn starting_at(next: u32) -> Self {
        Self {
            next: AtomicU32::new(next),
        }
    }

    /// Returns the current counter value and advances it by one.
    pub fn next(&self) -> EntityId {
        EntityId::new(self.next.fetch_add(1, Ordering::SeqCst))
    }

    /// Returns the identity the next call to [`next`](Self::next) will yield.
    #[must_use]
    pub fn peek(&self) -> EntityId {
        EntityId::new(self.next.load(Ordering::SeqCst))
    }

    /// Sets the counter to `next`.
    ///
    /// No check is made against identities already in use; callers compute
    /// the value themselves.
    pub fn reset(&self, next: u32) {
        self.next.store(next, Ordering::SeqCst);
    }

    /// Resets the counter to one past the largest of `ids`, or to
    /// [`FIRST`](Self::FIRST) when `ids` is empty.
    ///
    /// Returns the identity that will be handed out next.
    pub fn reset_after<I>(&self, ids: I) -> EntityId
    where
        I: IntoIterator<Item = EntityId>,
    {
        let max = ids.into_iter().map(EntityId::as_u32).max().unwrap_or(0);
        let next = max.saturating_add(1);
        self.reset(next);
        EntityId::new(next)
    }
}

impl Default for IdSequencer {
    fn default() -> Self {
        Self::new()
    }
}
