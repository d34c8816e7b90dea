//! Entity identity, sequencing and storage.

mod id;
mod sequencer;
mod store;

pub use id::{EntityId, Identified};
pub use sequencer::IdSequencer;
pub use store::{shared, EntityStore, Shared};
