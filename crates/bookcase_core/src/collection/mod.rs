//! Persisted collections.
//!
//! Each top-level entity kind is saved as one resource holding the whole
//! collection, encoded as CBOR via the [`Entity`] trait.

mod codec;
mod entity;

pub use codec::{decode_collection, encode_collection, FORMAT_VERSION};
pub use entity::Entity;
