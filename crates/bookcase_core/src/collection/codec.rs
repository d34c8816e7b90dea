//! CBOR encoding of whole collections.
//!
//! A collection is written as one envelope map:
//!
//! ```text
//! { "kind": "book", "version": 1, "items": [ ... ] }
//! ```
//!
//! The envelope lets a loader reject a resource written for another kind
//! instead of misreading it. An empty resource decodes as an empty
//! collection.

use crate::collection::Entity;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Envelope version written by this crate.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    kind: &'a str,
    version: u32,
    items: &'a [T],
}

#[derive(Deserialize)]
struct Envelope<T> {
    kind: String,
    version: u32,
    items: Vec<T>,
}

/// Encodes `items` as a collection of `T`.
///
/// # Errors
///
/// Returns [`CoreError::Codec`] if serialization fails.
pub fn encode_collection<T: Entity>(items: &[T]) -> CoreResult<Vec<u8>> {
    let envelope = EnvelopeRef {
        kind: T::KIND,
        version: FORMAT_VERSION,
        items,
    };
    let mut bytes = Vec::new();
    ciborium::ser::into_writer(&envelope, &mut bytes)
        .map_err(|e| CoreError::codec(format!("encoding {} collection: {e}", T::KIND)))?;
    Ok(bytes)
}

/// Decodes a collection of `T`.
///
/// Empty input yields an empty collection.
///
/// # Errors
///
/// Returns [`CoreError::Codec`] if the bytes are not a valid envelope, if
/// the envelope holds another kind, or if its version is newer than
/// [`FORMAT_VERSION`].
pub fn decode_collection<T: Entity>(bytes: &[u8]) -> CoreResult<Vec<T>> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }

    let envelope: Envelope<T> = ciborium::de::from_reader(bytes)
        .map_err(|e| CoreError::codec(format!("decoding {} collection: {e}", T::KIND)))?;

    if envelope.kind != T::KIND {
        return Err(CoreError::codec(format!(
            "expected a {} collection, found {}",
            T::KIND,
            envelope.kind
        )));
    }
    if envelope.version > FORMAT_VERSION {
        return Err(CoreError::codec(format!(
            "unsupported collection version {} (newest known is {FORMAT_VERSION})",
            envelope.version
        )));
    }

    Ok(envelope.items)
}
