//! Error types for Bookcase core.

use crate::entity::EntityId;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in Bookcase core operations.
///
/// Input that is merely malformed (blank names, negative prices, scores out
/// of range) never produces an error; it is normalized at construction.
/// Lookups of missing ids return `None`/`false` instead of an error.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Resource store error.
    #[error("storage error: {0}")]
    Storage(#[from] bookcase_storage::StorageError),

    /// A collection could not be encoded or decoded.
    #[error("codec error: {message}")]
    Codec {
        /// Description of the failure.
        message: String,
    },

    /// A review was built without an author.
    #[error("a review must have an author")]
    MissingAuthor,

    /// The operation requires a bound user and none is bound.
    #[error("no user is logged in")]
    NotAuthenticated,

    /// The bound user does not own the review.
    #[error("review {review_id} belongs to another user")]
    NotAuthor {
        /// The review the user tried to change.
        review_id: EntityId,
    },

    /// Attaching the category would make it reachable from itself.
    #[error("category {child} cannot be nested under category {parent}")]
    CategoryCycle {
        /// The would-be parent.
        parent: EntityId,
        /// The would-be child.
        child: EntityId,
    },

    /// The data directory does not exist and creation was disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryMissing {
        /// The directory that was looked up.
        path: PathBuf,
    },

    /// Operation not permitted in current state.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why operation is invalid.
        message: String,
    },
}

impl CoreError {
    /// Creates a codec error.
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Returns `true` for authorization refusals.
    ///
    /// Refusals leave state unchanged and are expected during normal use.
    #[must_use]
    pub fn is_refusal(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::NotAuthor { .. })
    }
}
