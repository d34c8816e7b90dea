//! Book reviews.

use crate::entity::{EntityId, IdSequencer, Identified};
use crate::error::{CoreError, CoreResult};
use crate::model::{trimmed, User};
use serde::{Deserialize, Serialize};

/// Lowest accepted score.
pub const MIN_SCORE: f64 = 0.0;

/// Highest accepted score.
pub const MAX_SCORE: f64 = 5.0;

/// Resolves a raw score: anything absent, non-finite or outside
/// `[MIN_SCORE, MAX_SCORE]` becomes zero.
fn clamp_score(score: Option<f64>) -> f64 {
    match score {
        Some(s) if (MIN_SCORE..=MAX_SCORE).contains(&s) => s,
        _ => 0.0,
    }
}

/// The user a review was written by.
///
/// Holds the author's ID and the username at the time of writing. The ID is
/// authoritative while the author exists; the username only identifies an
/// author who has since been deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    /// The author's user ID.
    pub user_id: EntityId,
    /// The author's username.
    pub username: String,
}

impl From<&User> for AuthorRef {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id(),
            username: user.username().to_string(),
        }
    }
}

/// A scored comment on a book, owned by that book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    id: EntityId,
    comment: String,
    score: f64,
    author: AuthorRef,
}

impl Review {
    /// Starts building a review.
    #[must_use]
    pub fn builder() -> ReviewBuilder {
        ReviewBuilder::default()
    }

    /// Returns the comment, possibly empty.
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Returns the score in `[MIN_SCORE, MAX_SCORE]`.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Returns the author reference.
    #[must_use]
    pub fn author(&self) -> &AuthorRef {
        &self.author
    }

    /// Returns `true` if `user` is the live author of this review.
    #[must_use]
    pub fn is_written_by(&self, user: &User) -> bool {
        self.author.user_id == user.id()
    }

    /// Returns `true` if `user` carries the username recorded for a deleted
    /// author.
    #[must_use]
    pub fn is_claimed_by(&self, user: &User) -> bool {
        self.author.username == user.username()
    }

    /// Sets the comment, trimmed.
    pub fn set_comment(&mut self, comment: &str) {
        self.comment = trimmed(Some(comment));
    }

    /// Sets the score; out-of-range values become zero.
    pub fn set_score(&mut self, score: f64) {
        self.score = clamp_score(Some(score));
    }

    /// Applies every present field of `patch`.
    pub fn apply(&mut self, patch: ReviewPatch) {
        if let Some(comment) = patch.comment {
            self.set_comment(&comment);
        }
        if let Some(score) = patch.score {
            self.set_score(score);
        }
    }
}

impl Identified for Review {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Builder for [`Review`].
///
/// Building fails without an author. The ID is drawn from the sequencer
/// only once the author check has passed.
#[derive(Debug, Clone, Default)]
pub struct ReviewBuilder {
    id: Option<EntityId>,
    comment: Option<String>,
    score: Option<f64>,
    author: Option<AuthorRef>,
}

impl ReviewBuilder {
    /// Uses an explicit ID instead of drawing one.
    #[must_use]
    pub fn id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Sets the score; `None` resolves to zero.
    #[must_use]
    pub fn score(mut self, score: Option<f64>) -> Self {
        self.score = score;
        self
    }

    /// Sets the author.
    #[must_use]
    pub fn author(mut self, author: impl Into<AuthorRef>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Builds the review.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingAuthor`] if no author was set.
    pub fn build(self, sequencer: &IdSequencer) -> CoreResult<Review> {
        let author = self.author.ok_or(CoreError::MissingAuthor)?;
        let id = self.id.unwrap_or_else(|| sequencer.next());
        Ok(Review {
            id,
            comment: trimmed(self.comment.as_deref()),
            score: clamp_score(self.score),
            author,
        })
    }
}

/// Partial update of a review.
#[derive(Debug, Clone, Default)]
pub struct ReviewPatch {
    /// New comment.
    pub comment: Option<String>,
    /// New score.
    pub score: Option<f64>,
}

impl ReviewPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the new comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Sets the new score.
    #[must_use]
    pub fn score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}
