//! Users and their owned shelves.

use crate::entity::{EntityId, Identified};
use crate::model::{non_blank, Shelf};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Username used when none (or a blank one) is given.
pub const DEFAULT_USERNAME: &str = "unnamed";

/// A registered user.
///
/// A user owns its shelves; they are persisted together with the user.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: EntityId,
    username: String,
    password: String,
    #[serde(default)]
    shelves: Vec<Shelf>,
}

impl User {
    /// Creates a user, normalizing the username and password.
    #[must_use]
    pub fn new(id: EntityId, username: Option<&str>, password: Option<&str>) -> Self {
        Self {
            id,
            username: non_blank(username, DEFAULT_USERNAME),
            password: password.unwrap_or_default().to_string(),
            shelves: Vec::new(),
        }
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password, compared as an opaque string.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Sets the username; blank input falls back to [`DEFAULT_USERNAME`].
    pub fn set_username(&mut self, username: &str) {
        self.username = non_blank(Some(username), DEFAULT_USERNAME);
    }

    /// Sets the password.
    pub fn set_password(&mut self, password: &str) {
        self.password = password.to_string();
    }

    /// Returns `true` if both credentials match exactly.
    #[must_use]
    pub fn matches_credentials(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }

    /// Returns the user's shelves in creation order.
    #[must_use]
    pub fn shelves(&self) -> &[Shelf] {
        &self.shelves
    }

    /// Returns a mutable reference to the shelf with `id`.
    pub fn shelf_mut(&mut self, id: EntityId) -> Option<&mut Shelf> {
        self.shelves.iter_mut().find(|s| s.id() == id)
    }

    /// Returns one past the largest shelf ID, or 1 for a user with none.
    #[must_use]
    pub fn next_shelf_id(&self) -> EntityId {
        self.shelves
            .iter()
            .map(Shelf::id)
            .max()
            .map_or(EntityId::new(1), EntityId::next)
    }

    /// Adds a shelf unless one with the same ID exists.
    pub fn add_shelf(&mut self, shelf: Shelf) -> bool {
        if self.shelves.iter().any(|s| s.id() == shelf.id()) {
            return false;
        }
        self.shelves.push(shelf);
        true
    }

    /// Removes the shelf with `id`.
    pub fn remove_shelf(&mut self, id: EntityId) -> Option<Shelf> {
        let index = self.shelves.iter().position(|s| s.id() == id)?;
        Some(self.shelves.remove(index))
    }

    /// Takes `book` off every shelf. Returns the number of shelves changed.
    pub fn remove_book_from_shelves(&mut self, book: EntityId) -> usize {
        let mut changed = 0;
        for shelf in &mut self.shelves {
            if shelf.remove_book(book) {
                changed += 1;
            }
        }
        changed
    }

    /// Applies every present field of `patch`.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(username) = patch.username {
            self.set_username(&username);
        }
        if let Some(password) = patch.password {
            self.set_password(&password);
        }
    }
}

impl Identified for User {
    fn id(&self) -> EntityId {
        self.id
    }
}

// Passwords stay out of debug output.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("shelves", &self.shelves.len())
            .finish_non_exhaustive()
    }
}

/// Arguments for registering a user.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    /// Desired username.
    pub username: Option<String>,
    /// Desired password.
    pub password: Option<String>,
}

impl NewUser {
    /// Creates a draft with both credentials set.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }
}

/// Partial update of a user.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    /// New username.
    pub username: Option<String>,
    /// New password.
    pub password: Option<String>,
}

impl UserPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the new username.
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the new password.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}
