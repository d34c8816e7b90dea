//! User registration, login and lifecycle.

use crate::context::UserContext;
use crate::controller::{Controller, Lifecycle};
use crate::entity::{EntityId, EntityStore, Identified, Shared};
use crate::model::{non_blank, NewUser, User, UserPatch, DEFAULT_USERNAME};
use bookcase_storage::ResourceStore;
use std::sync::Arc;

/// Manages users and binds the logged-in one to the [`UserContext`].
#[derive(Debug)]
pub struct UserController {
    lifecycle: Lifecycle<User>,
    context: Arc<UserContext>,
}

impl UserController {
    /// Creates a controller over `store`.
    pub fn new(
        store: Arc<EntityStore<User>>,
        resources: Arc<dyn ResourceStore>,
        context: Arc<UserContext>,
    ) -> Self {
        Self {
            lifecycle: Lifecycle::new(store, resources),
            context,
        }
    }

    /// Returns the user store.
    #[must_use]
    pub fn store(&self) -> &Arc<EntityStore<User>> {
        self.lifecycle.store()
    }

    /// Returns how many records the last load dropped for repeating an ID.
    #[must_use]
    pub fn discarded_on_load(&self) -> usize {
        self.lifecycle.discarded_on_load()
    }

    /// Returns the ID the next new user will get.
    #[must_use]
    pub fn next_id(&self) -> EntityId {
        self.lifecycle.next_id()
    }

    /// Returns `true` if a user with this name exists, ignoring case.
    #[must_use]
    pub fn username_exists(&self, username: &str) -> bool {
        let wanted = username.trim().to_lowercase();
        self.store()
            .list_snapshot()
            .iter()
            .any(|u| u.read().username().to_lowercase() == wanted)
    }

    /// Creates a user unless the username is already taken.
    ///
    /// The username is normalized first, so a blank one competes for
    /// [`DEFAULT_USERNAME`].
    pub fn register(&self, draft: NewUser) -> Option<Shared<User>> {
        let username = non_blank(draft.username.as_deref(), DEFAULT_USERNAME);
        if self.username_exists(&username) {
            tracing::warn!(%username, "registration refused: username taken");
            return None;
        }
        let user = self.lifecycle.create(draft);
        tracing::info!(id = %user.read().id(), %username, "user registered");
        Some(user)
    }

    /// Binds the user whose credentials match exactly.
    ///
    /// On failure the current user is left unchanged.
    pub fn login(&self, username: &str, password: &str) -> Option<Shared<User>> {
        let user = self
            .store()
            .list_snapshot()
            .into_iter()
            .find(|u| u.read().matches_credentials(username, password));

        match &user {
            Some(found) => {
                self.context.set_user(Some(Arc::clone(found)));
                tracing::info!(%username, "logged in");
            }
            None => tracing::warn!(%username, "login failed"),
        }
        user
    }

    /// Clears the current user.
    pub fn logout(&self) {
        self.context.set_user(None);
        tracing::info!("logged out");
    }

    /// Re-binds the current user against the store.
    ///
    /// After a reload the bound handle no longer belongs to the store. The
    /// user with the same ID is bound instead, or nobody if it is gone.
    pub fn rebind_current(&self) {
        let Some(id) = self.context.current_user_id() else {
            return;
        };
        let fresh = self.store().find_by_id(id);
        if fresh.is_none() {
            tracing::warn!(%id, "current user vanished after reload, logging out");
        }
        self.context.set_user(fresh);
    }
}

impl Controller for UserController {
    type Record = Shared<User>;
    type Draft = NewUser;
    type Patch = UserPatch;

    fn create(&self, draft: NewUser) -> Option<Shared<User>> {
        Some(self.lifecycle.create(draft))
    }

    fn update(&self, id: EntityId, patch: UserPatch) -> bool {
        self.lifecycle.update(id, patch)
    }

    fn find_by_id(&self, id: EntityId) -> Option<Shared<User>> {
        self.lifecycle.find_by_id(id)
    }

    fn list_all(&self) -> Vec<Shared<User>> {
        self.lifecycle.list_all()
    }

    /// Deletes the user. Reviews they wrote keep their author reference.
    ///
    /// Deleting the current user logs them out.
    fn delete_by_id(&self, id: EntityId) -> bool {
        let deleted = self.lifecycle.delete_by_id(id);
        if deleted && self.context.current_user_id() == Some(id) {
            self.context.set_user(None);
        }
        deleted
    }

    fn save_all(&self) -> bool {
        self.lifecycle.save_all()
    }

    fn load_all(&self) -> usize {
        self.lifecycle.load_all()
    }
}
