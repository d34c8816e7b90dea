//! Current-user context and its observers.
//!
//! A [`UserContext`] holds the currently bound user and a registry of
//! [`UserObserver`]s. Binding a user (login) or clearing it (logout) notifies
//! every observer synchronously, in registration order, before
//! [`UserContext::set_user`] returns.
//!
//! One context is created per catalog and handed to every component that
//! depends on identity. There is no process-wide instance.
//!
//! # Example
//!
//! ```rust
//! use bookcase_core::{shared, EntityId, User, UserContext};
//!
//! let context = UserContext::new();
//! assert!(context.current_user().is_none());
//!
//! let ana = shared(User::new(EntityId::new(1), Some("ana"), Some("pw")));
//! context.set_user(Some(ana));
//! assert_eq!(context.current_user_id(), Some(EntityId::new(1)));
//! ```

use crate::entity::{EntityId, Identified, Shared};
use crate::model::User;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// A component that tracks the current user.
pub trait UserObserver: Send + Sync {
    /// Called after the current user changes. `None` means logged out.
    fn on_user_changed(&self, user: Option<&Shared<User>>);
}

/// Holds the current user and fans out changes to observers.
#[derive(Default)]
pub struct UserContext {
    current: RwLock<Option<Shared<User>>>,
    observers: RwLock<Vec<Arc<dyn UserObserver>>>,
}

impl UserContext {
    /// Creates a context with no user bound and no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `user` (or logs out with `None`) and notifies every observer.
    pub fn set_user(&self, user: Option<Shared<User>>) {
        let id = user.as_ref().map(|u| u.read().id());
        *self.current.write() = user.clone();

        // Observers may call back into the context.
        let observers = self.observers.read().clone();
        tracing::debug!(user = ?id, observers = observers.len(), "current user changed");
        for observer in &observers {
            observer.on_user_changed(user.as_ref());
        }
    }

    /// Returns the current user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<Shared<User>> {
        self.current.read().clone()
    }

    /// Returns the ID of the current user, if any.
    #[must_use]
    pub fn current_user_id(&self) -> Option<EntityId> {
        self.current.read().as_ref().map(|u| u.read().id())
    }

    /// Registers an observer.
    ///
    /// Registering the same observer twice has no effect. Returns `true` if
    /// the observer was added.
    pub fn register_observer(&self, observer: Arc<dyn UserObserver>) -> bool {
        let mut observers = self.observers.write();
        if observers.iter().any(|o| same_observer(o, &observer)) {
            return false;
        }
        observers.push(observer);
        true
    }

    /// Unregisters an observer. Returns `true` if it was registered.
    pub fn unregister_observer(&self, observer: &Arc<dyn UserObserver>) -> bool {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|o| !same_observer(o, observer));
        observers.len() != before
    }

    /// Returns the number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.read().len()
    }
}

fn same_observer(a: &Arc<dyn UserObserver>, b: &Arc<dyn UserObserver>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl fmt::Debug for UserContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserContext")
            .field("current_user", &self.current_user_id())
            .field("observers", &self.observer_count())
            .finish()
    }
}
