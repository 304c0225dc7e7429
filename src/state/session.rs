//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to decide whether a user
//! is signed in and whether admin-only views are reachable. The session is
//! loaded once from durable storage at construction and afterwards changes
//! only through [`SessionStore::set_user`] and [`SessionStore::clear`].
//!
//! DESIGN
//! ======
//! Persisted keys and the in-memory snapshot are kept mutually consistent:
//! a write is persisted before it is published, and a failed write is rolled
//! back so the store never reports an authenticated user whose token did not
//! reach storage. Subscribers are notified through a `watch` channel and see
//! either the old or the new session, never a mix.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::rc::Rc;

use tokio::sync::watch;

use crate::net::types::UserRecord;
use crate::util::storage::{DurableStore, StorageError, TOKEN_KEY, USER_KEY};

/// Errors produced by session mutations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The durable store rejected a write; persisted state was rolled back.
    #[error("session persist failed: {0}")]
    Storage(#[from] StorageError),

    /// The user record could not be serialized.
    #[error("user record encode failed: {0}")]
    Encode(String),

    /// An empty token cannot authenticate requests; nothing was written.
    #[error("refusing to store an empty token")]
    EmptyToken,
}

/// In-memory authentication state.
///
/// `is_authenticated` is derived from the user being present and cannot be
/// set on its own.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    user: Option<UserRecord>,
    token: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new(user: Option<UserRecord>, token: Option<String>) -> Self {
        Self { user, token }
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

pub struct SessionStore {
    storage: Rc<dyn DurableStore>,
    state: watch::Sender<Session>,
}

impl SessionStore {
    /// Load the session from `storage`. A malformed stored user is treated as
    /// absent.
    pub fn new(storage: Rc<dyn DurableStore>) -> Self {
        let session = Session::new(read_stored_user(storage.as_ref()), storage.get(TOKEN_KEY));
        let (state, _) = watch::channel(session);
        Self { storage, state }
    }

    /// Current in-memory snapshot. No I/O.
    #[must_use]
    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Change notifications. Read values through [`SessionStore::current`].
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// True only when the stored user carries `is_admin: true`. Missing or
    /// corrupted records yield `false`.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.stored_user().is_some_and(|user| user.is_admin())
    }

    /// Parse the persisted user record; `None` when absent or malformed.
    #[must_use]
    pub fn stored_user(&self) -> Option<UserRecord> {
        read_stored_user(self.storage.as_ref())
    }

    /// Persisted token, read straight from storage.
    #[must_use]
    pub fn stored_token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY)
    }

    /// Persist `user` and `token`, then publish the authenticated session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyToken`] for an empty `token`, leaving
    /// storage and the session untouched. Returns a storage error if either
    /// key cannot be written; both keys are then restored to their previous
    /// values and the in-memory session is left unchanged.
    pub fn set_user(&self, user: UserRecord, token: &str) -> Result<(), SessionError> {
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let serialized = user.to_json().map_err(|e| SessionError::Encode(e.to_string()))?;
        let previous_token = self.storage.get(TOKEN_KEY);
        let previous_user = self.storage.get(USER_KEY);

        if let Err(err) = self.persist(token, &serialized) {
            log::warn!("session persist failed, rolling back: {err}");
            if let Err(rollback) = self.restore(previous_token, previous_user) {
                log::error!("session rollback failed, signing out: {rollback}");
                self.discard();
            }
            return Err(err.into());
        }

        self.state.send_replace(Session::new(Some(user), Some(token.to_owned())));
        log::debug!("session authenticated");
        Ok(())
    }

    /// Remove both keys and reset to the signed-out session. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns the first removal failure. The in-memory session is reset
    /// regardless, so an explicit sign-out always takes effect locally.
    pub fn clear(&self) -> Result<(), SessionError> {
        let token = self.storage.remove(TOKEN_KEY);
        let user = self.storage.remove(USER_KEY);
        self.reset();
        token?;
        user?;
        Ok(())
    }

    fn persist(&self, token: &str, user: &str) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, token)?;
        self.storage.set(USER_KEY, user)
    }

    fn restore(&self, token: Option<String>, user: Option<String>) -> Result<(), StorageError> {
        for (key, value) in [(TOKEN_KEY, token), (USER_KEY, user)] {
            match value {
                Some(value) => self.storage.set(key, &value)?,
                None => self.storage.remove(key)?,
            }
        }
        Ok(())
    }

    /// Last resort when storage is in an unknown state: drop both keys and
    /// publish the signed-out session.
    fn discard(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                log::error!("failed to remove {key}: {e}");
            }
        }
        self.reset();
    }

    fn reset(&self) {
        self.state.send_if_modified(|session| {
            if *session == Session::default() {
                return false;
            }
            *session = Session::default();
            true
        });
    }
}

fn read_stored_user(storage: &dyn DurableStore) -> Option<UserRecord> {
    let raw = storage.get(USER_KEY)?;
    let user = UserRecord::from_json(&raw);
    if user.is_none() {
        log::debug!("ignoring malformed stored user record");
    }
    user
}
