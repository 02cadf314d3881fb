//! The session store: the single owner of the client's session.
//!
//! Responsibilities:
//! - Creating a session on login (validated role, non-empty token)
//! - Clearing it on logout
//! - Clearing it, exactly once, when the backend rejects the token
//! - Persisting both fields through a [`Storage`] so they survive restarts
//! - Telling subscribers what happened ([`SessionEvent`])
//!
//! # Sharing
//!
//! The router guard and the API gateway both hold the same store behind an
//! `Arc`. State sits in a `RwLock`. Writers hold it across the matching
//! storage calls, which are synchronous, so memory and storage change
//! together. It is never held across an `.await`, so a plain `std` lock
//! is enough.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use household_protocol::{Codec, JsonCodec, Role};
use tokio::sync::broadcast;

use crate::session::StoredUser;
use crate::{
    InvalidationReason, MemoryStorage, Session, SessionConfig, SessionError, SessionEvent, Storage,
};

/// Holds the current [`Session`] and keeps storage in sync with it.
///
/// ## Lifecycle
///
/// ```text
///   open() ──→ [restored or anonymous]
///                 │
///           login(role, token) ──→ [authenticated] ──→ logout() ──────────→ [anonymous]
///                                        │
///                                        └──→ invalidate(token, 401/403) ──→ [anonymous]
/// ```
pub struct SessionStore {
    current: RwLock<Session>,
    storage: Box<dyn Storage>,
    config: SessionConfig,
    codec: JsonCodec,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    /// A store backed by [`MemoryStorage`] with the default config.
    pub fn in_memory() -> Self {
        Self::with_session(Box::new(MemoryStorage::new()), SessionConfig::default(), Session::anonymous())
    }

    /// Opens a store over `storage`, restoring any session persisted there.
    ///
    /// A stored token whose user record is missing, undecodable, or names
    /// an unknown role is restored WITHOUT a role: it still counts as
    /// authenticated, but no role-gated page will accept it.
    ///
    /// # Errors
    /// Returns a [`SessionError`] if the storage itself can't be read.
    pub fn open(storage: impl Storage, config: SessionConfig) -> Result<Self, SessionError> {
        let token = storage
            .get(&config.token_key)?
            .filter(|t| !t.trim().is_empty());

        let role = match (&token, storage.get(&config.user_key)?) {
            (Some(_), Some(raw)) => match JsonCodec.decode::<StoredUser>(raw.as_bytes()) {
                Ok(user) => Some(user.role),
                Err(e) => {
                    tracing::warn!(error = %e, "stored user record unreadable, restoring token without role");
                    None
                }
            },
            (Some(_), None) => {
                tracing::warn!("stored token has no user record, restoring without role");
                None
            }
            (None, _) => None,
        };

        let session = Session { token, role };
        if session.is_authenticated() {
            tracing::info!(role = ?session.role, "session restored");
        } else {
            tracing::debug!("no stored session");
        }

        Ok(Self::with_session(Box::new(storage), config, session))
    }

    fn with_session(storage: Box<dyn Storage>, config: SessionConfig, session: Session) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            current: RwLock::new(session),
            storage,
            config,
            codec: JsonCodec,
            events,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        // Session is two Options; a writer that panicked can't leave it
        // half-updated in any way that matters.
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates a session, replacing any previous one.
    ///
    /// The token is opaque: nothing about it is checked locally except that
    /// it isn't blank. Whether it's actually valid is learned from the next
    /// API response.
    ///
    /// Storage is written first. If persisting fails, the previously
    /// stored keys are put back and the in-memory session is untouched.
    ///
    /// # Errors
    /// - [`SessionError::MissingToken`]: blank token
    /// - [`SessionError::Storage`] / [`SessionError::Corrupt`]: couldn't persist
    pub fn login(&self, role: Role, token: impl Into<String>) -> Result<(), SessionError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(SessionError::MissingToken);
        }

        let user = self
            .codec
            .encode(&StoredUser { role })
            .map_err(SessionError::Encoding)?;
        // JsonCodec output is always UTF-8.
        let user = String::from_utf8_lossy(&user);

        // Held across storage and memory so a concurrent logout or
        // invalidation can't interleave with the two writes.
        let mut current = self.write();
        let previous_token = self.storage.get(&self.config.token_key)?;
        let previous_user = self.storage.get(&self.config.user_key)?;

        self.storage.set(&self.config.token_key, &token)?;
        if let Err(e) = self.storage.set(&self.config.user_key, &user) {
            self.restore(&self.config.token_key, previous_token.as_deref());
            self.restore(&self.config.user_key, previous_user.as_deref());
            return Err(e);
        }

        *current = Session {
            token: Some(token),
            role: Some(role),
        };
        drop(current);

        tracing::info!(%role, "session created");
        let _ = self.events.send(SessionEvent::LoggedIn { role });
        Ok(())
    }

    /// Puts a key back to its previous value after a failed login.
    fn restore(&self, key: &str, previous: Option<&str>) {
        let result = match previous {
            Some(value) => self.storage.set(key, value),
            None => self.storage.remove(key),
        };
        if let Err(e) = result {
            tracing::warn!(key, error = %e, "failed to restore stored session key");
        }
    }

    /// Like [`login`](Self::login) but validates a role string first
    /// (case-insensitively). Returns the parsed role.
    ///
    /// # Errors
    /// [`SessionError::InvalidRole`] for anything but admin, customer or
    /// professional, plus everything `login` can return.
    pub fn login_as(&self, role: &str, token: impl Into<String>) -> Result<Role, SessionError> {
        let role: Role = role.parse().map_err(SessionError::InvalidRole)?;
        self.login(role, token)?;
        Ok(role)
    }

    /// Clears the session.
    ///
    /// Memory is cleared first and unconditionally: after `logout` returns,
    /// `is_authenticated()` is `false` even if storage couldn't be updated.
    ///
    /// # Errors
    /// The first storage error hit while removing the persisted keys.
    pub fn logout(&self) -> Result<(), SessionError> {
        let (was_authenticated, result) = {
            let mut current = self.write();
            let was = current.is_authenticated();
            *current = Session::anonymous();
            (was, self.clear_storage())
        };

        if was_authenticated {
            tracing::info!("session cleared");
            let _ = self.events.send(SessionEvent::LoggedOut);
        }
        result
    }

    /// Clears the session because the backend rejected `token_used`.
    ///
    /// Compare-and-clear: nothing happens unless `token_used` is still the
    /// current token. That makes the call safe from any number of
    /// concurrent requests failing with the same token (only the first
    /// clears) and from stale responses that arrive after a fresh login.
    ///
    /// Returns `true` iff this call cleared the session.
    pub fn invalidate(&self, token_used: &str, reason: InvalidationReason) -> bool {
        {
            let mut current = self.write();
            if current.token.as_deref() != Some(token_used) {
                tracing::debug!(%reason, "stale invalidation ignored");
                return false;
            }
            *current = Session::anonymous();
            if let Err(e) = self.clear_storage() {
                tracing::warn!(error = %e, "failed to clear stored session after invalidation");
            }
        }

        tracing::warn!(%reason, "session invalidated by backend");
        let _ = self.events.send(SessionEvent::Invalidated { reason });
        true
    }

    fn clear_storage(&self) -> Result<(), SessionError> {
        let token = self.storage.remove(&self.config.token_key);
        let user = self.storage.remove(&self.config.user_key);
        token.and(user)
    }

    /// `true` iff a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    /// A copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    /// The current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    /// The current role, if any.
    pub fn role(&self) -> Option<Role> {
        self.read().role
    }

    /// Subscribes to session events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.read();
        // Never print the token itself.
        f.debug_struct("SessionStore")
            .field("authenticated", &session.is_authenticated())
            .field("role", &session.role)
            .finish_non_exhaustive()
    }
}

// =========================================================================
// Tests
// =========================================================================
