//! Auth session (token store).
//!
//! One [`SessionStore`] is shared by everything that talks to the API. It
//! mirrors the last known `{access, refresh, username}` triple and persists it
//! through a [`SessionStorage`] backend.
//!
//! # Consistency
//!
//! The in-memory value lives in a single `tokio::sync::watch` slot, so `set`
//! and `clear` replace all three fields in one step. A reader either sees the
//! old session or the new one, never a mix. The slot is updated *before*
//! persisting: once `clear()` returns, no request can pick up the old token,
//! even if deleting the file failed.
//!
//! Writers are serialized, so the slot and the persisted copy always end up
//! holding the same session even when a login races a forced logout.
//!
//! There is no expiry tracking. An access token is considered valid until a
//! request comes back 401.

mod storage;

pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError, StoredSession};

use std::sync::{Arc, Mutex, PoisonError};

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;

/// Tokens and identity of the logged-in user.
///
/// `Debug` redacts the tokens.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Bearer credential attached to every request.
    pub access_token: Option<SecretString>,
    /// Long-lived credential for `POST /token/refresh/`.
    pub refresh_token: Option<SecretString>,
    /// Username entered at login.
    pub username: Option<String>,
}

impl Session {
    /// A freshly issued session.
    #[must_use]
    pub fn new(access: String, refresh: String, username: impl Into<String>) -> Self {
        Self {
            access_token: Some(SecretString::from(access)),
            refresh_token: Some(SecretString::from(refresh)),
            username: Some(username.into()),
        }
    }

    /// Whether the client considers the user logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// The access token, for building the `Authorization` header.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.access_token.as_ref().map(|t| t.expose_secret())
    }

    fn to_stored(&self) -> StoredSession {
        StoredSession {
            access: self.bearer().map(str::to_owned),
            refresh: self
                .refresh_token
                .as_ref()
                .map(|t| t.expose_secret().to_owned()),
            username: self.username.clone(),
        }
    }
}

impl From<StoredSession> for Session {
    fn from(stored: StoredSession) -> Self {
        Self {
            access_token: stored.access.map(SecretString::from),
            refresh_token: stored.refresh.map(SecretString::from),
            username: stored.username,
        }
    }
}

/// Shared, persisted session state.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    current: watch::Sender<Session>,
    storage: Box<dyn SessionStorage>,
    /// Held across the slot update and the persist step.
    write: Mutex<()>,
}

impl SessionStore {
    /// Open the store, restoring whatever `storage` holds.
    ///
    /// A missing or unreadable session starts anonymous.
    #[must_use]
    pub fn open(storage: impl SessionStorage + 'static) -> Self {
        let initial = match storage.load() {
            Ok(Some(stored)) => Session::from(stored),
            Ok(None) => Session::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable saved session");
                Session::default()
            }
        };

        let (current, _) = watch::channel(initial);
        Self {
            inner: Arc::new(SessionStoreInner {
                current,
                storage: Box::new(storage),
                write: Mutex::new(()),
            }),
        }
    }

    /// An anonymous store that persists nothing.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::open(MemoryStorage::new())
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn get(&self) -> Session {
        self.inner.current.borrow().clone()
    }

    /// Current access token, if logged in.
    #[must_use]
    pub fn access_token(&self) -> Option<SecretString> {
        self.inner.current.borrow().access_token.clone()
    }

    /// Whether an access token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.current.borrow().is_authenticated()
    }

    /// Replace the session and persist it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if persisting fails. The in-memory session is
    /// replaced regardless.
    pub fn set(&self, session: Session) -> Result<(), StorageError> {
        let stored = session.to_stored();
        let _write = self.inner.write.lock().unwrap_or_else(PoisonError::into_inner);
        self.inner.current.send_replace(session);
        self.inner.storage.save(&stored).inspect_err(|e| {
            tracing::warn!(error = %e, "Failed to persist session");
        })
    }

    /// Drop all three fields and the persisted copy.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if removing the persisted copy fails. The
    /// in-memory session is cleared regardless.
    pub fn clear(&self) -> Result<(), StorageError> {
        let _write = self.inner.write.lock().unwrap_or_else(PoisonError::into_inner);
        self.inner.current.send_replace(Session::default());
        self.inner.storage.clear().inspect_err(|e| {
            tracing::warn!(error = %e, "Failed to remove persisted session");
        })
    }

    /// Watch session changes (login, logout, forced logout on 401).
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.current.subscribe()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn logged_in() -> Session {
        Session::new("acc-1".to_string(), "ref-1".to_string(), "asha")
    }

    #[test]
    fn test_open_restores_saved_session() {
        let storage = MemoryStorage::with_session(StoredSession {
            access: Some("saved".to_string()),
            refresh: None,
            username: Some("asha".to_string()),
        });
        let store = SessionStore::open(storage);

        assert!(store.is_authenticated());
        assert_eq!(store.get().bearer(), Some("saved"));
        assert_eq!(store.get().username.as_deref(), Some("asha"));
    }

    #[test]
    fn test_set_then_clear() {
        let store = SessionStore::in_memory();
        assert!(!store.is_authenticated());

        store.set(logged_in()).unwrap();
        assert_eq!(store.get().bearer(), Some("acc-1"));

        store.clear().unwrap();
        let session = store.get();
        assert!(session.access_token.is_none());
        assert!(session.refresh_token.is_none());
        assert!(session.username.is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let store = SessionStore::in_memory();
        let other = store.clone();
        store.set(logged_in()).unwrap();
        assert!(other.is_authenticated());
        other.clear().unwrap();
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_subscribe_sees_forced_logout() {
        let store = SessionStore::in_memory();
        store.set(logged_in()).unwrap();

        let mut rx = store.subscribe();
        assert!(rx.borrow_and_update().is_authenticated());

        store.clear().unwrap();
        rx.changed().await.unwrap();
        assert!(!rx.borrow().is_authenticated());
    }

    /// Storage the test can inspect after handing it to the store.
    #[derive(Clone, Default)]
    struct Shared(Arc<MemoryStorage>);

    impl SessionStorage for Shared {
        fn load(&self) -> Result<Option<StoredSession>, StorageError> {
            self.0.load()
        }

        fn save(&self, session: &StoredSession) -> Result<(), StorageError> {
            self.0.save(session)
        }

        fn clear(&self) -> Result<(), StorageError> {
            self.0.clear()
        }
    }

    #[test]
    fn test_racing_login_and_logout_keep_disk_in_step() {
        let storage = Shared::default();
        let store = SessionStore::open(storage.clone());

        let handles: Vec<_> = (0..8)
            .map(|n| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..200 {
                        if (n + i) % 2 == 0 {
                            let token = format!("acc-{n}-{i}");
                            store
                                .set(Session::new(token, "ref".to_string(), "asha"))
                                .unwrap();
                        } else {
                            store.clear().unwrap();
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let persisted = storage.load().unwrap().and_then(|s| s.access);
        assert_eq!(persisted.as_deref(), store.get().bearer());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let rendered = format!("{:?}", logged_in());
        assert!(!rendered.contains("acc-1"));
        assert!(!rendered.contains("ref-1"));
        assert!(rendered.contains("asha"));
    }
}
