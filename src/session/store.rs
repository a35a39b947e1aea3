//! Current login state.

use parking_lot::RwLock;

/// Snapshot of the login state.
///
/// `token` is set iff a login succeeded and no logout happened since.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub derived_key: Option<Vec<u8>>,
}

impl Session {
    /// Check whether this snapshot carries a session token.
    pub fn is_active(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// Holder of the current [`Session`].
///
/// Owned by the [`crate::FileManager`] that created it; only login and logout
/// mutate it.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: RwLock<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current session unconditionally.
    pub fn set_session(&self, token: impl Into<String>, derived_key: Vec<u8>) {
        *self.inner.write() = Session {
            token: Some(token.into()),
            derived_key: Some(derived_key),
        };
    }

    /// Reset to the empty session. Safe to call when already empty.
    pub fn clear(&self) {
        *self.inner.write() = Session::default();
    }

    /// Copy of the current session.
    pub fn current(&self) -> Session {
        self.inner.read().clone()
    }

    pub fn is_active(&self) -> bool {
        self.inner.read().is_active()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.read().token.clone()
    }

    /// Current session if one is active.
    pub(crate) fn active(&self) -> Option<Session> {
        let session = self.inner.read();
        session.is_active().then(|| session.clone())
    }
}
