//! Session store seam and the per-decision snapshot read from it.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use routegate_core::GateResult;

use crate::UserRecord;

/// Storage keys the login flow writes the session under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKeys {
    pub token: String,
    pub refresh_token: String,
    pub user: String,
}

impl SessionKeys {
    pub const DEFAULT_TOKEN: &'static str = "access_token";
    pub const DEFAULT_REFRESH_TOKEN: &'static str = "refresh_token";
    pub const DEFAULT_USER: &'static str = "user";

    /// Every key the gate clears when it discards a session.
    pub fn all(&self) -> [&str; 3] {
        [self.token.as_str(), self.refresh_token.as_str(), self.user.as_str()]
    }
}

impl Default for SessionKeys {
    fn default() -> Self {
        Self {
            token: Self::DEFAULT_TOKEN.to_string(),
            refresh_token: Self::DEFAULT_REFRESH_TOKEN.to_string(),
            user: Self::DEFAULT_USER.to_string(),
        }
    }
}

/// Client-side key/value session storage, owned by the login/logout flows.
///
/// The gate only reads from it, and clears it when the stored session is
/// unusable.
pub trait SessionStore {
    fn read(&self, key: &str) -> Option<String>;
    /// Remove `keys`. Clearing absent keys is a no-op.
    fn clear(&self, keys: &[&str]);
}

impl<S> SessionStore for Arc<S>
where
    S: SessionStore + ?Sized,
{
    fn read(&self, key: &str) -> Option<String> {
        (**self).read(key)
    }

    fn clear(&self, keys: &[&str]) {
        (**self).clear(keys)
    }
}

impl<S> SessionStore for &S
where
    S: SessionStore + ?Sized,
{
    fn read(&self, key: &str) -> Option<String> {
        (**self).read(key)
    }

    fn clear(&self, keys: &[&str]) {
        (**self).clear(keys)
    }
}

/// In-memory session storage for tests and headless hosts.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&self, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(key.into(), value.into());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().map(|map| map.is_empty()).unwrap_or(true)
    }
}

impl SessionStore for InMemorySessionStore {
    fn read(&self, key: &str) -> Option<String> {
        let map = self.inner.read().ok()?;
        map.get(key).cloned()
    }

    fn clear(&self, keys: &[&str]) {
        if let Ok(mut map) = self.inner.write() {
            for key in keys {
                map.remove(*key);
            }
        }
    }
}

/// Point-in-time read of the session, taken once per navigation decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub has_token: bool,
    pub user: Option<UserRecord>,
}

impl SessionSnapshot {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user: UserRecord) -> Self {
        Self { has_token: true, user: Some(user) }
    }

    /// Both a token and a parsed user record are present.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated_user().is_some()
    }

    pub fn authenticated_user(&self) -> Option<&UserRecord> {
        if self.has_token { self.user.as_ref() } else { None }
    }

    /// Read a fresh snapshot from `store`.
    ///
    /// A blank token counts as absent. A stored record that does not parse is
    /// reported as `GateError::CorruptSession` so the caller can clean up.
    pub fn load<S: SessionStore + ?Sized>(store: &S, keys: &SessionKeys) -> GateResult<Self> {
        let has_token = store
            .read(&keys.token)
            .is_some_and(|token| !token.trim().is_empty());

        let user = match store.read(&keys.user) {
            Some(raw) => Some(UserRecord::from_json(&raw)?),
            None => None,
        };

        Ok(Self { has_token, user })
    }
}
