//! The access gate: one routing decision per navigation.
//!
//! The gate reads a fresh [`SessionSnapshot`] from its injected
//! [`SessionStore`], applies [`authorize`], and asks its [`Navigator`] for a
//! history-replacing redirect whenever the outcome is not `Allow`. It never
//! fails: every malformed or missing input degrades to a redirect.

use crate::{
    AccessDenied, GateConfig, Navigator, RequiredRole, RouteTable, SessionSnapshot, SessionStore,
    authorize,
};

/// Outcome of one navigation decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    RedirectToLogin(String),
    RedirectToFallback(String),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    /// Redirect target, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            AccessDecision::Allow => None,
            AccessDecision::RedirectToLogin(path) | AccessDecision::RedirectToFallback(path) => {
                Some(path)
            }
        }
    }
}

pub struct AccessGate<S, N> {
    store: S,
    navigator: N,
    config: GateConfig,
}

impl<S, N> AccessGate<S, N>
where
    S: SessionStore,
    N: Navigator,
{
    pub fn new(store: S, navigator: N) -> Self {
        Self::with_config(store, navigator, GateConfig::default())
    }

    pub fn with_config(store: S, navigator: N, config: GateConfig) -> Self {
        Self { store, navigator, config }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Decide access to a view declaring `required`, redirecting if refused.
    pub fn check(&self, required: RequiredRole) -> AccessDecision {
        let decision = self.decide(required);
        if let Some(target) = decision.target() {
            self.navigator.redirect(target, true);
        }
        decision
    }

    /// Decide access to `path` using the route annotations in `routes`.
    ///
    /// Public paths are allowed without touching the session.
    pub fn guard(&self, path: &str, routes: &RouteTable) -> AccessDecision {
        match routes.lookup(path) {
            Some(required) => {
                tracing::trace!(path, %required, "protected route");
                self.check(required)
            }
            None => AccessDecision::Allow,
        }
    }

    fn decide(&self, required: RequiredRole) -> AccessDecision {
        let snapshot = match SessionSnapshot::load(&self.store, &self.config.keys) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(%required, error = %err, "stored session is unusable; clearing");
                self.clear_session();
                return self.to_login();
            }
        };

        match authorize(required, &snapshot) {
            Ok(grant) => {
                tracing::debug!(%required, ?grant, "access allowed");
                AccessDecision::Allow
            }
            Err(AccessDenied::Unauthenticated) => {
                if snapshot.has_token != snapshot.user.is_some() {
                    tracing::info!(
                        %required,
                        has_token = snapshot.has_token,
                        has_user = snapshot.user.is_some(),
                        "partial session; clearing"
                    );
                    self.clear_session();
                } else {
                    tracing::info!(%required, "not signed in");
                }
                self.to_login()
            }
            Err(denied @ AccessDenied::InsufficientRole(_)) => {
                tracing::info!(%required, reason = %denied, "access refused");
                AccessDecision::RedirectToFallback(self.config.fallback_path.clone())
            }
        }
    }

    fn to_login(&self) -> AccessDecision {
        AccessDecision::RedirectToLogin(self.config.login_path.clone())
    }

    fn clear_session(&self) {
        self.store.clear(&self.config.keys.all());
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::{InMemorySessionStore, RecordingNavigator, Redirect};

    /// Store wrapper counting `clear` calls.
    struct CountingStore {
        inner: InMemorySessionStore,
        clears: Cell<usize>,
    }

    impl SessionStore for CountingStore {
        fn read(&self, key: &str) -> Option<String> {
            self.inner.read(key)
        }

        fn clear(&self, keys: &[&str]) {
            self.clears.set(self.clears.get() + 1);
            self.inner.clear(keys)
        }
    }

    fn counting(entries: &[(&str, &str)]) -> CountingStore {
        let inner = InMemorySessionStore::new();
        for (k, v) in entries {
            inner.write(*k, *v);
        }
        CountingStore { inner, clears: Cell::new(0) }
    }

    #[test]
    fn allow_does_not_redirect() {
        let store = counting(&[("access_token", "t"), ("user", "{}")]);
        let gate = AccessGate::new(store, RecordingNavigator::new());

        assert_eq!(gate.check(RequiredRole::User), AccessDecision::Allow);
        assert!(gate.navigator().redirects().is_empty());
        assert_eq!(gate.store().clears.get(), 0);
    }

    #[test]
    fn empty_store_redirects_to_login_without_clearing() {
        let gate = AccessGate::new(counting(&[]), RecordingNavigator::new());

        assert_eq!(
            gate.check(RequiredRole::Authenticated),
            AccessDecision::RedirectToLogin("/login".into())
        );
        assert_eq!(gate.store().clears.get(), 0);
        assert_eq!(
            gate.navigator().last(),
            Some(Redirect { path: "/login".into(), replace: true })
        );
    }

    #[test]
    fn token_without_record_is_cleared() {
        let store = counting(&[("access_token", "t"), ("refresh_token", "r")]);
        let gate = AccessGate::new(store, RecordingNavigator::new());

        assert_eq!(gate.check(RequiredRole::User), AccessDecision::RedirectToLogin("/login".into()));
        assert_eq!(gate.store().clears.get(), 1);
        assert_eq!(gate.store().inner.read("refresh_token"), None);
    }

    #[test]
    fn corrupt_record_is_cleared_once_per_decision() {
        let store = counting(&[("access_token", "t"), ("refresh_token", "r"), ("user", "{broken")]);
        let gate = AccessGate::new(store, RecordingNavigator::new());

        assert_eq!(gate.check(RequiredRole::User), AccessDecision::RedirectToLogin("/login".into()));
        assert_eq!(gate.store().clears.get(), 1);
        assert!(gate.store().inner.is_empty());
    }

    #[test]
    fn insufficient_role_keeps_the_session() {
        let store = counting(&[("access_token", "t"), ("user", r#"{"is_staff": false}"#)]);
        let gate = AccessGate::new(store, RecordingNavigator::new());

        assert_eq!(
            gate.check(RequiredRole::Superadmin),
            AccessDecision::RedirectToFallback("/".into())
        );
        assert_eq!(gate.store().clears.get(), 0);
        assert_eq!(gate.store().inner.read("access_token").as_deref(), Some("t"));
    }

    #[test]
    fn configured_targets_are_used() {
        let config = GateConfig {
            login_path: "/auth/sign-in".into(),
            fallback_path: "/careers".into(),
            ..GateConfig::default()
        };
        let store = InMemorySessionStore::new();
        let gate = AccessGate::with_config(&store, RecordingNavigator::new(), config);

        assert_eq!(gate.check(RequiredRole::Hr).target(), Some("/auth/sign-in"));

        store.write("access_token", "t");
        store.write("user", "{}");
        assert_eq!(gate.check(RequiredRole::Hr).target(), Some("/careers"));
    }

    #[test]
    fn guard_skips_public_paths() {
        let routes = RouteTable::new().protect("/dashboard", Some(RequiredRole::Admin));
        let gate = AccessGate::new(counting(&[]), RecordingNavigator::new());

        assert_eq!(gate.guard("/about", &routes), AccessDecision::Allow);
        assert!(gate.navigator().redirects().is_empty());

        assert_eq!(
            gate.guard("/dashboard/users", &routes),
            AccessDecision::RedirectToLogin("/login".into())
        );
    }
}
