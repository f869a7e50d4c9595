//! Static per-route role annotations.

use crate::RequiredRole;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ProtectedRoute {
    prefix: String,
    required: RequiredRole,
}

/// Which paths are protected, and by which role.
///
/// Paths with no matching entry are public.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<ProtectedRoute>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Protect `prefix` and everything beneath it. `None` means any signed-in
    /// visitor. Re-registering a prefix replaces its role.
    pub fn protect(mut self, prefix: &str, required: Option<RequiredRole>) -> Self {
        let prefix = normalize(prefix);
        let required = required.unwrap_or_default();

        match self.routes.iter_mut().find(|r| r.prefix == prefix) {
            Some(existing) => existing.required = required,
            None => self.routes.push(ProtectedRoute { prefix, required }),
        }
        self
    }

    /// Role declared by the longest prefix matching `path` on a segment
    /// boundary, or `None` for public paths.
    pub fn lookup(&self, path: &str) -> Option<RequiredRole> {
        let path = normalize(strip_query(path));
        self.routes
            .iter()
            .filter(|r| covers(&r.prefix, &path))
            .max_by_key(|r| r.prefix.len())
            .map(|r| r.required)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn covers(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}
