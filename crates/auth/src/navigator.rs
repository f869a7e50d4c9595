//! Redirect seam between the gate and the host router.

use std::sync::{Arc, RwLock};

/// Performs client-side navigation on the gate's behalf.
pub trait Navigator {
    /// Navigate to `path`. With `replace_history_entry` the current entry is
    /// overwritten, so "back" cannot return into the refused page.
    fn redirect(&self, path: &str, replace_history_entry: bool);
}

impl<N> Navigator for Arc<N>
where
    N: Navigator + ?Sized,
{
    fn redirect(&self, path: &str, replace_history_entry: bool) {
        (**self).redirect(path, replace_history_entry)
    }
}

impl<N> Navigator for &N
where
    N: Navigator + ?Sized,
{
    fn redirect(&self, path: &str, replace_history_entry: bool) {
        (**self).redirect(path, replace_history_entry)
    }
}

/// A redirect as requested by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub path: String,
    pub replace: bool,
}

/// Navigator that only remembers what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    redirects: RwLock<Vec<Redirect>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// All redirects so far, oldest first.
    pub fn redirects(&self) -> Vec<Redirect> {
        self.redirects.read().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Redirect> {
        self.redirects.read().ok()?.last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str, replace_history_entry: bool) {
        if let Ok(mut redirects) = self.redirects.write() {
            redirects.push(Redirect {
                path: path.to_string(),
                replace: replace_history_entry,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_redirects_in_order() {
        let navigator = RecordingNavigator::new();
        navigator.redirect("/login", true);
        navigator.redirect("/", false);

        assert_eq!(
            navigator.redirects(),
            vec![
                Redirect { path: "/login".into(), replace: true },
                Redirect { path: "/".into(), replace: false },
            ]
        );
        assert_eq!(navigator.last().map(|r| r.path), Some("/".to_string()));
    }
}
