//! Client-side navigation requests

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const SIGN_IN_PATH: &str = "/auth/sign-in";
pub const HOME_PATH: &str = "/";
pub const ONBOARDING_PATH: &str = "/welcome";

/// Path of an organization's members page
pub fn organization_members_path(slug: &str) -> String {
    format!("/{slug}/members")
}

/// Navigation target with an optional post-login redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub to: String,
    pub redirect: Option<String>,
}

impl Navigation {
    pub fn to(path: impl Into<String>) -> Self {
        Self {
            to: path.into(),
            redirect: None,
        }
    }

    pub fn with_redirect(mut self, redirect: impl Into<String>) -> Self {
        self.redirect = Some(redirect.into());
        self
    }
}

#[derive(Debug, Default)]
struct RouterState {
    current_path: String,
    pending: Option<Navigation>,
}

/// Records the current path and the latest requested navigation.
/// The front-end applies pending navigations between event-loop turns.
#[derive(Debug, Clone)]
pub struct Router {
    inner: Arc<Mutex<RouterState>>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(HOME_PATH)
    }
}

impl Router {
    pub fn new(initial_path: &str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RouterState {
                current_path: initial_path.to_string(),
                pending: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RouterState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current_path(&self) -> String {
        self.lock().current_path.clone()
    }

    /// Called by the front-end once a view for `path` is shown
    pub fn set_current_path(&self, path: impl Into<String>) {
        self.lock().current_path = path.into();
    }

    /// Schedule a navigation; a later request replaces an unapplied one
    pub fn navigate(&self, navigation: Navigation) {
        tracing::debug!("Navigate to {} (redirect {:?})", navigation.to, navigation.redirect);
        self.lock().pending = Some(navigation);
    }

    pub fn take_pending(&self) -> Option<Navigation> {
        self.lock().pending.take()
    }

    pub fn peek_pending(&self) -> Option<Navigation> {
        self.lock().pending.clone()
    }
}
