//! Session context
//!
//! Everything that lives for the whole client session (drafts, the service
//! down banner, toasts, navigation and messages) is held by one explicit
//! [`Session`] that is created at start-up and handed to whoever needs it.

mod alerts;
mod drafts;
mod router;
mod toasts;

pub use alerts::{AlertStore, DownAlert};
pub use drafts::DraftStore;
pub use router::{
    organization_members_path, Navigation, Router, HOME_PATH, ONBOARDING_PATH, SIGN_IN_PATH,
};
pub use toasts::{Severity, Toast, ToastQueue};

use crate::api::{classify, ApiError, Classification, SideEffect};
use crate::i18n::MessageCatalog;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub drafts: DraftStore,
    pub alerts: AlertStore,
    pub toasts: ToastQueue,
    pub router: Router,
    pub catalog: Arc<MessageCatalog>,
}

impl Session {
    /// Start a new session
    pub fn start(catalog: MessageCatalog, initial_path: &str) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            drafts: DraftStore::new(),
            alerts: AlertStore::new(),
            toasts: ToastQueue::new(),
            router: Router::new(initial_path),
            catalog: Arc::new(catalog),
        };
        tracing::info!("Session {} started", session.id);
        session
    }

    /// End the session: drafts, banner and toasts do not outlive it
    pub fn end(&self) {
        self.drafts.clear_all();
        self.alerts.set_down_alert(None);
        self.toasts.clear();
        tracing::info!("Session {} ended", self.id);
    }

    /// Carry out a classification: error toast first, then side effects
    pub fn apply(&self, classification: &Classification) {
        if let Some(message) = &classification.message {
            self.toasts.error(message.clone());
        }
        for effect in &classification.side_effects {
            match effect {
                SideEffect::SetDownAlert(alert) => self.alerts.set_down_alert(Some(*alert)),
                SideEffect::RedirectToSignIn { redirect } => self
                    .router
                    .navigate(Navigation::to(SIGN_IN_PATH).with_redirect(redirect.clone())),
            }
        }
    }

    /// Classify a failed request and apply the outcome
    pub fn report_error(&self, error: &ApiError) -> Classification {
        let classification = classify(error, &self.catalog, &self.router.current_path());
        self.apply(&classification);
        classification
    }

    /// Any successful request clears the service-down banner
    pub fn record_success(&self) {
        self.alerts.set_down_alert(None);
    }

    /// Route a request outcome through the session: success clears the banner,
    /// failure is classified and reported
    pub fn track<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        match &result {
            Ok(_) => self.record_success(),
            Err(error) => {
                self.report_error(error);
            }
        }
        result
    }

    /// Success toast with a catalog message
    pub fn notify_success(&self, key: &str) {
        self.toasts.success(self.catalog.text(key));
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::start(MessageCatalog::english(), HOME_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ErrorBody, IDENTITY_PATH};
    use crate::state::forms::FormValues;
    use pretty_assertions::assert_eq;

    fn error(status: u16, path: &str) -> ApiError {
        ApiError::from_response(status, path, ErrorBody::default())
    }

    #[test]
    fn test_401_redirects_to_sign_in_with_current_path() {
        let session = Session::start(MessageCatalog::english(), "/acme/members");
        session.report_error(&error(401, "/organizations/acme"));

        assert_eq!(
            session.router.take_pending(),
            Some(Navigation::to(SIGN_IN_PATH).with_redirect("/acme/members"))
        );
        let toasts = session.toasts.all();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].severity, Severity::Error);
    }

    #[test]
    fn test_identity_failure_is_silent() {
        let session = Session::default();
        let result: Result<(), ApiError> = session.track(Err(error(401, IDENTITY_PATH)));
        assert!(result.is_err());
        assert!(session.toasts.all().is_empty());
        assert!(session.router.peek_pending().is_none());
        assert!(session.alerts.down_alert().is_none());
    }

    #[test]
    fn test_success_clears_banner() {
        let session = Session::default();
        session.report_error(&error(503, "/organizations"));
        assert_eq!(session.alerts.down_alert(), Some(DownAlert::Maintenance));

        let result = session.track(Ok::<_, ApiError>(42));
        assert_eq!(result, Ok(42));
        assert!(session.alerts.down_alert().is_none());
    }

    #[test]
    fn test_end_clears_session_state() {
        let session = Session::default();
        session.drafts.save("create-organization", &FormValues::new().with("name", "Acme"));
        session.report_error(&error(504, "/organizations"));
        session.end();

        assert!(session.drafts.is_empty());
        assert!(session.alerts.down_alert().is_none());
        assert!(session.toasts.all().is_empty());
    }

    #[test]
    fn test_notify_success_uses_catalog() {
        let session = Session::default();
        session.notify_success("success.create_organization");
        assert_eq!(session.toasts.all()[0].message, "Organization created.");
    }
}
