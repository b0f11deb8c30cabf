//! Mutation lifecycle
//!
//! A [`Mutation`] runs one asynchronous write at a time and publishes its
//! [`MutationState`] on a watch channel. Success effects run in a fixed
//! order before the terminal state is published; failures go through the
//! session's error classification instead.

use super::field::FormValues;
use super::form_state::DraftForm;
use crate::api::ApiError;
use crate::session::Session;
use std::future::Future;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MutationState {
    pub status: MutationStatus,
    pub error: Option<ApiError>,
}

impl MutationState {
    pub fn is_pending(&self) -> bool {
        self.status == MutationStatus::Pending
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    /// A second invoke while the first is pending is rejected
    #[error("{0} is already in flight")]
    InFlight(&'static str),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl MutationError {
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            MutationError::Api(error) => Some(error),
            MutationError::InFlight(_) => None,
        }
    }
}

/// What happens after a successful write, in this order:
/// form reset, callback, dialog dismissal, success toast.
pub struct SuccessEffects<'a, O> {
    form: Option<(&'a mut DraftForm, FormValues)>,
    callback: Option<Box<dyn FnOnce(&O) + Send + 'a>>,
    dismiss: Option<Box<dyn FnOnce() + Send + 'a>>,
    message_key: Option<&'static str>,
}

impl<'a, O> Default for SuccessEffects<'a, O> {
    fn default() -> Self {
        Self {
            form: None,
            callback: None,
            dismiss: None,
            message_key: None,
        }
    }
}

impl<'a, O> SuccessEffects<'a, O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the submitted form; it is reset keeping values edited since `submitted`
    pub fn reset_form(mut self, form: &'a mut DraftForm, submitted: FormValues) -> Self {
        self.form = Some((form, submitted));
        self
    }

    pub fn callback(mut self, callback: impl FnOnce(&O) + Send + 'a) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Close the dialog the mutation was started from
    pub fn dismiss(mut self, dismiss: impl FnOnce() + Send + 'a) -> Self {
        self.dismiss = Some(Box::new(dismiss));
        self
    }

    /// Catalog key of the success toast
    pub fn toast(mut self, message_key: &'static str) -> Self {
        self.message_key = Some(message_key);
        self
    }
}

#[derive(Debug)]
pub struct Mutation {
    name: &'static str,
    state: watch::Sender<MutationState>,
}

impl Mutation {
    pub fn new(name: &'static str) -> Self {
        let (state, _) = watch::channel(MutationState::default());
        Self { name, state }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Snapshot of the current state
    pub fn state(&self) -> MutationState {
        self.state.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().is_pending()
    }

    /// Observe state transitions
    pub fn subscribe(&self) -> watch::Receiver<MutationState> {
        self.state.subscribe()
    }

    /// Run `operation` and apply its outcome
    pub async fn invoke<O, F>(
        &self,
        session: &Session,
        operation: F,
        effects: SuccessEffects<'_, O>,
    ) -> Result<O, MutationError>
    where
        F: Future<Output = Result<O, ApiError>>,
    {
        let started = self.state.send_if_modified(|state| {
            if state.is_pending() {
                return false;
            }
            *state = MutationState {
                status: MutationStatus::Pending,
                error: None,
            };
            true
        });
        if !started {
            tracing::warn!("Rejected {}: previous call still pending", self.name);
            return Err(MutationError::InFlight(self.name));
        }

        tracing::debug!("Mutation {} started", self.name);
        match operation.await {
            Ok(output) => {
                let SuccessEffects {
                    form,
                    callback,
                    dismiss,
                    message_key,
                } = effects;
                if let Some((form, submitted)) = form {
                    form.reset_keep_dirty_values(&submitted);
                }
                if let Some(callback) = callback {
                    callback(&output);
                }
                if let Some(dismiss) = dismiss {
                    dismiss();
                }
                if let Some(key) = message_key {
                    session.notify_success(key);
                }
                session.record_success();

                tracing::info!("Mutation {} succeeded", self.name);
                self.state.send_replace(MutationState {
                    status: MutationStatus::Success,
                    error: None,
                });
                Ok(output)
            }
            Err(error) => {
                if let (ApiError::Validation(errors), Some((form, _))) = (&error, effects.form) {
                    form.show_errors(errors.clone());
                }
                session.report_error(&error);

                tracing::warn!("Mutation {} failed: {error}", self.name);
                self.state.send_replace(MutationState {
                    status: MutationStatus::Error,
                    error: Some(error.clone()),
                });
                Err(MutationError::Api(error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClientTrait, ErrorBody, MockApiClientTrait};
    use crate::session::Severity;
    use crate::state::forms::schemas::{self, CREATE_ORGANIZATION};
    use crate::state::Organization;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    fn acme() -> Organization {
        Organization {
            id: "o1".to_string(),
            slug: "acme".to_string(),
            name: "Acme".to_string(),
            thumbnail_url: None,
            banner_url: None,
        }
    }

    /// Records notifications and effects in the order they happen
    fn event_log() -> Arc<Mutex<Vec<String>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn logged_form(log: &Arc<Mutex<Vec<String>>>, session: &Session) -> DraftForm {
        let sink = log.clone();
        DraftForm::new(CREATE_ORGANIZATION, schemas::create_organization())
            .with_drafts(&session.drafts)
            .on_values_change(Box::new(move |values: Option<&FormValues>| {
                if values.is_none() {
                    sink.lock().unwrap().push("reset".to_string());
                }
            }))
    }

    mod success {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_effects_run_in_order() {
            let session = Session::default();
            let log = event_log();
            let mut form = logged_form(&log, &session);
            form.set_value("name", "Acme").unwrap();
            let submitted = form.submit().unwrap();

            let mut client = MockApiClientTrait::new();
            client
                .expect_create_organization()
                .times(1)
                .returning(|_| Ok(acme()));

            let mutation = Mutation::new("create organization");
            let callback_log = log.clone();
            let dismiss_log = log.clone();
            let toasts = session.toasts.clone();
            let effects = SuccessEffects::new()
                .reset_form(&mut form, submitted.clone())
                .callback(move |org: &Organization| {
                    callback_log.lock().unwrap().push(format!("callback {}", org.slug));
                })
                .dismiss(move || {
                    assert!(toasts.all().is_empty());
                    dismiss_log.lock().unwrap().push("dismiss".to_string());
                })
                .toast("success.create_organization");

            let org = mutation
                .invoke(&session, client.create_organization(&submitted), effects)
                .await
                .unwrap();

            assert_eq!(org, acme());
            assert_eq!(*log.lock().unwrap(), vec!["reset", "callback acme", "dismiss"]);
            let toasts = session.toasts.all();
            assert_eq!(toasts.len(), 1);
            assert_eq!(toasts[0].severity, Severity::Success);
            assert_eq!(toasts[0].message, "Organization created.");
            assert!(!form.is_dirty());
            assert!(!session.drafts.contains(CREATE_ORGANIZATION));
            assert_eq!(mutation.state().status, MutationStatus::Success);
        }

        #[tokio::test]
        async fn test_success_clears_down_banner() {
            let session = Session::default();
            session
                .alerts
                .set_down_alert(Some(crate::session::DownAlert::Offline));
            let mutation = Mutation::new("noop");
            mutation
                .invoke(&session, async { Ok::<_, ApiError>(()) }, SuccessEffects::new())
                .await
                .unwrap();
            assert!(session.alerts.down_alert().is_none());
        }
    }

    mod failure {
        use super::*;
        use pretty_assertions::assert_eq;

        fn conflict() -> ApiError {
            ApiError::from_response(
                400,
                "/organizations",
                ErrorBody {
                    error: Some("slug taken".to_string()),
                    kind: Some("slug_exists".to_string()),
                    resource_type: Some("organization".to_string()),
                },
            )
        }

        #[tokio::test]
        async fn test_error_runs_no_success_effects() {
            let session = Session::default();
            let log = event_log();
            let mut form = logged_form(&log, &session);
            form.set_value("name", "Acme").unwrap();
            let submitted = form.submit().unwrap();

            let mut client = MockApiClientTrait::new();
            client
                .expect_create_organization()
                .returning(|_| Err(conflict()));

            let mutation = Mutation::new("create organization");
            let callback_log = log.clone();
            let dismiss_log = log.clone();
            let effects = SuccessEffects::new()
                .reset_form(&mut form, submitted.clone())
                .callback(move |_: &Organization| callback_log.lock().unwrap().push("callback".to_string()))
                .dismiss(move || dismiss_log.lock().unwrap().push("dismiss".to_string()))
                .toast("success.create_organization");

            let error = mutation
                .invoke(&session, client.create_organization(&submitted), effects)
                .await
                .unwrap_err();

            assert_eq!(error.api_error(), Some(&conflict()));
            assert!(log.lock().unwrap().is_empty());
            assert!(form.is_dirty());
            assert!(session.drafts.contains(CREATE_ORGANIZATION));

            let toasts = session.toasts.all();
            assert_eq!(toasts.len(), 1);
            assert_eq!(toasts[0].severity, Severity::Error);

            let state = mutation.state();
            assert_eq!(state.status, MutationStatus::Error);
            assert_eq!(state.error, Some(conflict()));
        }

        #[tokio::test]
        async fn test_validation_errors_land_on_the_form() {
            let session = Session::default();
            let mut form = DraftForm::new(CREATE_ORGANIZATION, schemas::create_organization());
            let values = FormValues::new().with("name", "A");
            let rejected = schemas::create_organization().validate(&values).unwrap_err();

            let mutation = Mutation::new("create organization");
            let result = mutation
                .invoke(
                    &session,
                    async { Err::<Organization, _>(ApiError::Validation(rejected)) },
                    SuccessEffects::new().reset_form(&mut form, values.clone()),
                )
                .await;

            assert!(result.is_err());
            assert!(form.field_error("name").is_some());
            assert!(session.toasts.all().is_empty());
        }
    }

    mod lifecycle {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_second_invoke_while_pending_is_rejected() {
            let session = Session::default();
            let mutation = Mutation::new("invite users");
            let (release, wait) = tokio::sync::oneshot::channel::<()>();

            let first = mutation.invoke(
                &session,
                async move {
                    let _ = wait.await;
                    Ok::<_, ApiError>(1)
                },
                SuccessEffects::new(),
            );
            let second = async {
                let result = mutation
                    .invoke(&session, async { Ok::<_, ApiError>(2) }, SuccessEffects::new())
                    .await;
                let _ = release.send(());
                result
            };

            let (first, second) = tokio::join!(first, second);
            assert_eq!(first.unwrap(), 1);
            assert!(matches!(second, Err(MutationError::InFlight("invite users"))));
        }

        #[tokio::test]
        async fn test_observers_see_pending_then_terminal() {
            let session = Session::default();
            let mutation = Mutation::new("update profile");
            let mut states = mutation.subscribe();
            assert_eq!(states.borrow().status, MutationStatus::Idle);

            let (release, wait) = tokio::sync::oneshot::channel::<()>();
            let run = mutation.invoke(
                &session,
                async move {
                    let _ = wait.await;
                    Ok::<_, ApiError>(())
                },
                SuccessEffects::new(),
            );
            let observe = async {
                states.changed().await.unwrap();
                let pending = states.borrow_and_update().status;
                let _ = release.send(());
                states.changed().await.unwrap();
                (pending, states.borrow().status)
            };

            let (result, (pending, terminal)) = tokio::join!(run, observe);
            result.unwrap();
            assert_eq!(pending, MutationStatus::Pending);
            assert_eq!(terminal, MutationStatus::Success);
            assert!(!mutation.is_pending());
        }

        #[tokio::test]
        async fn test_can_run_again_after_error() {
            let session = Session::default();
            let mutation = Mutation::new("retry");
            let error = ApiError::from_response(500, "/invite", ErrorBody::default());
            assert!(mutation
                .invoke(&session, async { Err::<(), _>(error) }, SuccessEffects::new())
                .await
                .is_err());
            assert!(mutation
                .invoke(&session, async { Ok::<_, ApiError>(()) }, SuccessEffects::new())
                .await
                .is_ok());
        }
    }
}
