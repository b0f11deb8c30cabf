//! Error classification
//!
//! Turns an [`ApiError`] into a description of what the user should see and
//! which global side effects follow. Nothing here touches UI or session
//! state; [`crate::session::Session::apply`] carries the result out.

use super::error::{ApiError, TransportError};
use crate::i18n::MessageCatalog;
use crate::session::DownAlert;

/// Catalog key per status code, used when no kind-specific message exists
const STATUS_FALLBACKS: &[(u16, &str)] = &[
    (400, "error.bad_request_action"),
    (401, "error.unauthorized_action"),
    (403, "error.forbidden_action"),
    (404, "error.not_found"),
    (429, "error.too_many_requests"),
];

/// Global effect of a failed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// Show the service-down banner
    SetDownAlert(DownAlert),
    /// Go to the sign-in screen, returning to `redirect` afterwards
    RedirectToSignIn { redirect: String },
}

/// Outcome of classifying an error
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    /// Message for an error toast; `None` means stay silent
    pub message: Option<String>,
    pub side_effects: Vec<SideEffect>,
}

impl Classification {
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn is_silent(&self) -> bool {
        self.message.is_none() && self.side_effects.is_empty()
    }
}

/// Candidate message keys, most specific first
fn candidate_keys(error: &TransportError) -> Vec<(String, bool)> {
    let mut keys = Vec::with_capacity(3);
    if let Some(kind) = &error.kind {
        if error.resource_type.is_some() {
            keys.push((format!("error.resource_{kind}"), true));
        }
        keys.push((format!("error.{kind}"), false));
    }
    if let Some((_, key)) = STATUS_FALLBACKS.iter().find(|(s, _)| *s == error.status) {
        keys.push(((*key).to_string(), false));
    }
    keys
}

/// Resolve the display message: resource-specific, kind-specific, status
/// table, then the raw message
pub fn resolve_message(error: &TransportError, catalog: &MessageCatalog) -> String {
    let resource = error.resource_type.as_deref().map(capitalize).unwrap_or_default();
    candidate_keys(error)
        .into_iter()
        .find_map(|(key, with_resource)| {
            if with_resource {
                catalog.render(&key, &[("resource", resource.as_str())])
            } else {
                catalog.lookup(&key)
            }
        })
        .unwrap_or_else(|| error.message.clone())
}

/// Side effects derived from the status code alone
pub fn side_effects(status: u16, current_path: &str) -> Vec<SideEffect> {
    match status {
        503 => vec![SideEffect::SetDownAlert(DownAlert::Maintenance)],
        504 => vec![SideEffect::SetDownAlert(DownAlert::Offline)],
        401 => vec![SideEffect::RedirectToSignIn {
            redirect: current_path.to_string(),
        }],
        _ => Vec::new(),
    }
}

/// Classify a failed request. `current_path` is where the user is now.
pub fn classify(error: &ApiError, catalog: &MessageCatalog, current_path: &str) -> Classification {
    match error {
        ApiError::Transport(transport) => {
            let classification = Classification {
                message: Some(resolve_message(transport, catalog)),
                side_effects: side_effects(transport.status, current_path),
            };
            tracing::debug!(
                "Classified {} on {} as {:?}",
                transport.status,
                transport.path,
                classification
            );
            classification
        }
        ApiError::Silent { status, path } => {
            tracing::debug!("Suppressed {status} from {path}");
            Classification::silent()
        }
        ApiError::Validation(errors) => {
            tracing::debug!("Validation errors stay with their form: {errors}");
            Classification::silent()
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
