//! Error type of the API boundary
//!
//! The shape of a failure is decided once, where the response is read, and
//! never re-inferred downstream.

use crate::state::forms::ValidationErrors;
use serde::Deserialize;

/// Path of the current-user identity endpoint. Its failures are never reported.
pub const IDENTITY_PATH: &str = "/me";

/// Status used for connection failures and timeouts
pub const OFFLINE_STATUS: u16 = 504;

/// A failed read or write from the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub status: u16,
    /// Machine-readable error kind, e.g. `not_found`
    pub kind: Option<String>,
    /// Entity the error is about, e.g. `organization`
    pub resource_type: Option<String>,
    /// Request path
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Request values violated their schema; never sent
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{} ({} {})", .0.message, .0.status, .0.path)]
    Transport(TransportError),

    /// Identity check failure, deliberately unreported
    #[error("identity check failed with status {status}")]
    Silent { status: u16, path: String },
}

/// JSON error body returned by the API
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub resource_type: Option<String>,
}

impl ApiError {
    /// Build the error for a failed response
    pub fn from_response(status: u16, path: &str, body: ErrorBody) -> Self {
        if path == IDENTITY_PATH {
            return ApiError::Silent {
                status,
                path: path.to_string(),
            };
        }
        ApiError::Transport(TransportError {
            status,
            kind: body.kind,
            resource_type: body.resource_type,
            path: path.to_string(),
            message: body
                .error
                .unwrap_or_else(|| format!("Request failed with status {status}")),
        })
    }

    /// Build the error for a request that never got a response
    pub fn unreachable(path: &str, message: impl Into<String>) -> Self {
        Self::from_response(
            OFFLINE_STATUS,
            path,
            ErrorBody {
                error: Some(message.into()),
                ..Default::default()
            },
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Validation(_) => None,
            ApiError::Transport(e) => Some(e.status),
            ApiError::Silent { status, .. } => Some(*status),
        }
    }

    pub fn is_silent(&self) -> bool {
        matches!(self, ApiError::Silent { .. })
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_identity_path_is_silent() {
        let error = ApiError::from_response(401, IDENTITY_PATH, ErrorBody::default());
        assert!(error.is_silent());
        assert_eq!(error.status(), Some(401));
    }

    #[test]
    fn test_transport_keeps_body_fields() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"success": false, "error": "Organization not found", "type": "not_found", "resourceType": "organization"}"#,
        )
        .unwrap();
        let error = ApiError::from_response(404, "/organizations/acme", body);
        assert_eq!(
            error,
            ApiError::Transport(TransportError {
                status: 404,
                kind: Some("not_found".to_string()),
                resource_type: Some("organization".to_string()),
                path: "/organizations/acme".to_string(),
                message: "Organization not found".to_string(),
            })
        );
        assert_eq!(error.to_string(), "Organization not found (404 /organizations/acme)");
    }

    #[test]
    fn test_missing_message_gets_generic_text() {
        let error = ApiError::from_response(500, "/organizations", ErrorBody::default());
        let ApiError::Transport(transport) = error else {
            panic!("expected transport error");
        };
        assert_eq!(transport.message, "Request failed with status 500");
    }

    #[test]
    fn test_unreachable_maps_to_offline() {
        let error = ApiError::unreachable("/organizations", "connection refused");
        assert_eq!(error.status(), Some(OFFLINE_STATUS));
    }

    #[test]
    fn test_validation_has_no_status() {
        let error = ApiError::from(ValidationErrors::default());
        assert!(error.status().is_none());
        assert!(!error.is_silent());
    }
}
