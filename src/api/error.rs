//! Error taxonomy for the remote API
//!
//! Variants carry owned strings rather than source errors so that the type
//! stays `Clone`: refresh failures ride a shared future that every
//! concurrent caller awaits.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// HTTP 400: the backend rejected the request; message comes from the
    /// response body when the backend supplied one.
    #[error("{0}")]
    Validation(String),

    /// HTTP 401 that survived the refresh-and-retry cycle.
    #[error("authentication required")]
    Unauthorized,

    /// The session could not be refreshed and has been cleared.
    #[error("session expired, run 'mensa login' to sign in again")]
    SessionExpired,

    /// HTTP 404. Domain modules translate this into absence where the
    /// resource is optional (current order, menu by date).
    #[error("not found")]
    NotFound,

    /// Any other non-success HTTP status.
    #[error("remote error (HTTP {status}): {message}")]
    Remote { status: u16, message: String },

    /// Connection/timeout/body-decoding failures below the HTTP layer.
    #[error("request failed: {0}")]
    Transport(String),
}

impl ApiError {
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }

    /// True when the error means "the resource does not exist"
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }
}

/// Shape of the Strapi error envelope: `{ "error": { "status", "name", "message" } }`
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorDetail {
    pub message: Option<String>,
}

/// Extract a human-readable message from an error response body
pub(crate) fn message_from_body(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| fallback.to_string())
}
