//! Forwarding error taxonomy.
//!
//! # Responsibilities
//! - One error type for every way a forward can fail before or at upstream
//! - Map each failure to an HTTP status and a JSON error body
//!
//! # Design Decisions
//! - Upstream HTTP error statuses are NOT errors here; they pass through
//!   verbatim. Only transport-level failures surface as `Upstream`.
//! - Every failure becomes a response; callers never see a silent drop.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Ways a forward can fail before a verbatim upstream response exists.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// Fetch endpoint called without its required `url` parameter.
    #[error("Missing url parameter")]
    MissingUrlParam,

    /// Caller-supplied target did not parse, or used a non-http(s) scheme.
    #[error("Invalid target URL: {0}")]
    InvalidTarget(String),

    /// Resolved upstream host is not in the allow-list.
    #[error("Host not allowed: {0}")]
    HostNotAllowed(String),

    /// No configured prefix covers the request path.
    #[error("No route configured for path: {0}")]
    NoRoute(String),

    /// Transport failure talking to the upstream (connect, TLS, timeout).
    #[error("Failed to reach upstream")]
    Upstream(#[source] reqwest::Error),
}

impl ForwardError {
    /// HTTP status this failure surfaces as.
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::MissingUrlParam => StatusCode::BAD_REQUEST,
            ForwardError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
            ForwardError::HostNotAllowed(_) => StatusCode::FORBIDDEN,
            ForwardError::NoRoute(_) => StatusCode::NOT_FOUND,
            ForwardError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let body = match &self {
            ForwardError::Upstream(source) => json!({
                "error": self.to_string(),
                "details": source.to_string(),
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (self.status(), Json(body)).into_response()
    }
}
