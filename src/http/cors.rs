//! CORS middleware.
//!
//! # Responsibilities
//! - Attach the permissive CORS headers to every response, errors included
//! - Answer OPTIONS preflights immediately, before routing or upstream
//!
//! # Design Decisions
//! - Headers are fixed, not negotiated: this proxy exists so browser pages
//!   can call the upstream APIs at all
//! - Preflights never reach the forward table, so they can never trigger an
//!   upstream call

use axum::body::Body;
use axum::http::header::{HeaderMap, HeaderValue};
use axum::http::{Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Write the fixed CORS header set into `headers`.
pub fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        "access-control-allow-origin",
        HeaderValue::from_static("*"),
    );
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static("Content-Type, Authorization, X-Requested-With"),
    );
}

/// Middleware: short-circuit preflights, decorate everything else.
pub async fn cors_middleware(req: Request<Body>, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        let mut response = StatusCode::OK.into_response();
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(req).await;
    apply_cors_headers(response.headers_mut());
    response
}
