//! HTTP server setup and request handlers.
//!
//! # Responsibilities
//! - Create the Axum router with the two entry points
//! - Wire up middleware (CORS, timeout, request ID, tracing)
//! - Dispatch prefix-routed requests through the forward table
//! - Serve the explicit-target fetch endpoint
//! - Run with graceful shutdown
//!
//! # Entry points
//! - `/<prefix>/<suffix>?<query>`: resolved against the forward table,
//!   prefix stripped, remainder appended to the route's upstream base
//! - `<fetch.path>?url=<target>`: full target supplied by the caller,
//!   restricted to the fetch allow-list
//!
//! Both funnel into the same `Forwarder::forward`, which owns the
//! allow-list check.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::to_bytes,
    extract::{Query, Request, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use url::Url;

use crate::config::{FetchConfig, ProxyConfig};
use crate::forward::{ForwardError, Forwarder};
use crate::http::cors::cors_middleware;
use crate::http::request::{RequestIdLayer, X_REQUEST_ID};
use crate::lifecycle::ShutdownHandle;
use crate::routing::ForwardTable;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<ForwardTable>,
    pub forwarder: Arc<Forwarder>,
    pub fetch: FetchConfig,
}

/// HTTP server for the forwarding proxy.
pub struct HttpServer {
    router: Router,
    table: Arc<ForwardTable>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, reqwest::Error> {
        let table = Arc::new(ForwardTable::from_config(&config.routes));
        let forwarder = Arc::new(Forwarder::new(
            &config.timeouts,
            config.upstream_headers.clone(),
        )?);

        let state = AppState {
            table: table.clone(),
            forwarder,
            fetch: config.fetch.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, table })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let mut router = Router::new();
        if config.fetch.enabled {
            router = router.route(&config.fetch.path, any(fetch_handler));
        }
        router
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            // CORS sits outside the timeout so even timeout responses carry
            // the headers.
            .layer(middleware::from_fn(cors_middleware))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown handle fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownHandle,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.table.len(),
            "HTTP server starting"
        );
        for route in self.table.iter() {
            tracing::info!(
                route = %route.name,
                prefix = %route.matcher.prefix(),
                upstream = %route.upstream,
                "Route registered"
            );
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn request_id(headers: &axum::http::HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Handler for prefix-routed requests.
async fn proxy_handler(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let id = request_id(&parts.headers);
    let path = parts.uri.path().to_string();
    let query = parts.uri.query().map(|q| q.to_string());

    let Some((route, remainder)) = state.table.lookup(&path) else {
        tracing::warn!(request_id = %id, path = %path, "No route matched");
        return ForwardError::NoRoute(path.clone()).into_response();
    };

    let target = Forwarder::resolve_target(route, remainder, query.as_deref());

    let body = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!(request_id = %id, %error, "Failed to read request body");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Failed to read request body" })),
            )
                .into_response();
        }
    };

    match state
        .forwarder
        .forward(
            parts.method.clone(),
            &parts.headers,
            body,
            target,
            &route.allowed_hosts,
        )
        .await
    {
        Ok(response) => response,
        Err(error) => {
            tracing::error!(request_id = %id, route = %route.name, %error, "Forward failed");
            error.into_response()
        }
    }
}

/// Handler for the explicit-target fetch endpoint (`?url=` contract).
async fn fetch_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    request: Request,
) -> Response {
    let (parts, body) = request.into_parts();
    let id = request_id(&parts.headers);

    let target = match params.get("url").filter(|u| !u.is_empty()) {
        Some(raw) => match Url::parse(raw) {
            Ok(url) => url,
            Err(error) => {
                return ForwardError::InvalidTarget(error.to_string()).into_response();
            }
        },
        None => return ForwardError::MissingUrlParam.into_response(),
    };

    let body = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!(request_id = %id, %error, "Failed to read request body");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Failed to read request body" })),
            )
                .into_response();
        }
    };

    match state
        .forwarder
        .forward(
            parts.method.clone(),
            &parts.headers,
            body,
            target,
            &state.fetch.allowed_hosts,
        )
        .await
    {
        Ok(response) => response,
        Err(error) => {
            tracing::warn!(request_id = %id, %error, "Fetch rejected or failed");
            error.into_response()
        }
    }
}
