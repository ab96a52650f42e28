//! The forwarder: one upstream call per inbound request.
//!
//! # Responsibilities
//! - Resolve the target URL (upstream base + stripped path + query)
//! - Enforce the host allow-list on every call, for every entry point
//! - Issue the upstream request and relay status/Content-Type/body verbatim
//!
//! # Design Decisions
//! - The allow-list check lives here, not in the entry points, so no caller
//!   can reach upstream without passing it
//! - Upstream HTTP errors (4xx/5xx) pass through untouched; only transport
//!   failures become a 500
//! - No retries, no caching; each call is stateless and independent
//! - Response bodies are streamed, not buffered

use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::header::{HeaderMap, CONTENT_TYPE};
use axum::http::Method;
use axum::response::Response;
use url::Url;

use crate::config::{TimeoutConfig, UpstreamHeaderConfig};
use crate::forward::error::ForwardError;
use crate::forward::headers::build_upstream_headers;
use crate::routing::Route;

/// Issues upstream requests on behalf of inbound callers.
pub struct Forwarder {
    client: reqwest::Client,
    statics: UpstreamHeaderConfig,
}

impl Forwarder {
    /// Build a forwarder with its own upstream HTTP client.
    pub fn new(
        timeouts: &TimeoutConfig,
        statics: UpstreamHeaderConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .build()?;
        Ok(Self { client, statics })
    }

    /// Resolve a prefix route into a concrete target URL.
    ///
    /// The remainder is empty or starts with '/', and the upstream base path
    /// has any trailing slash trimmed, so the join never doubles a slash.
    pub fn resolve_target(route: &Route, remainder: &str, query: Option<&str>) -> Url {
        let mut target = route.upstream.clone();
        let base_path = route.upstream.path().trim_end_matches('/').to_string();
        let path = format!("{base_path}{remainder}");
        target.set_path(if path.is_empty() { "/" } else { &path });
        target.set_query(query);
        target
    }

    /// Reject targets outside the allow-list before any upstream traffic.
    pub fn check_target(target: &Url, allowed_hosts: &[String]) -> Result<(), ForwardError> {
        match target.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ForwardError::InvalidTarget(format!(
                    "unsupported scheme '{other}'"
                )));
            }
        }

        let host = target
            .host_str()
            .ok_or_else(|| ForwardError::InvalidTarget("missing host".to_string()))?
            .to_ascii_lowercase();

        if allowed_hosts.iter().any(|h| h.eq_ignore_ascii_case(&host)) {
            Ok(())
        } else {
            Err(ForwardError::HostNotAllowed(host))
        }
    }

    /// Forward one request to `target` and relay the response verbatim.
    ///
    /// Status is propagated as-is; Content-Type is the only upstream header
    /// copied back; the body is streamed unchanged and unbounded.
    pub async fn forward(
        &self,
        method: Method,
        inbound_headers: &HeaderMap,
        body: Bytes,
        target: Url,
        allowed_hosts: &[String],
    ) -> Result<Response, ForwardError> {
        Self::check_target(&target, allowed_hosts)?;

        tracing::info!(method = %method, target = %target, "Forwarding request");

        let headers = build_upstream_headers(inbound_headers, &self.statics);

        let mut request = self.client.request(method.clone(), target).headers(headers);
        if method != Method::GET && method != Method::HEAD {
            request = request.body(body);
        }

        let upstream = request.send().await.map_err(ForwardError::Upstream)?;

        let status = upstream.status();
        let content_type = upstream.headers().get(CONTENT_TYPE).cloned();

        tracing::debug!(status = %status, "Upstream responded");

        let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
        *response.status_mut() = status;
        if let Some(value) = content_type {
            response.headers_mut().insert(CONTENT_TYPE, value);
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyConfig;
    use crate::routing::ForwardTable;

    fn gamma_route() -> Route {
        let table = ForwardTable::from_config(&ProxyConfig::default_routes());
        table.lookup("/api/polymarket/x").unwrap().0.clone()
    }

    #[test]
    fn target_joins_without_double_slash() {
        let route = gamma_route();
        let target = Forwarder::resolve_target(&route, "/markets", Some("limit=5"));
        assert_eq!(
            target.as_str(),
            "https://gamma-api.polymarket.com/markets?limit=5"
        );
    }

    #[test]
    fn empty_remainder_resolves_to_root() {
        let route = gamma_route();
        let target = Forwarder::resolve_target(&route, "", None);
        assert_eq!(target.as_str(), "https://gamma-api.polymarket.com/");
    }

    #[test]
    fn query_string_is_preserved_verbatim() {
        let route = gamma_route();
        let target =
            Forwarder::resolve_target(&route, "/markets", Some("active=true&limit=10"));
        assert_eq!(target.query(), Some("active=true&limit=10"));
    }

    #[test]
    fn upstream_base_path_is_respected() {
        let mut configs = ProxyConfig::default_routes();
        configs[0].upstream = "https://gamma-api.polymarket.com/v2/".to_string();
        let table = ForwardTable::from_config(&configs);
        let (route, rest) = table.lookup("/api/polymarket/markets").unwrap();
        let target = Forwarder::resolve_target(route, rest, None);
        assert_eq!(target.path(), "/v2/markets");
    }

    #[test]
    fn allowed_host_passes_check() {
        let target = Url::parse("https://gamma-api.polymarket.com/markets").unwrap();
        let allowed = vec!["gamma-api.polymarket.com".to_string()];
        assert!(Forwarder::check_target(&target, &allowed).is_ok());
    }

    #[test]
    fn disallowed_host_is_rejected() {
        let target = Url::parse("https://evil.example.com/markets").unwrap();
        let allowed = vec!["gamma-api.polymarket.com".to_string()];
        let err = Forwarder::check_target(&target, &allowed).unwrap_err();
        assert!(matches!(err, ForwardError::HostNotAllowed(_)));
    }

    #[test]
    fn host_check_is_exact_not_substring() {
        // The original CGI script matched by substring, which let
        // gamma-api.polymarket.com.evil.example.com through.
        let target =
            Url::parse("https://gamma-api.polymarket.com.evil.example.com/x").unwrap();
        let allowed = vec!["gamma-api.polymarket.com".to_string()];
        let err = Forwarder::check_target(&target, &allowed).unwrap_err();
        assert!(matches!(err, ForwardError::HostNotAllowed(_)));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let target = Url::parse("ftp://gamma-api.polymarket.com/x").unwrap();
        let allowed = vec!["gamma-api.polymarket.com".to_string()];
        let err = Forwarder::check_target(&target, &allowed).unwrap_err();
        assert!(matches!(err, ForwardError::InvalidTarget(_)));
    }
}
