//! Outbound header policy.
//!
//! # Responsibilities
//! - Copy inbound headers onto the upstream request
//! - Strip hop-by-hop headers that must not be relayed
//! - Apply the static defaults (User-Agent, Accept) last, so they win
//!
//! # Design Decisions
//! - Static headers override inbound ones, never the reverse. The original
//!   implementations disagreed on merge order; the precedence here is fixed
//!   and explicit.
//! - Host and Content-Length are recomputed by the client, so both are
//!   dropped here.

use axum::http::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, USER_AGENT};

use crate::config::UpstreamHeaderConfig;

/// Headers that are connection-scoped and must not be forwarded.
const HOP_BY_HOP: &[&str] = &[
    "host",
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "content-length",
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.iter().any(|h| name.as_str() == *h)
}

/// Build the header map for the upstream request.
pub fn build_upstream_headers(
    inbound: &HeaderMap,
    statics: &UpstreamHeaderConfig,
) -> HeaderMap {
    let mut outbound = HeaderMap::with_capacity(inbound.len() + 2);

    for (name, value) in inbound.iter() {
        if !is_hop_by_hop(name) {
            outbound.append(name.clone(), value.clone());
        }
    }

    // Static defaults win over whatever the caller sent.
    if let Ok(value) = HeaderValue::from_str(&statics.user_agent) {
        outbound.insert(USER_AGENT, value);
    }
    if let Ok(value) = HeaderValue::from_str(&statics.accept) {
        outbound.insert(ACCEPT, value);
    }

    outbound
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;

    fn statics() -> UpstreamHeaderConfig {
        UpstreamHeaderConfig::default()
    }

    #[test]
    fn static_headers_override_inbound() {
        let mut inbound = HeaderMap::new();
        inbound.insert(USER_AGENT, HeaderValue::from_static("curl/8.0"));
        inbound.insert(ACCEPT, HeaderValue::from_static("text/html"));

        let out = build_upstream_headers(&inbound, &statics());
        assert_eq!(
            out.get(USER_AGENT).unwrap(),
            "Mozilla/5.0 (compatible; DakotaAI/1.0)"
        );
        assert_eq!(out.get(ACCEPT).unwrap(), "application/json");
    }

    #[test]
    fn hop_by_hop_headers_are_stripped() {
        let mut inbound = HeaderMap::new();
        inbound.insert("host", HeaderValue::from_static("localhost:3000"));
        inbound.insert("connection", HeaderValue::from_static("keep-alive"));
        inbound.insert("content-length", HeaderValue::from_static("12"));
        inbound.insert("transfer-encoding", HeaderValue::from_static("chunked"));

        let out = build_upstream_headers(&inbound, &statics());
        assert!(out.get("host").is_none());
        assert!(out.get("connection").is_none());
        assert!(out.get("content-length").is_none());
        assert!(out.get("transfer-encoding").is_none());
    }

    #[test]
    fn end_to_end_headers_pass_through() {
        let mut inbound = HeaderMap::new();
        inbound.insert(AUTHORIZATION, HeaderValue::from_static("Bearer token"));
        inbound.insert("x-custom", HeaderValue::from_static("yes"));

        let out = build_upstream_headers(&inbound, &statics());
        assert_eq!(out.get(AUTHORIZATION).unwrap(), "Bearer token");
        assert_eq!(out.get("x-custom").unwrap(), "yes");
    }
}
