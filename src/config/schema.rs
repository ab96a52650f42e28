//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so the proxy runs with no config file at all
//! (the built-in defaults enumerate the two Polymarket routes).

use serde::{Deserialize, Serialize};

/// Root configuration for the forwarding proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Prefix routes mapping local paths to upstream origins.
    pub routes: Vec<RouteConfig>,

    /// Explicit-target fetch endpoint (`?url=` contract).
    pub fetch: FetchConfig,

    /// Static headers attached to every upstream request.
    pub upstream_headers: UpstreamHeaderConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ProxyConfig {
    /// The built-in route table: the two Polymarket upstreams, each
    /// allow-listed to exactly its own host.
    pub fn default_routes() -> Vec<RouteConfig> {
        vec![
            RouteConfig {
                name: "polymarket-gamma".to_string(),
                prefix: "/api/polymarket".to_string(),
                upstream: "https://gamma-api.polymarket.com".to_string(),
                allowed_hosts: vec!["gamma-api.polymarket.com".to_string()],
            },
            RouteConfig {
                name: "polymarket-data".to_string(),
                prefix: "/api/polymarket-data".to_string(),
                upstream: "https://data-api.polymarket.com".to_string(),
                allowed_hosts: vec!["data-api.polymarket.com".to_string()],
            },
        ]
    }

    /// Default configuration with the built-in Polymarket routes populated.
    ///
    /// `Default::default()` leaves `routes` empty (tests build their own
    /// table); this is the variant `main` uses when no config file is given.
    pub fn builtin() -> Self {
        Self {
            routes: Self::default_routes(),
            ..Self::default()
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// A prefix route: requests under `prefix` are rewritten onto `upstream`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging.
    pub name: String,

    /// Local path prefix to match (must start with '/').
    pub prefix: String,

    /// Upstream base URL the stripped path is appended to.
    pub upstream: String,

    /// Hosts this route is permitted to contact. The upstream's own host
    /// must be a member; the check is mandatory, not advisory.
    pub allowed_hosts: Vec<String>,
}

/// Configuration for the explicit-target fetch endpoint, where the caller
/// supplies the full upstream URL as a `url` query parameter.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Enable the fetch endpoint.
    pub enabled: bool,

    /// Local path the endpoint is served on.
    pub path: String,

    /// Hosts a caller-supplied target may resolve to (exact match).
    pub allowed_hosts: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/api/proxy".to_string(),
            allowed_hosts: vec![
                "gamma-api.polymarket.com".to_string(),
                "data-api.polymarket.com".to_string(),
            ],
        }
    }
}

/// Static headers sent with every upstream request. These are written after
/// the inbound headers are copied, so they always win.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamHeaderConfig {
    /// User-Agent presented to the upstream.
    pub user_agent: String,

    /// Accept header presented to the upstream.
    pub accept: String,
}

impl Default for UpstreamHeaderConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (compatible; DakotaAI/1.0)".to_string(),
            accept: "application/json".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total time allowed for one upstream call in seconds.
    pub upstream_secs: u64,

    /// Total time allowed for one inbound request in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 30,
            request_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_has_both_polymarket_routes() {
        let config = ProxyConfig::builtin();
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].prefix, "/api/polymarket");
        assert_eq!(config.routes[1].upstream, "https://data-api.polymarket.com");
    }

    #[test]
    fn minimal_toml_deserializes_with_defaults() {
        let config: ProxyConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
        assert_eq!(config.timeouts.upstream_secs, 30);
        assert!(config.fetch.enabled);
        assert!(config.routes.is_empty());
    }

    #[test]
    fn route_table_deserializes_from_toml() {
        let toml = r#"
            [[routes]]
            name = "gamma"
            prefix = "/api/polymarket"
            upstream = "https://gamma-api.polymarket.com"
            allowed_hosts = ["gamma-api.polymarket.com"]
        "#;
        let config: ProxyConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.routes.len(), 1);
        assert_eq!(config.routes[0].allowed_hosts.len(), 1);
    }
}
