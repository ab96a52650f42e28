//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check each route's upstream is a member of its own allow-list
//! - Validate prefixes (leading '/', uniqueness) and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before a config is accepted into the system

use std::collections::HashSet;

use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("no routes configured and fetch endpoint disabled")]
    NothingToServe,

    #[error("route '{0}': prefix must start with '/'")]
    PrefixMissingSlash(String),

    #[error("duplicate route prefix '{0}'")]
    DuplicatePrefix(String),

    #[error("route '{0}': upstream '{1}' is not a valid URL")]
    InvalidUpstreamUrl(String, String),

    #[error("route '{0}': upstream scheme must be http or https")]
    UnsupportedScheme(String),

    #[error("route '{0}': allow-list is empty")]
    EmptyAllowList(String),

    #[error("route '{0}': upstream host '{1}' is not in its own allow-list")]
    UpstreamNotAllowListed(String, String),

    #[error("fetch endpoint: path must start with '/'")]
    FetchPathMissingSlash,

    #[error("fetch endpoint: allow-list is empty")]
    FetchAllowListEmpty,

    #[error("listener: bind address '{0}' is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("timeouts: '{0}' must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.routes.is_empty() && !config.fetch.enabled {
        errors.push(ValidationError::NothingToServe);
    }

    let mut seen_prefixes = HashSet::new();
    for route in &config.routes {
        if !route.prefix.starts_with('/') {
            errors.push(ValidationError::PrefixMissingSlash(route.name.clone()));
        }
        let normalized = route.prefix.trim_end_matches('/').to_string();
        if !seen_prefixes.insert(normalized) {
            errors.push(ValidationError::DuplicatePrefix(route.prefix.clone()));
        }

        if route.allowed_hosts.is_empty() {
            errors.push(ValidationError::EmptyAllowList(route.name.clone()));
        }

        match Url::parse(&route.upstream) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    errors.push(ValidationError::UnsupportedScheme(route.name.clone()));
                }
                if let Some(host) = url.host_str() {
                    let host = host.to_ascii_lowercase();
                    let listed = route
                        .allowed_hosts
                        .iter()
                        .any(|h| h.eq_ignore_ascii_case(&host));
                    if !route.allowed_hosts.is_empty() && !listed {
                        errors.push(ValidationError::UpstreamNotAllowListed(
                            route.name.clone(),
                            host,
                        ));
                    }
                } else {
                    errors.push(ValidationError::InvalidUpstreamUrl(
                        route.name.clone(),
                        route.upstream.clone(),
                    ));
                }
            }
            Err(_) => {
                errors.push(ValidationError::InvalidUpstreamUrl(
                    route.name.clone(),
                    route.upstream.clone(),
                ));
            }
        }
    }

    if config.fetch.enabled {
        if !config.fetch.path.starts_with('/') {
            errors.push(ValidationError::FetchPathMissingSlash);
        }
        if config.fetch.allowed_hosts.is_empty() {
            errors.push(ValidationError::FetchAllowListEmpty);
        }
    }

    if config
        .listener
        .bind_address
        .parse::<std::net::SocketAddr>()
        .is_err()
    {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
