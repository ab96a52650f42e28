//! Forward table: route lookup and prefix stripping.
//!
//! # Responsibilities
//! - Compile configured routes into an immutable table at startup
//! - Look up the route for a request path and strip its prefix
//! - Return matched route plus remainder, or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Longest prefix wins, decided deterministically at compile time
//! - O(n) prefix scan (n is a handful of routes)

use url::Url;

use crate::config::RouteConfig;
use crate::routing::matcher::PrefixMatcher;

/// A compiled route: matcher plus resolved upstream and its allow-list.
#[derive(Debug, Clone)]
pub struct Route {
    /// Route identifier for logging.
    pub name: String,

    /// Prefix matcher for this route.
    pub matcher: PrefixMatcher,

    /// Parsed upstream base URL.
    pub upstream: Url,

    /// Lowercased hosts this route may contact.
    pub allowed_hosts: Vec<String>,
}

/// Immutable table of compiled routes, ordered longest-prefix-first.
#[derive(Debug, Default)]
pub struct ForwardTable {
    routes: Vec<Route>,
}

impl ForwardTable {
    /// Compile a forward table from configuration.
    ///
    /// Assumes the config has passed validation; a route whose upstream
    /// fails to parse here is dropped with a warning rather than panicking.
    pub fn from_config(configs: &[RouteConfig]) -> Self {
        let mut routes: Vec<Route> = configs
            .iter()
            .filter_map(|rc| {
                let upstream = match Url::parse(&rc.upstream) {
                    Ok(url) => url,
                    Err(error) => {
                        tracing::warn!(
                            route = %rc.name,
                            upstream = %rc.upstream,
                            %error,
                            "Skipping route with unparseable upstream"
                        );
                        return None;
                    }
                };
                Some(Route {
                    name: rc.name.clone(),
                    matcher: PrefixMatcher::new(rc.prefix.clone()),
                    upstream,
                    allowed_hosts: rc
                        .allowed_hosts
                        .iter()
                        .map(|h| h.to_ascii_lowercase())
                        .collect(),
                })
            })
            .collect();

        // Longest prefix first so /api/polymarket-data is checked before
        // /api/polymarket.
        routes.sort_by(|a, b| b.matcher.prefix().len().cmp(&a.matcher.prefix().len()));

        Self { routes }
    }

    /// Find the route covering `path` and strip its prefix.
    ///
    /// Returns the matched route and the remainder (empty or starting
    /// with '/').
    pub fn lookup<'a, 'p>(&'a self, path: &'p str) -> Option<(&'a Route, &'p str)> {
        self.routes
            .iter()
            .find_map(|route| route.matcher.strip(path).map(|rest| (route, rest)))
    }

    /// Number of compiled routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True if no routes were compiled.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterate compiled routes (startup logging).
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }
}
