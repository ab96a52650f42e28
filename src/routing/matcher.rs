//! Prefix matching logic.
//!
//! # Responsibilities
//! - Match a request path against a configured local prefix
//! - Strip the prefix, yielding the remainder to append upstream
//!
//! # Design Decisions
//! - Matching is segment-aware: `/api/polymarket` matches
//!   `/api/polymarket/markets` but not `/api/polymarketfoo`
//! - The remainder is always empty or starts with '/', so joining it onto
//!   an upstream origin can never produce a double slash
//! - Path matching is case-sensitive; no regex in the hot path

/// Matches request paths against a single local prefix.
#[derive(Debug, Clone)]
pub struct PrefixMatcher {
    prefix: String,
}

impl PrefixMatcher {
    /// Create a new prefix matcher. A trailing slash on the prefix is
    /// normalized away so `/api/` and `/api` behave identically.
    pub fn new(prefix: impl Into<String>) -> Self {
        let mut prefix: String = prefix.into();
        while prefix.len() > 1 && prefix.ends_with('/') {
            prefix.pop();
        }
        Self { prefix }
    }

    /// The normalized prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Strip the prefix from `path`, returning the remainder if the path
    /// falls under this prefix. The remainder is `""` for an exact match,
    /// otherwise begins with `/`.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        // A root prefix forwards everything; the whole path is the remainder.
        if self.prefix == "/" {
            return path.starts_with('/').then_some(path);
        }
        let rest = path.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            // Shares the prefix bytes but not the segment boundary.
            None
        }
    }
}
