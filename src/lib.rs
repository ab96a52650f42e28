//! CORS forwarding proxy for Polymarket market-data APIs.
//!
//! Accepts inbound requests on configured local path prefixes, rewrites
//! them onto upstream base URLs, and relays status, Content-Type, and body
//! verbatim — with permissive CORS headers so browser pages can call the
//! upstream APIs at all. A mandatory host allow-list guards every upstream
//! call.

// Core subsystems
pub mod config;
pub mod forward;
pub mod http;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
