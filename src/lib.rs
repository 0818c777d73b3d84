//! HTTP forwarding proxy library.
//!
//! Relays an inbound request to a target URL supplied in the request path
//! (percent-encoded) or the `url` query parameter, and streams the origin's
//! response back to the caller.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
