//! # Server Module
//!
//! Host adapter on `may`/`may_minihttp`.
//!
//! The engine itself only needs a host that delivers parsed
//! method/path/host/header information and accepts a response; this module
//! is that host. [`AppService`] parses raw requests, builds the
//! [`RequestContext`](crate::RequestContext) and hands it to the
//! dispatcher; [`HttpServer`] starts the listener, with each connection
//! served on its own `may` coroutine so requests never block one another.

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_cookies, parse_query_params, parse_request, ParsedRequest};
pub use response::{write_json_error, write_response};
pub use service::{health_endpoint, metrics_endpoint, AppService};

/// Initialize `tracing` with an env-filter subscriber.
///
/// Honors `RUST_LOG`; safe to call more than once (later calls are
/// no-ops).
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
