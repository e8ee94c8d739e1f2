//! # Middleware Module
//!
//! Continuation-passing interceptors around route handlers.
//!
//! Each interceptor receives the request context and a [`Next`] value. It
//! may call [`Next::run`] to invoke the remainder of the chain (ultimately
//! the route handler) and inspect or rewrite the returned response, or
//! return its own response without calling `Next` at all — a short-circuit
//! that skips every later interceptor and the handler.
//!
//! ```rust,ignore
//! use switchyard::{Middleware, Next, RequestContext, Response};
//!
//! struct RequireHost;
//!
//! impl Middleware for RequireHost {
//!     fn handle(&self, ctx: &mut RequestContext, next: Next<'_>) -> anyhow::Result<Response> {
//!         if ctx.host.is_none() {
//!             return Ok(Response::error(400, "Host header required"));
//!         }
//!         let mut response = next.run(ctx)?;
//!         response.set_header("x-checked", "1".to_string());
//!         Ok(response)
//!     }
//! }
//! ```
//!
//! Chains are assembled per route when the table is built: process-wide
//! global middleware, then the defaults for the route's kind, then group
//! middleware from outermost to innermost, then route middleware. The
//! handler is the innermost continuation.
//!
//! Errors propagate up the chain as `Err`; an enclosing interceptor may
//! catch one and substitute a response, otherwise the dispatcher's error
//! handler takes over. There is no implicit catch-and-continue.

mod core;
mod metrics;
mod tracing;

pub use self::core::{run_chain, Middleware, MiddlewareRef, Next};
pub use self::metrics::MetricsMiddleware;
pub use self::tracing::TracingMiddleware;
