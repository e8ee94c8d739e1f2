//! # Dispatcher Module
//!
//! Request dispatch over an atomically swappable route table.
//!
//! The dispatcher owns the compiled [`RouteTable`](crate::router::RouteTable)
//! behind an `ArcSwap`. Every dispatch loads the table pointer exactly
//! once, so a live reload — building a new table and
//! [`install`](Dispatcher::install)ing it — is atomic with respect to
//! in-flight requests: each request sees one consistent, complete table.
//!
//! Dispatch resolves the route, hands matched requests to the interceptor
//! chain (with the handler as the innermost continuation), serves
//! precomputed responses for static-cached routes, delegates to upgrade
//! hooks for WebSocket routes, runs the fallback handler when nothing
//! matches, and finally reconciles pending cookie mutations into the
//! response — unconditionally, whatever produced it.
//!
//! Errors and panics from the chain are caught at this boundary: a caught
//! error goes through the registered error handler (or a generic 500), a
//! panic becomes a 500, and neither leaks internal detail to the client.

mod core;

pub use self::core::{Dispatched, Dispatcher, ErrorHandler};
