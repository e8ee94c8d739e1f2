use std::fmt;
use std::sync::Arc;

use crate::context::RequestContext;
use crate::handler::Handler;
use crate::response::Response;

/// A request interceptor.
///
/// Calling `next.run(ctx)` invokes the rest of the chain; not calling it
/// short-circuits, skipping all later interceptors and the handler.
pub trait Middleware: Send + Sync {
    fn handle(&self, ctx: &mut RequestContext, next: Next<'_>) -> anyhow::Result<Response>;
}

impl<F> Middleware for F
where
    F: for<'a> Fn(&mut RequestContext, Next<'a>) -> anyhow::Result<Response> + Send + Sync,
{
    fn handle(&self, ctx: &mut RequestContext, next: Next<'_>) -> anyhow::Result<Response> {
        self(ctx, next)
    }
}

/// The continuation handed to each interceptor.
///
/// Holds the remaining chain as an explicit sub-slice plus the terminal
/// handler; no mutable cursor is shared between steps. `run` consumes the
/// value, so each step invokes its continuation at most once.
pub struct Next<'a> {
    chain: &'a [Arc<dyn Middleware>],
    handler: &'a dyn Handler,
}

impl<'a> Next<'a> {
    /// Run the remainder of the chain and return its response.
    pub fn run(self, ctx: &mut RequestContext) -> anyhow::Result<Response> {
        match self.chain.split_first() {
            Some((mw, rest)) => mw.handle(
                ctx,
                Next {
                    chain: rest,
                    handler: self.handler,
                },
            ),
            None => self.handler.handle(ctx),
        }
    }
}

/// Execute a full chain with `handler` as the innermost continuation.
/// An empty chain goes straight to the handler.
pub fn run_chain(
    chain: &[Arc<dyn Middleware>],
    handler: &dyn Handler,
    ctx: &mut RequestContext,
) -> anyhow::Result<Response> {
    Next { chain, handler }.run(ctx)
}

/// Reference to an interceptor as captured at registration time.
///
/// Named references are resolved against the router's middleware registry
/// when the table is built.
#[derive(Clone)]
pub enum MiddlewareRef {
    Direct(Arc<dyn Middleware>),
    Named(String),
}

impl MiddlewareRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl fmt::Debug for MiddlewareRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(_) => f.write_str("MiddlewareRef::Direct(..)"),
            Self::Named(name) => write!(f, "MiddlewareRef::Named({name})"),
        }
    }
}
