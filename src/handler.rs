use std::fmt;
use std::sync::Arc;

use crate::context::RequestContext;
use crate::response::Response;

/// A route endpoint.
///
/// Anything that can turn a request context into a response: plain
/// functions and closures get this for free through the blanket impl, and
/// stateful endpoints implement it directly on their own type.
pub trait Handler: Send + Sync {
    fn handle(&self, ctx: &mut RequestContext) -> anyhow::Result<Response>;
}

impl<F> Handler for F
where
    F: Fn(&mut RequestContext) -> anyhow::Result<Response> + Send + Sync,
{
    fn handle(&self, ctx: &mut RequestContext) -> anyhow::Result<Response> {
        self(ctx)
    }
}

/// Reference to a handler as captured at registration time.
///
/// Named references are resolved against the router's handler registry when
/// the table is built; an unknown name fails `build()` rather than the
/// first request that hits the route.
#[derive(Clone)]
pub enum HandlerRef {
    Direct(Arc<dyn Handler>),
    Named(String),
}

impl HandlerRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(_) => f.write_str("HandlerRef::Direct(..)"),
            Self::Named(name) => write!(f, "HandlerRef::Named({name})"),
        }
    }
}

/// Decision point for WebSocket upgrades.
///
/// When a matched route carries a hook and `try_upgrade` returns `true`,
/// the connection has been handed off and the dispatcher's normal response
/// path is bypassed entirely.
pub trait UpgradeHook: Send + Sync {
    fn try_upgrade(&self, ctx: &mut RequestContext) -> bool;
}
