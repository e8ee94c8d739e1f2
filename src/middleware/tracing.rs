use tracing::{error, info, info_span};

use super::{Middleware, Next};
use crate::context::RequestContext;
use crate::response::Response;

/// Wraps the rest of the chain in a per-request `info_span` carrying the
/// request id, method and path.
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn handle(&self, ctx: &mut RequestContext, next: Next<'_>) -> anyhow::Result<Response> {
        let span = info_span!(
            "request",
            request_id = %ctx.request_id,
            method = %ctx.method,
            path = %ctx.path
        );
        let _guard = span.enter();
        let result = next.run(ctx);
        match &result {
            Ok(response) => info!(status = response.status, "request complete"),
            Err(err) => error!(error = %err, "request failed"),
        }
        result
    }
}
