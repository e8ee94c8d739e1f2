use arc_swap::ArcSwap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::context::RequestContext;
use crate::cookies::apply_cookie_changes;
use crate::middleware::run_chain;
use crate::response::Response;
use crate::router::{Resolution, RouteTable};

/// Host-level error renderer, run when nothing in the chain caught an
/// error.
pub type ErrorHandler = dyn Fn(&anyhow::Error) -> Response + Send + Sync;

/// Outcome of a dispatch.
#[derive(Debug)]
pub enum Dispatched {
    /// Normal response, cookie mutations applied.
    Response(Response),
    /// A WebSocket upgrade hook took the connection; nothing to write.
    Upgraded,
}

/// Request dispatcher.
///
/// A plain value owned by the caller. The route table is shared through
/// `ArcSwap` so reloads are a single pointer store; the dispatcher itself
/// performs no blocking operations.
pub struct Dispatcher {
    table: ArcSwap<RouteTable>,
    error_handler: Option<Arc<ErrorHandler>>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(table: RouteTable) -> Self {
        Self {
            table: ArcSwap::from_pointee(table),
            error_handler: None,
        }
    }

    /// Atomically replace the route table. In-flight requests keep the
    /// table they loaded at dispatch entry; new requests see the
    /// replacement.
    pub fn install(&self, table: RouteTable) {
        info!(routes_count = table.len(), "Route table swapped");
        self.table.store(Arc::new(table));
    }

    /// The currently installed table.
    #[must_use]
    pub fn table(&self) -> Arc<RouteTable> {
        self.table.load_full()
    }

    /// Install the error renderer run for uncaught chain errors. Without
    /// one, clients get a generic 500 with no internal detail.
    pub fn set_error_handler(
        &mut self,
        handler: impl Fn(&anyhow::Error) -> Response + Send + Sync + 'static,
    ) {
        self.error_handler = Some(Arc::new(handler));
    }

    /// Dispatch one request.
    pub fn dispatch(&self, ctx: &mut RequestContext) -> Dispatched {
        let table = self.table.load_full();
        let start = Instant::now();
        debug!(
            request_id = %ctx.request_id,
            method = %ctx.method,
            path = %ctx.path,
            "Dispatch start"
        );

        let mut response = match table.resolve(&ctx.method, &ctx.path, ctx.host.as_deref()) {
            Resolution::Matched(matched) => {
                let route = matched.route.clone();
                ctx.params = matched.params;
                ctx.route = Some(route.clone());

                if let Some(hook) = &route.upgrade {
                    if hook.try_upgrade(ctx) {
                        info!(
                            request_id = %ctx.request_id,
                            route = %route.template,
                            "Connection upgraded"
                        );
                        return Dispatched::Upgraded;
                    }
                }

                if let Some(cached) = &route.static_response {
                    debug!(route = %route.template, "Serving precomputed static response");
                    cached.clone()
                } else {
                    self.run_guarded(ctx, |ctx| {
                        run_chain(&route.chain, route.handler.as_ref(), ctx)
                    })
                }
            }
            Resolution::Options => Response::no_content(),
            Resolution::NotFound => match table.fallback() {
                Some(fallback) => {
                    let fallback = fallback.clone();
                    self.run_guarded(ctx, |ctx| fallback.handle(ctx))
                }
                None => Response::error(404, "Not Found"),
            },
        };

        // Pending cookie mutations are reconciled whatever produced the
        // response: handler, short-circuit, fallback or error path.
        apply_cookie_changes(&mut response, &ctx.cookies);

        info!(
            request_id = %ctx.request_id,
            status = response.status,
            latency_ms = start.elapsed().as_millis() as u64,
            "Dispatch complete"
        );
        Dispatched::Response(response)
    }

    fn run_guarded<F>(&self, ctx: &mut RequestContext, run: F) -> Response
    where
        F: FnOnce(&mut RequestContext) -> anyhow::Result<Response>,
    {
        let request_id = ctx.request_id;
        match std::panic::catch_unwind(AssertUnwindSafe(|| run(ctx))) {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                error!(request_id = %request_id, error = %err, "Request chain failed");
                match &self.error_handler {
                    Some(handler) => handler(&err),
                    None => Response::error(500, "Internal Server Error"),
                }
            }
            Err(panic) => {
                error!(
                    request_id = %request_id,
                    panic_message = %format!("{panic:?}"),
                    "Handler panicked"
                );
                Response::error(500, "Internal Server Error")
            }
        }
    }
}
