use http::Method;
use may_minihttp::{HttpService, Request, Response as HttpResponse};
use std::io;
use std::sync::Arc;

use super::request::parse_request;
use super::response::{write_json_error, write_response};
use crate::context::RequestContext;
use crate::cookies::CookieJar;
use crate::dispatcher::{Dispatched, Dispatcher};
use crate::ids::RequestId;
use crate::middleware::MetricsMiddleware;
use crate::pattern::ParamVec;

/// HTTP service gluing parsed requests to the dispatcher.
///
/// Built-in endpoints: `GET /health` and, when a metrics handle is
/// attached, `GET /metrics` in Prometheus text format.
#[derive(Clone)]
pub struct AppService {
    pub dispatcher: Arc<Dispatcher>,
    pub metrics: Option<Arc<MetricsMiddleware>>,
}

impl AppService {
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            metrics: None,
        }
    }

    /// Attach the metrics handle surfaced at `/metrics`. Pass the same
    /// `Arc` that was registered as middleware on the router.
    pub fn set_metrics(&mut self, metrics: Arc<MetricsMiddleware>) {
        self.metrics = Some(metrics);
    }
}

/// Basic health check endpoint returning `{ "status": "ok" }`.
pub fn health_endpoint(res: &mut HttpResponse) -> io::Result<()> {
    write_response(
        res,
        crate::Response::json(200, serde_json::json!({ "status": "ok" })),
    );
    Ok(())
}

/// Metrics endpoint returning Prometheus text format statistics.
pub fn metrics_endpoint(res: &mut HttpResponse, metrics: &MetricsMiddleware) -> io::Result<()> {
    let body = format!(
        "# HELP switchyard_requests_total Total number of dispatched requests\n\
         # TYPE switchyard_requests_total counter\n\
         switchyard_requests_total {}\n\
         # HELP switchyard_request_latency_seconds Average request latency in seconds\n\
         # TYPE switchyard_request_latency_seconds gauge\n\
         switchyard_request_latency_seconds {}\n\
         # HELP switchyard_errors_total Requests that failed with an error or 5xx\n\
         # TYPE switchyard_errors_total counter\n\
         switchyard_errors_total {}\n",
        metrics.request_count(),
        metrics.average_latency().as_secs_f64(),
        metrics.error_count()
    );
    res.status_code(200, "OK");
    res.header("Content-Type: text/plain; version=0.0.4");
    res.body_vec(body.into_bytes());
    Ok(())
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut HttpResponse) -> io::Result<()> {
        let parsed = parse_request(req);

        if parsed.method == "GET" && parsed.path == "/health" {
            return health_endpoint(res);
        }
        if parsed.method == "GET" && parsed.path == "/metrics" {
            if let Some(metrics) = &self.metrics {
                return metrics_endpoint(res, metrics);
            }
            write_json_error(res, 404, serde_json::json!({ "error": "Not Found" }));
            return Ok(());
        }

        let method: Method = match parsed.method.parse() {
            Ok(method) => method,
            Err(_) => {
                write_json_error(res, 400, serde_json::json!({ "error": "Bad Request" }));
                return Ok(());
            }
        };

        let request_id = RequestId::from_header_or_new(
            parsed
                .headers
                .iter()
                .find(|(k, _)| k.as_ref() == "x-request-id")
                .map(|(_, v)| v.as_str()),
        );

        let mut ctx = RequestContext {
            request_id,
            method,
            path: parsed.path,
            host: parsed.host,
            headers: parsed.headers,
            query_params: parsed.query_params,
            body: parsed.body,
            params: ParamVec::new(),
            cookies: CookieJar::from_incoming(parsed.cookies),
            route: None,
        };

        match self.dispatcher.dispatch(&mut ctx) {
            Dispatched::Response(response) => write_response(res, response),
            // The upgrade hook owns the connection now; write nothing.
            Dispatched::Upgraded => {}
        }
        Ok(())
    }
}
