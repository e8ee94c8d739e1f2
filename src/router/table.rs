use http::Method;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use super::route::{MethodSpec, RouteKind};
use crate::error::UrlError;
use crate::handler::{Handler, UpgradeHook};
use crate::middleware::Middleware;
use crate::pattern::{DomainPattern, ParamVec, PathPattern, Segment, WILDCARD_PARAM};
use crate::response::Response;

/// A fully compiled route: pattern, domain, resolved chain and handler.
///
/// Immutable once the table is built; request handling only reads it.
pub struct CompiledRoute {
    pub method: MethodSpec,
    pub template: String,
    pub kind: RouteKind,
    pub name: Option<String>,
    pub pattern: PathPattern,
    pub domain: Option<DomainPattern>,
    /// Full interceptor chain: global, kind defaults, group
    /// (outermost→innermost), route — in that order.
    pub chain: Vec<Arc<dyn Middleware>>,
    pub handler: Arc<dyn Handler>,
    /// Response captured at build time for `cache_static` routes.
    pub static_response: Option<Response>,
    pub upgrade: Option<Arc<dyn UpgradeHook>>,
}

impl fmt::Debug for CompiledRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRoute")
            .field("method", &self.method)
            .field("template", &self.template)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("chain_len", &self.chain.len())
            .field("static", &self.static_response.is_some())
            .finish_non_exhaustive()
    }
}

/// Result of successfully matching a request against the table.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched route.
    pub route: Arc<CompiledRoute>,
    /// Merged parameters: domain parameters first, path parameters after,
    /// so last-write-wins lookups give path parameters precedence.
    pub params: ParamVec,
}

/// Outcome of route resolution.
#[derive(Debug)]
pub enum Resolution {
    Matched(RouteMatch),
    /// `OPTIONS` request against a path that exists under another method;
    /// the dispatcher answers with an empty 204 without naming a handler.
    Options,
    NotFound,
}

/// Immutable, compiled routing table.
///
/// Built once by [`Router::build`](super::Router::build) and shared behind
/// an `Arc`; a reload builds a complete replacement table and swaps the
/// pointer, so in-flight requests always observe one consistent table.
pub struct RouteTable {
    routes: Vec<Arc<CompiledRoute>>,
    by_path: HashMap<String, Vec<usize>>,
    by_name: HashMap<String, usize>,
    fallback: Option<Arc<dyn Handler>>,
}

impl RouteTable {
    pub(crate) fn new(
        routes: Vec<Arc<CompiledRoute>>,
        by_path: HashMap<String, Vec<usize>>,
        by_name: HashMap<String, usize>,
        fallback: Option<Arc<dyn Handler>>,
    ) -> Self {
        Self {
            routes,
            by_path,
            by_name,
            fallback,
        }
    }

    /// Resolve a request to a route.
    ///
    /// Non-wildcard routes are scanned first, in registration order — the
    /// first full match wins, so registration order is the tie-break for
    /// overlapping patterns. Wildcard routes only match when no
    /// non-wildcard route claimed the path. A `HEAD` request with no
    /// explicit HEAD route falls back to the corresponding `GET` route,
    /// and an unhandled `OPTIONS` request synthesizes a 204 when the path
    /// exists under any method.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str, host: Option<&str>) -> Resolution {
        debug!(method = %method, path = %path, host = ?host, "Route match attempt");

        if let Some(matched) = self.scan(method, path, host) {
            debug!(
                method = %method,
                path = %path,
                route = %matched.route.template,
                params = ?matched.params,
                "Route matched"
            );
            return Resolution::Matched(matched);
        }

        if *method == Method::HEAD {
            if let Some(matched) = self.scan(&Method::GET, path, host) {
                debug!(path = %path, route = %matched.route.template, "HEAD served by GET route");
                return Resolution::Matched(matched);
            }
        }

        if *method == Method::OPTIONS && self.path_exists(path, host) {
            debug!(path = %path, "OPTIONS synthesized for existing path");
            return Resolution::Options;
        }

        warn!(method = %method, path = %path, "No route matched");
        Resolution::NotFound
    }

    fn scan(&self, method: &Method, path: &str, host: Option<&str>) -> Option<RouteMatch> {
        for wildcard_pass in [false, true] {
            for route in &self.routes {
                if route.pattern.is_wildcard() != wildcard_pass {
                    continue;
                }
                if !route.method.admits(method) {
                    continue;
                }
                let mut params = ParamVec::new();
                if let Some(domain) = &route.domain {
                    match host.and_then(|h| domain.match_host(h)) {
                        Some(domain_params) => params.extend(domain_params),
                        None => continue,
                    }
                }
                if let Some(path_params) = route.pattern.match_path(path) {
                    params.extend(path_params);
                    return Some(RouteMatch {
                        route: route.clone(),
                        params,
                    });
                }
            }
        }
        None
    }

    fn path_exists(&self, path: &str, host: Option<&str>) -> bool {
        self.routes.iter().any(|route| {
            let domain_ok = match &route.domain {
                Some(domain) => host.is_some_and(|h| domain.match_host(h).is_some()),
                None => true,
            };
            domain_ok && route.pattern.match_path(path).is_some()
        })
    }

    /// Generate the path for a named route by substituting parameters.
    ///
    /// Fails clearly when the name is unknown or a required parameter is
    /// missing — never produces a malformed URL.
    pub fn route_url(&self, name: &str, params: &[(&str, &str)]) -> Result<String, UrlError> {
        let idx = self
            .by_name
            .get(name)
            .ok_or_else(|| UrlError::UnknownRoute {
                name: name.to_string(),
            })?;
        let route = &self.routes[*idx];

        let lookup = |param: &str| -> Result<&str, UrlError> {
            params
                .iter()
                .find(|(k, _)| *k == param)
                .map(|(_, v)| *v)
                .ok_or_else(|| UrlError::MissingParam {
                    route: name.to_string(),
                    param: param.to_string(),
                })
        };

        let mut url = String::new();
        for segment in route.pattern.segments() {
            match segment {
                Segment::Literal(text) => {
                    url.push('/');
                    url.push_str(text);
                }
                Segment::Param { name: param } => {
                    let value = lookup(param.as_ref())?;
                    url.push('/');
                    url.push_str(value);
                }
                Segment::Wildcard => {
                    let value = lookup(WILDCARD_PARAM)?;
                    if !value.is_empty() {
                        url.push('/');
                        url.push_str(value);
                    }
                }
            }
        }
        if url.is_empty() {
            url.push('/');
        }
        Ok(url)
    }

    /// Look up a route by its registered name.
    #[must_use]
    pub fn route_by_name(&self, name: &str) -> Option<&Arc<CompiledRoute>> {
        self.by_name.get(name).map(|idx| &self.routes[*idx])
    }

    /// All routes registered under one normalized path template, in
    /// registration order — the method-multiplexing view of the table.
    #[must_use]
    pub fn routes_for_template(&self, template: &str) -> Vec<&Arc<CompiledRoute>> {
        self.by_path
            .get(template)
            .map(|indices| indices.iter().map(|idx| &self.routes[*idx]).collect())
            .unwrap_or_default()
    }

    /// The fallback handler, if one was registered.
    #[must_use]
    pub fn fallback(&self) -> Option<&Arc<dyn Handler>> {
        self.fallback.as_ref()
    }

    /// All routes in registration order.
    #[must_use]
    pub fn routes(&self) -> &[Arc<CompiledRoute>] {
        &self.routes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.routes.len())
            .field("named", &self.by_name.len())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
