use http::Method;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::route::{MethodSpec, Route, RouteKind};
use super::table::{CompiledRoute, RouteTable};
use crate::context::RequestContext;
use crate::error::RouterError;
use crate::handler::{Handler, HandlerRef};
use crate::middleware::{run_chain, Middleware, MiddlewareRef};
use crate::pattern::{DomainPattern, PathPattern};

/// Router-wide settings.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Prefix prepended to every [`RouteKind::Api`] route.
    pub api_prefix: String,
    /// Prefix prepended to every [`RouteKind::Web`] route.
    pub web_prefix: String,
    /// When true, a duplicate route name silently replaces the earlier
    /// mapping instead of failing `build()`.
    pub allow_name_replacement: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            api_prefix: "/api".to_string(),
            web_prefix: String::new(),
            allow_name_replacement: false,
        }
    }
}

/// Registration-time scope shared by every route registered within it:
/// a path prefix, middleware, a domain and/or a name prefix.
#[derive(Default)]
pub struct Group {
    prefix: String,
    middleware: Vec<MiddlewareRef>,
    domain: Option<String>,
    name_prefix: Option<String>,
}

impl Group {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn middleware(mut self, mw: Arc<dyn Middleware>) -> Self {
        self.middleware.push(MiddlewareRef::Direct(mw));
        self
    }

    #[must_use]
    pub fn middleware_named(mut self, name: impl Into<String>) -> Self {
        self.middleware.push(MiddlewareRef::Named(name.into()));
        self
    }

    #[must_use]
    pub fn domain(mut self, template: impl Into<String>) -> Self {
        self.domain = Some(template.into());
        self
    }

    #[must_use]
    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }
}

/// Route registry.
///
/// A plain value owned by the caller — no process-wide singleton state —
/// that collects route definitions during the registration phase and
/// [`build`](Router::build)s them into an immutable [`RouteTable`].
/// Multiple independent routers can coexist in one process.
#[derive(Default)]
pub struct Router {
    config: RouterConfig,
    routes: Vec<Route>,
    global: Vec<MiddlewareRef>,
    api_defaults: Vec<MiddlewareRef>,
    web_defaults: Vec<MiddlewareRef>,
    named_handlers: HashMap<String, Arc<dyn Handler>>,
    named_middleware: HashMap<String, Arc<dyn Middleware>>,
    fallback: Option<HandlerRef>,
    stack: Vec<Group>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Opt into last-registration-wins for duplicate route names.
    pub fn allow_name_replacement(&mut self, allow: bool) -> &mut Self {
        self.config.allow_name_replacement = allow;
        self
    }

    /// Add process-wide middleware, run first for every route.
    pub fn middleware(&mut self, mw: Arc<dyn Middleware>) -> &mut Self {
        self.global.push(MiddlewareRef::Direct(mw));
        self
    }

    /// Add process-wide middleware by registry name.
    pub fn middleware_named(&mut self, name: impl Into<String>) -> &mut Self {
        self.global.push(MiddlewareRef::Named(name.into()));
        self
    }

    /// Add default middleware for [`RouteKind::Api`] routes.
    pub fn api_middleware(&mut self, mw: Arc<dyn Middleware>) -> &mut Self {
        self.api_defaults.push(MiddlewareRef::Direct(mw));
        self
    }

    /// Add default middleware for [`RouteKind::Web`] routes.
    pub fn web_middleware(&mut self, mw: Arc<dyn Middleware>) -> &mut Self {
        self.web_defaults.push(MiddlewareRef::Direct(mw));
        self
    }

    /// Register a handler under a name so routes can reference it with
    /// [`route_named`](Self::route_named). Names are validated at
    /// `build()`.
    pub fn register_handler(
        &mut self,
        name: impl Into<String>,
        handler: impl Handler + 'static,
    ) -> &mut Self {
        self.named_handlers.insert(name.into(), Arc::new(handler));
        self
    }

    /// Register an interceptor under a name for `middleware_named`
    /// references. Names are validated at `build()`.
    pub fn register_middleware(
        &mut self,
        name: impl Into<String>,
        mw: Arc<dyn Middleware>,
    ) -> &mut Self {
        self.named_middleware.insert(name.into(), mw);
        self
    }

    /// Install the handler that runs, with empty parameters, when no route
    /// matches.
    pub fn fallback(&mut self, handler: impl Handler + 'static) -> &mut Self {
        self.fallback = Some(HandlerRef::Direct(Arc::new(handler)));
        self
    }

    /// Register routes within a group scope. Nested groups concatenate
    /// prefixes and middleware; a nested domain overrides the outer one.
    pub fn group(&mut self, group: Group, register: impl FnOnce(&mut Router)) {
        self.stack.push(group);
        register(self);
        self.stack.pop();
    }

    /// Full-form registration. Most callers use the method conveniences
    /// below; this is the single underlying entry point.
    pub fn register(
        &mut self,
        method: MethodSpec,
        kind: RouteKind,
        template: &str,
        handler: HandlerRef,
    ) -> &mut Route {
        let kind_prefix = match kind {
            RouteKind::Api => normalize_prefix(&self.config.api_prefix),
            RouteKind::Web => normalize_prefix(&self.config.web_prefix),
        };
        let mut full = kind_prefix;
        for frame in &self.stack {
            full.push_str(&normalize_prefix(&frame.prefix));
        }
        full.push_str(&normalize_template(template));
        let template = normalize_template(&full);

        let group_middleware: Vec<MiddlewareRef> = self
            .stack
            .iter()
            .flat_map(|frame| frame.middleware.iter().cloned())
            .collect();
        let domain = self
            .stack
            .iter()
            .rev()
            .find_map(|frame| frame.domain.clone());
        let name_prefix: String = self
            .stack
            .iter()
            .filter_map(|frame| frame.name_prefix.as_deref())
            .collect();

        self.routes.push(Route {
            method,
            template,
            handler,
            kind,
            name: None,
            name_prefix,
            constraints: Vec::new(),
            domain,
            middleware: Vec::new(),
            group_middleware,
            cache_static: false,
            upgrade: None,
        });
        self.routes.last_mut().expect("route just pushed")
    }

    pub fn get(&mut self, template: &str, handler: impl Handler + 'static) -> &mut Route {
        self.method_route(Method::GET, template, handler)
    }

    pub fn post(&mut self, template: &str, handler: impl Handler + 'static) -> &mut Route {
        self.method_route(Method::POST, template, handler)
    }

    pub fn put(&mut self, template: &str, handler: impl Handler + 'static) -> &mut Route {
        self.method_route(Method::PUT, template, handler)
    }

    pub fn delete(&mut self, template: &str, handler: impl Handler + 'static) -> &mut Route {
        self.method_route(Method::DELETE, template, handler)
    }

    pub fn patch(&mut self, template: &str, handler: impl Handler + 'static) -> &mut Route {
        self.method_route(Method::PATCH, template, handler)
    }

    pub fn head(&mut self, template: &str, handler: impl Handler + 'static) -> &mut Route {
        self.method_route(Method::HEAD, template, handler)
    }

    pub fn options(&mut self, template: &str, handler: impl Handler + 'static) -> &mut Route {
        self.method_route(Method::OPTIONS, template, handler)
    }

    /// Register a route admitting any method.
    pub fn any(&mut self, template: &str, handler: impl Handler + 'static) -> &mut Route {
        self.register(
            MethodSpec::Any,
            RouteKind::Web,
            template,
            HandlerRef::Direct(Arc::new(handler)),
        )
    }

    /// Register an API route; the configured API prefix is prepended and
    /// API default middleware applies.
    pub fn api(
        &mut self,
        method: Method,
        template: &str,
        handler: impl Handler + 'static,
    ) -> &mut Route {
        self.register(
            MethodSpec::Only(method),
            RouteKind::Api,
            template,
            HandlerRef::Direct(Arc::new(handler)),
        )
    }

    /// Register a route whose handler is looked up by name in the handler
    /// registry when the table is built.
    pub fn route_named(
        &mut self,
        method: Method,
        template: &str,
        handler_name: &str,
    ) -> &mut Route {
        self.register(
            MethodSpec::Only(method),
            RouteKind::Web,
            template,
            HandlerRef::named(handler_name),
        )
    }

    fn method_route(
        &mut self,
        method: Method,
        template: &str,
        handler: impl Handler + 'static,
    ) -> &mut Route {
        self.register(
            MethodSpec::Only(method),
            RouteKind::Web,
            template,
            HandlerRef::Direct(Arc::new(handler)),
        )
    }

    /// Compile every registered route into an immutable [`RouteTable`].
    ///
    /// This is where all deferred work happens and fails fast: pattern and
    /// constraint compilation, named handler/middleware resolution,
    /// name-map construction, and static response capture.
    pub fn build(self) -> Result<RouteTable, RouterError> {
        let Router {
            config,
            routes,
            global,
            api_defaults,
            web_defaults,
            named_handlers,
            named_middleware,
            fallback,
            stack: _,
        } = self;

        let resolve_middleware = |reference: &MiddlewareRef| -> Result<
            Arc<dyn Middleware>,
            RouterError,
        > {
            match reference {
                MiddlewareRef::Direct(mw) => Ok(mw.clone()),
                MiddlewareRef::Named(name) => named_middleware
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RouterError::UnknownMiddleware { name: name.clone() }),
            }
        };
        let resolve_handler = |reference: &HandlerRef| -> Result<Arc<dyn Handler>, RouterError> {
            match reference {
                HandlerRef::Direct(handler) => Ok(handler.clone()),
                HandlerRef::Named(name) => named_handlers
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RouterError::UnknownHandler { name: name.clone() }),
            }
        };

        let mut compiled: Vec<CompiledRoute> = Vec::with_capacity(routes.len());
        let mut by_name: HashMap<String, usize> = HashMap::new();
        let mut by_path: HashMap<String, Vec<usize>> = HashMap::new();

        for (idx, route) in routes.iter().enumerate() {
            let pattern = PathPattern::compile(&route.template, &route.constraints).map_err(
                |source| RouterError::Pattern {
                    template: route.template.clone(),
                    source,
                },
            )?;
            let domain = match &route.domain {
                Some(template) => Some(DomainPattern::compile(template).map_err(|source| {
                    RouterError::Domain {
                        template: template.clone(),
                        source,
                    }
                })?),
                None => None,
            };

            let kind_defaults = match route.kind {
                RouteKind::Api => &api_defaults,
                RouteKind::Web => &web_defaults,
            };
            let mut chain: Vec<Arc<dyn Middleware>> = Vec::with_capacity(
                global.len()
                    + kind_defaults.len()
                    + route.group_middleware.len()
                    + route.middleware.len(),
            );
            for reference in global
                .iter()
                .chain(kind_defaults.iter())
                .chain(route.group_middleware.iter())
                .chain(route.middleware.iter())
            {
                chain.push(resolve_middleware(reference)?);
            }

            let handler = resolve_handler(&route.handler)?;

            let name = route
                .name
                .as_ref()
                .map(|n| format!("{}{}", route.name_prefix, n));
            if let Some(name) = &name {
                if by_name.contains_key(name) && !config.allow_name_replacement {
                    return Err(RouterError::DuplicateName { name: name.clone() });
                }
                by_name.insert(name.clone(), idx);
            }
            by_path.entry(route.template.clone()).or_default().push(idx);

            compiled.push(CompiledRoute {
                method: route.method.clone(),
                template: route.template.clone(),
                kind: route.kind,
                name,
                pattern,
                domain,
                chain,
                handler,
                static_response: None,
                upgrade: route.upgrade.clone(),
            });
        }

        // Static response capture runs after all routes compiled, so a
        // capture handler observes the same chain it will bypass later.
        for (route, flagged) in compiled.iter_mut().zip(routes.iter().map(|r| r.cache_static)) {
            if !flagged {
                continue;
            }
            if route.pattern.has_params() {
                return Err(RouterError::StaticCache {
                    template: route.template.clone(),
                    reason: "path template has parameters".to_string(),
                });
            }
            if route.domain.as_ref().is_some_and(|d| d.has_params()) {
                return Err(RouterError::StaticCache {
                    template: route.template.clone(),
                    reason: "domain template has parameters".to_string(),
                });
            }
            let mut ctx = RequestContext::new(route.method.representative(), route.template.clone());
            let response = run_chain(&route.chain, route.handler.as_ref(), &mut ctx).map_err(
                |cause| RouterError::StaticCapture {
                    template: route.template.clone(),
                    cause,
                },
            )?;
            route.static_response = Some(response);
        }

        let fallback = match &fallback {
            Some(reference) => Some(resolve_handler(reference)?),
            None => None,
        };

        let routes_summary: Vec<String> = compiled
            .iter()
            .take(10)
            .map(|route| format!("{:?} {}", route.method, route.template))
            .collect();
        info!(
            routes_count = compiled.len(),
            named_count = by_name.len(),
            routes_summary = ?routes_summary,
            "Route table built"
        );

        Ok(RouteTable::new(
            compiled.into_iter().map(Arc::new).collect(),
            by_path,
            by_name,
            fallback,
        ))
    }
}

/// Normalize a template: leading `/`, no trailing `/` except the root.
pub(crate) fn normalize_template(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 1);
    if !raw.starts_with('/') {
        out.push('/');
    }
    out.push_str(raw);
    while out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

/// Normalize a prefix for string concatenation: a normalized template,
/// with the bare root collapsing to the empty string.
fn normalize_prefix(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let normalized = normalize_template(raw);
    if normalized == "/" {
        String::new()
    } else {
        normalized
    }
}
