use http::Method;
use std::fmt;
use std::sync::Arc;

use crate::handler::{HandlerRef, UpgradeHook};
use crate::middleware::{Middleware, MiddlewareRef};

/// Which request methods a route admits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodSpec {
    /// Any method.
    Any,
    /// Exactly one method.
    Only(Method),
    /// One of a fixed set of methods.
    OneOf(Vec<Method>),
}

impl MethodSpec {
    #[must_use]
    pub fn admits(&self, method: &Method) -> bool {
        match self {
            Self::Any => true,
            Self::Only(m) => m == method,
            Self::OneOf(methods) => methods.contains(method),
        }
    }

    /// Representative method used when a synthetic request is needed
    /// (static response capture).
    #[must_use]
    pub(crate) fn representative(&self) -> Method {
        match self {
            Self::Only(m) => m.clone(),
            Self::OneOf(methods) => methods.first().cloned().unwrap_or(Method::GET),
            Self::Any => Method::GET,
        }
    }
}

/// Type tag selecting the default prefix and default middleware a route
/// inherits at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Web,
    Api,
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Web => write!(f, "web"),
            Self::Api => write!(f, "api"),
        }
    }
}

/// A route definition under construction.
///
/// Registration returns `&mut Route`, and everything that used to rely on
/// an implicit "current route" cursor — constraints, names, middleware,
/// domains, flags — attaches to that explicit handle instead.
pub struct Route {
    pub(crate) method: MethodSpec,
    pub(crate) template: String,
    pub(crate) handler: HandlerRef,
    pub(crate) kind: RouteKind,
    pub(crate) name: Option<String>,
    pub(crate) name_prefix: String,
    pub(crate) constraints: Vec<(String, String)>,
    pub(crate) domain: Option<String>,
    pub(crate) middleware: Vec<MiddlewareRef>,
    pub(crate) group_middleware: Vec<MiddlewareRef>,
    pub(crate) cache_static: bool,
    pub(crate) upgrade: Option<Arc<dyn UpgradeHook>>,
}

impl Route {
    /// Restrict what text a path parameter may match. `fragment` is a raw
    /// regex fragment; a broken fragment fails `build()`.
    pub fn constrain(
        &mut self,
        param: impl Into<String>,
        fragment: impl Into<String>,
    ) -> &mut Self {
        self.constraints.push((param.into(), fragment.into()));
        self
    }

    /// Name the route for reverse URL generation. Group name prefixes are
    /// prepended when the table is built.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Attach an interceptor to this route. Route middleware runs after
    /// global, kind-default and group middleware.
    pub fn middleware(&mut self, mw: Arc<dyn Middleware>) -> &mut Self {
        self.middleware.push(MiddlewareRef::Direct(mw));
        self
    }

    /// Attach an interceptor by registry name, resolved at `build()`.
    pub fn middleware_named(&mut self, name: impl Into<String>) -> &mut Self {
        self.middleware.push(MiddlewareRef::Named(name.into()));
        self
    }

    /// Bind the route to a domain template, overriding any group domain.
    pub fn domain(&mut self, template: impl Into<String>) -> &mut Self {
        self.domain = Some(template.into());
        self
    }

    /// Precompute this route's response at `build()` and serve the cached
    /// copy thereafter. Only parameterless routes qualify.
    pub fn cache_static(&mut self) -> &mut Self {
        self.cache_static = true;
        self
    }

    /// Attach a WebSocket upgrade hook; a successful upgrade bypasses the
    /// normal response path.
    pub fn upgrade(&mut self, hook: Arc<dyn UpgradeHook>) -> &mut Self {
        self.upgrade = Some(hook);
        self
    }

    /// The full, normalized path template (kind and group prefixes
    /// applied).
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("template", &self.template)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("domain", &self.domain)
            .finish_non_exhaustive()
    }
}
