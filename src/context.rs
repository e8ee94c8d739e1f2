use http::Method;
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

use crate::cookies::CookieJar;
use crate::ids::RequestId;
use crate::pattern::ParamVec;
use crate::router::CompiledRoute;

/// Maximum inline headers before heap allocation.
/// Most requests carry ≤16 headers, so the common case stays on the stack.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header/cookie storage.
///
/// Header names use `Arc<str>` because the common names repeat across
/// requests and cloning an `Arc` is an O(1) refcount bump; values are
/// per-request data.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// The enhanced request handed to middleware and handlers.
///
/// Carries the parsed request plus everything the engine attaches on the
/// way in: extracted route parameters, the cookie jar with its pending
/// mutations, and (once matched) the route itself.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique request ID for tracing and correlation.
    pub request_id: RequestId,
    /// HTTP method.
    pub method: Method,
    /// Request path without the query string.
    pub path: String,
    /// Request host, lower-cased and without any `:port` suffix.
    pub host: Option<String>,
    /// HTTP headers (lower-cased names).
    pub headers: HeaderVec,
    /// Parsed query string parameters.
    pub query_params: ParamVec,
    /// Request body parsed as JSON, if present.
    pub body: Option<Value>,
    /// Parameters extracted from the matched route: domain parameters
    /// first, path parameters after. Lookups are last-write-wins, so a
    /// path parameter shadows a domain parameter of the same name.
    pub params: ParamVec,
    /// Cookie jar with pending-mutation tracking; mutations are reconciled
    /// into the response by the finalizer after the chain completes.
    pub cookies: CookieJar,
    /// The matched route, set by the dispatcher before the chain runs.
    pub route: Option<Arc<CompiledRoute>>,
}

impl RequestContext {
    /// Build a minimal context. Host, headers, body and cookies start
    /// empty; the dispatcher fills in parameters and the matched route.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            path: path.into(),
            host: None,
            headers: HeaderVec::new(),
            query_params: ParamVec::new(),
            body: None,
            params: ParamVec::new(),
            cookies: CookieJar::default(),
            route: None,
        }
    }

    /// Get a route parameter by name.
    ///
    /// Uses last-write-wins: path parameters are pushed after domain
    /// parameters, so on a name collision the path value wins.
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a query parameter by name (last occurrence wins).
    #[inline]
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a header by name (case-insensitive per RFC 7230).
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get a cookie by name, pending mutations included.
    #[inline]
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name)
    }

    /// Convert route parameters to a `HashMap`.
    /// Note: this allocates — use [`param`](Self::param) in hot paths.
    #[must_use]
    pub fn params_map(&self) -> HashMap<String, String> {
        self.params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}
