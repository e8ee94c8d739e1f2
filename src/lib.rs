//! # Switchyard
//!
//! **Switchyard** is a deterministic route matching and middleware
//! dispatch engine for Rust services, powered by the `may` coroutine
//! runtime.
//!
//! ## Overview
//!
//! The crate turns a registered set of path/method/domain route
//! definitions into a deterministic resolver for incoming requests, and
//! composes per-request interceptor chains — global, kind-default, group
//! and route-scoped — with short-circuiting continuation semantics.
//!
//! - **[`pattern`]** — path and domain template compilation: literal
//!   segments, `{param}` placeholders with optional regex constraints, a
//!   trailing `*` wildcard, and `{param}`/`*.` domain templates.
//! - **[`router`]** — route registration with groups (shared prefix,
//!   middleware, domain, name prefix), compiled into an immutable route
//!   table with registration-order matching, HEAD→GET fallback,
//!   synthesized OPTIONS responses and reverse URL generation.
//! - **[`middleware`]** — continuation-passing interceptors: each step
//!   receives the request and a [`Next`] continuation it may invoke, wrap
//!   or skip entirely.
//! - **[`dispatcher`]** — request dispatch over an atomically swappable
//!   table, with static-response serving, WebSocket upgrade hand-off,
//!   fallback and error handling, and cookie finalization.
//! - **[`cookies`]** — the pending-mutation cookie jar reconciled into the
//!   response after the chain completes.
//! - **[`server`]** — `may_minihttp` host adapter with `/health` and
//!   `/metrics` endpoints.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use switchyard::router::Router;
//! use switchyard::server::{AppService, HttpServer};
//! use switchyard::{Dispatcher, RequestContext, Response};
//!
//! let mut router = Router::new();
//! router
//!     .get("/users/{id}", |ctx: &mut RequestContext| {
//!         Ok(Response::json(200, serde_json::json!({ "id": ctx.param("id") })))
//!     })
//!     .constrain("id", r"\d+")
//!     .name("users.show");
//!
//! let dispatcher = Arc::new(Dispatcher::new(router.build()?));
//! let service = AppService::new(dispatcher);
//! let handle = HttpServer(service).start("0.0.0.0:8080")?;
//! handle.join().unwrap();
//! ```
//!
//! ## Lifecycle
//!
//! Registration happens before serving: a [`router::Router`] value
//! collects definitions and `build()` compiles them, failing fast on
//! malformed templates, broken constraints, unknown named
//! handlers/middleware and duplicate route names. The built table is
//! immutable; a live reload builds a replacement table and installs it
//! with one atomic pointer swap, so in-flight requests always observe a
//! consistent table.
//!
//! ## Runtime Considerations
//!
//! Switchyard runs on the `may` coroutine runtime, not tokio or
//! async-std. Each connection is served on a lightweight coroutine; the
//! coroutine stack size is configurable via the `SWYD_STACK_SIZE`
//! environment variable. Blocking operations inside handlers should use
//! `may`'s blocking facilities.

pub mod context;
pub mod cookies;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod ids;
pub mod middleware;
pub mod pattern;
pub mod response;
pub mod router;
pub mod runtime_config;
pub mod server;

pub use context::{HeaderVec, RequestContext, MAX_INLINE_HEADERS};
pub use cookies::{apply_cookie_changes, CookieJar, SetCookie};
pub use dispatcher::{Dispatched, Dispatcher};
pub use error::{RouterError, UrlError};
pub use handler::{Handler, HandlerRef, UpgradeHook};
pub use middleware::{Middleware, MiddlewareRef, Next};
pub use pattern::{ParamVec, PatternError, MAX_INLINE_PARAMS};
pub use response::Response;
pub use router::{
    CompiledRoute, Group, MethodSpec, Resolution, Route, RouteKind, RouteMatch, RouteTable, Router,
    RouterConfig,
};
