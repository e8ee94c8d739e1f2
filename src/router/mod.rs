//! # Router Module
//!
//! Route registration, grouping and resolution.
//!
//! ## Two-phase lifecycle
//!
//! 1. **Registration**: a [`Router`] value collects route definitions.
//!    Registration returns a `&mut Route` handle on which constraints,
//!    names, middleware, domains and flags are attached. Groups contribute
//!    path prefixes, middleware, domains and name prefixes to every route
//!    registered inside them.
//!
//! 2. **Matching**: [`Router::build`] compiles everything into an
//!    immutable [`RouteTable`]. Resolution walks the routes in
//!    registration order — the first full match wins, which makes
//!    registration order the tie-break for overlapping patterns. A
//!    trailing `*` wildcard route only matches when no non-wildcard route
//!    claimed the path first.
//!
//! ## Example
//!
//! ```rust,ignore
//! use switchyard::router::{Group, Router};
//! use switchyard::Response;
//!
//! let mut router = Router::new();
//! router
//!     .get("/users/{id}", |ctx: &mut switchyard::RequestContext| {
//!         Ok(Response::json(200, serde_json::json!({ "id": ctx.param("id") })))
//!     })
//!     .constrain("id", r"\d+")
//!     .name("users.show");
//!
//! router.group(Group::new().prefix("/admin").name_prefix("admin."), |r| {
//!     r.get("/settings", settings_handler).name("settings");
//! });
//!
//! let table = router.build()?;
//! ```
//!
//! Everything that can go wrong — malformed templates, broken constraint
//! regexes, unknown handler or middleware names, duplicate route names —
//! fails `build()`, never a request.

mod registry;
mod route;
mod table;

pub use registry::{Group, Router, RouterConfig};
pub use route::{MethodSpec, Route, RouteKind};
pub use table::{CompiledRoute, Resolution, RouteMatch, RouteTable};
