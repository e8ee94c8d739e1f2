//! # Pattern Module
//!
//! Template compilation for path and domain matching.
//!
//! Path templates mix literal segments, `{name}` parameters and an optional
//! trailing `*` wildcard:
//!
//! ```text
//! /users/{id}/posts/{post_id}
//! /assets/*
//! ```
//!
//! Domain templates use the same placeholder syntax with `.` as the
//! separator, plus a leading `*.` prefix wildcard:
//!
//! ```text
//! {tenant}.example.com
//! *.example.com
//! ```
//!
//! Templates are compiled once, at registration time, into anchored regex
//! matchers. Every syntax problem — unterminated braces, duplicate parameter
//! names, a misplaced `*`, a constraint fragment that is not a valid regex —
//! is a [`PatternError`] raised during compilation, never a per-request
//! failure.
//!
//! Parameter constraints are raw regex fragments keyed by parameter name;
//! a parameter without a constraint matches one or more characters excluding
//! the separator.

mod domain;
mod error;
mod path;

pub use domain::DomainPattern;
pub use error::PatternError;
pub use path::{PathPattern, Segment, WILDCARD_PARAM};

use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum number of extracted parameters before heap allocation.
/// Most routes have ≤4 path params, so the common case stays on the stack.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the match hot path.
///
/// Parameter names are `Arc<str>` because they come from the compiled
/// pattern (known at registration time) and cloning an `Arc` is an O(1)
/// refcount bump; values are per-request strings extracted from the URL or
/// host.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

static PARAM_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-Za-z_][A-Za-z0-9_]*$").expect("param name regex"));

pub(crate) fn valid_param_name(name: &str) -> bool {
    PARAM_NAME.is_match(name)
}
