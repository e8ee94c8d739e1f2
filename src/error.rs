use thiserror::Error;

use crate::pattern::PatternError;

/// Errors raised while registering routes or building the route table.
///
/// Every variant is a registration/deployment defect that fails `build()`;
/// none of them can occur during request handling.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("invalid path template `{template}`: {source}")]
    Pattern {
        template: String,
        #[source]
        source: PatternError,
    },

    #[error("invalid domain template `{template}`: {source}")]
    Domain {
        template: String,
        #[source]
        source: PatternError,
    },

    #[error("duplicate route name `{name}`")]
    DuplicateName { name: String },

    #[error("no handler registered under name `{name}`")]
    UnknownHandler { name: String },

    #[error("no middleware registered under name `{name}`")]
    UnknownMiddleware { name: String },

    #[error("route `{template}` cannot cache a static response: {reason}")]
    StaticCache { template: String, reason: String },

    // anyhow::Error is not a std Error, so it is carried for Display only.
    #[error("static capture for route `{template}` failed: {cause}")]
    StaticCapture { template: String, cause: anyhow::Error },
}

/// Errors raised by reverse URL generation.
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("no route named `{name}`")]
    UnknownRoute { name: String },

    #[error("route `{route}` requires parameter `{param}`")]
    MissingParam { route: String, param: String },
}
