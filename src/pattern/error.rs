use thiserror::Error;

/// Errors raised while compiling a path or domain template.
///
/// All of these surface at registration time; a template that compiles
/// never fails at request time.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("segment `{segment}` mixes literal text with parameter braces")]
    MalformedSegment { segment: String },

    #[error("segment `{segment}` has an unterminated `{{`")]
    UnterminatedBrace { segment: String },

    #[error("segment `{segment}` declares an empty parameter name")]
    EmptyParam { segment: String },

    #[error("invalid parameter name `{name}`")]
    InvalidParamName { name: String },

    #[error("duplicate parameter name `{name}` in one template")]
    DuplicateParam { name: String },

    #[error("`*` is only valid as the final path segment")]
    WildcardPosition,

    #[error("`*` is only valid as the leading domain label")]
    DomainWildcardPosition,

    #[error("empty label in domain template")]
    EmptyDomainLabel,

    #[error("constraint for `{param}` is not a valid regex: {source}")]
    Constraint {
        param: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to compile pattern: {0}")]
    Compile(#[from] regex::Error),
}
