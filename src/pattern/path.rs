use regex::Regex;
use std::sync::Arc;

use super::{valid_param_name, ParamVec, PatternError};

/// Reserved parameter name under which a trailing `*` captures the
/// remainder of the path.
pub const WILDCARD_PARAM: &str = "wildcard";

/// Regex fragment used for parameters without an explicit constraint:
/// one or more characters excluding the segment separator.
const DEFAULT_SEGMENT: &str = "[^/]+";

/// One classified segment of a compiled path template.
#[derive(Debug, Clone)]
pub enum Segment {
    /// Fixed text matched verbatim.
    Literal(String),
    /// A `{name}` placeholder.
    Param { name: Arc<str> },
    /// Trailing `*` capturing the rest of the path.
    Wildcard,
}

/// Compiled form of a path template.
///
/// Produced once per template at registration; matching a concrete path is
/// a single anchored regex test plus named-group extraction.
///
/// Parameters are captured through generated group names (`p0`, `p1`, …)
/// so that capture groups inside user constraint fragments cannot shift
/// the extraction.
#[derive(Debug, Clone)]
pub struct PathPattern {
    template: String,
    segments: Vec<Segment>,
    regex: Regex,
    params: Vec<Arc<str>>,
    groups: Vec<String>,
    wildcard: bool,
}

impl PathPattern {
    /// Compile a normalized path template against a constraint map.
    ///
    /// `constraints` pairs parameter names with raw regex fragments; a
    /// parameter without an entry falls back to `[^/]+`. All syntax errors
    /// are reported here, never at match time.
    pub fn compile(template: &str, constraints: &[(String, String)]) -> Result<Self, PatternError> {
        if template == "/" {
            return Ok(Self {
                template: template.to_string(),
                segments: Vec::new(),
                regex: Regex::new("^/$")?,
                params: Vec::new(),
                groups: Vec::new(),
                wildcard: false,
            });
        }

        let raw_segments: Vec<&str> = template.split('/').skip(1).collect();
        let last = raw_segments.len().saturating_sub(1);

        let mut segments = Vec::with_capacity(raw_segments.len());
        let mut params: Vec<Arc<str>> = Vec::new();
        let mut pattern = String::with_capacity(template.len() + 16);
        pattern.push('^');
        let mut wildcard = false;

        for (idx, segment) in raw_segments.iter().enumerate() {
            if *segment == "*" {
                if idx != last {
                    return Err(PatternError::WildcardPosition);
                }
                // The slash is folded into the optional group so the bare
                // prefix also matches, with an empty capture.
                pattern.push_str(&format!("(?:/(?P<p{}>.*))?", params.len()));
                params.push(Arc::from(WILDCARD_PARAM));
                segments.push(Segment::Wildcard);
                wildcard = true;
            } else if let Some(inner) = segment.strip_prefix('{') {
                let name = inner.strip_suffix('}').ok_or_else(|| {
                    PatternError::UnterminatedBrace {
                        segment: segment.to_string(),
                    }
                })?;
                if name.is_empty() {
                    return Err(PatternError::EmptyParam {
                        segment: segment.to_string(),
                    });
                }
                if !valid_param_name(name) {
                    return Err(PatternError::InvalidParamName {
                        name: name.to_string(),
                    });
                }
                if params.iter().any(|p| p.as_ref() == name) {
                    return Err(PatternError::DuplicateParam {
                        name: name.to_string(),
                    });
                }
                let fragment = constraints
                    .iter()
                    .find(|(n, _)| n == name)
                    .map(|(_, f)| f.as_str())
                    .unwrap_or(DEFAULT_SEGMENT);
                // Compile the fragment on its own first so a broken
                // constraint is reported against its parameter.
                if let Err(source) = Regex::new(&format!("^(?:{fragment})$")) {
                    return Err(PatternError::Constraint {
                        param: name.to_string(),
                        source,
                    });
                }
                pattern.push_str(&format!("/(?P<p{}>{fragment})", params.len()));
                params.push(Arc::from(name));
                segments.push(Segment::Param {
                    name: Arc::from(name),
                });
            } else if segment.contains('{') || segment.contains('}') {
                return Err(PatternError::MalformedSegment {
                    segment: segment.to_string(),
                });
            } else {
                pattern.push('/');
                pattern.push_str(&regex::escape(segment));
                segments.push(Segment::Literal(segment.to_string()));
            }
        }

        pattern.push('$');
        let regex = Regex::new(&pattern)?;
        let groups = (0..params.len()).map(|i| format!("p{i}")).collect();

        Ok(Self {
            template: template.to_string(),
            segments,
            regex,
            params,
            groups,
            wildcard,
        })
    }

    /// Test a concrete path, extracting parameter values on success.
    ///
    /// A wildcard that matched nothing yields an empty string under
    /// [`WILDCARD_PARAM`].
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<ParamVec> {
        let caps = self.regex.captures(path)?;
        let mut out = ParamVec::new();
        for (name, group) in self.params.iter().zip(&self.groups) {
            let value = caps
                .name(group)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            out.push((name.clone(), value));
        }
        Some(out)
    }

    /// The template this pattern was compiled from.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The classified segments, in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Ordered parameter names captured by this pattern.
    #[must_use]
    pub fn param_names(&self) -> &[Arc<str>] {
        &self.params
    }

    #[must_use]
    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }

    /// Whether the template ends in a `*` wildcard.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }
}
