use regex::Regex;
use std::sync::Arc;

use super::{valid_param_name, ParamVec, PatternError};

/// Compiled form of a domain template.
///
/// Labels are dot-separated; `{param}` captures one label, and a leading
/// `*.` matches one or more labels without capturing. Matching is
/// case-insensitive and ignores any `:port` suffix on the host.
#[derive(Debug, Clone)]
pub struct DomainPattern {
    template: String,
    regex: Regex,
    params: Vec<Arc<str>>,
    groups: Vec<String>,
}

impl DomainPattern {
    pub fn compile(template: &str) -> Result<Self, PatternError> {
        let lowered = template.to_ascii_lowercase();
        let labels: Vec<&str> = lowered.split('.').collect();
        let last = labels.len().saturating_sub(1);

        let mut params: Vec<Arc<str>> = Vec::new();
        let mut pattern = String::with_capacity(lowered.len() + 16);
        pattern.push('^');

        for (idx, label) in labels.iter().enumerate() {
            if *label == "*" {
                if idx != 0 {
                    return Err(PatternError::DomainWildcardPosition);
                }
                pattern.push_str("[^.]+(?:\\.[^.]+)*");
            } else if let Some(inner) = label.strip_prefix('{') {
                let name = inner.strip_suffix('}').ok_or_else(|| {
                    PatternError::UnterminatedBrace {
                        segment: label.to_string(),
                    }
                })?;
                if name.is_empty() {
                    return Err(PatternError::EmptyParam {
                        segment: label.to_string(),
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
                pattern.push_str(&format!("(?P<p{}>[^.]+)", params.len()));
                params.push(Arc::from(name));
            } else if label.is_empty() {
                return Err(PatternError::EmptyDomainLabel);
            } else if label.contains('{') || label.contains('}') {
                return Err(PatternError::MalformedSegment {
                    segment: label.to_string(),
                });
            } else {
                pattern.push_str(&regex::escape(label));
            }
            if idx != last {
                pattern.push_str("\\.");
            }
        }

        pattern.push('$');
        let regex = Regex::new(&pattern)?;
        let groups = (0..params.len()).map(|i| format!("p{i}")).collect();

        Ok(Self {
            template: template.to_string(),
            regex,
            params,
            groups,
        })
    }

    /// Test a request host, extracting domain parameters on success.
    #[must_use]
    pub fn match_host(&self, host: &str) -> Option<ParamVec> {
        let bare = host.split(':').next().unwrap_or_default();
        let bare = bare.to_ascii_lowercase();
        let caps = self.regex.captures(&bare)?;
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

    /// Ordered parameter names captured by this pattern.
    #[must_use]
    pub fn param_names(&self) -> &[Arc<str>] {
        &self.params
    }

    #[must_use]
    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }
}
