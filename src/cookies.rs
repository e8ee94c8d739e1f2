//! Cookie jar with pending-mutation tracking.
//!
//! Middleware and handlers record cookie writes on the jar during the
//! request; nothing touches the response until the finalizer runs. After
//! the chain completes — whether the response came from the handler, a
//! short-circuiting interceptor, the fallback or the error path —
//! [`apply_cookie_changes`] collapses the pending mutations to one
//! `Set-Cookie` header per name, keeping the most recent intent.

use crate::context::HeaderVec;
use crate::response::Response;

/// A staged `Set-Cookie` value.
#[derive(Debug, Clone)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub max_age: Option<i64>,
    pub secure: bool,
    pub http_only: bool,
}

impl SetCookie {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            domain: None,
            max_age: None,
            secure: false,
            http_only: false,
        }
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    #[must_use]
    pub fn secure(mut self) -> Self {
        self.secure = true;
        self
    }

    #[must_use]
    pub fn http_only(mut self) -> Self {
        self.http_only = true;
        self
    }

    fn header_value(&self) -> String {
        let mut out = format!("{}={}", self.name, self.value);
        if let Some(path) = &self.path {
            out.push_str("; Path=");
            out.push_str(path);
        }
        if let Some(domain) = &self.domain {
            out.push_str("; Domain=");
            out.push_str(domain);
        }
        if let Some(max_age) = self.max_age {
            out.push_str("; Max-Age=");
            out.push_str(&max_age.to_string());
        }
        if self.secure {
            out.push_str("; Secure");
        }
        if self.http_only {
            out.push_str("; HttpOnly");
        }
        out
    }
}

/// One staged cookie mutation, in the order it was recorded.
#[derive(Debug, Clone)]
pub enum CookieChange {
    Set(SetCookie),
    Delete(String),
}

impl CookieChange {
    fn name(&self) -> &str {
        match self {
            Self::Set(cookie) => &cookie.name,
            Self::Delete(name) => name,
        }
    }
}

/// Request-scoped cookie state: the cookies that arrived with the request
/// plus the mutations staged during processing.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    incoming: HeaderVec,
    pending: Vec<CookieChange>,
}

impl CookieJar {
    #[must_use]
    pub fn from_incoming(incoming: HeaderVec) -> Self {
        Self {
            incoming,
            pending: Vec::new(),
        }
    }

    /// Get a cookie value, pending mutations included: a staged set yields
    /// its value, a staged delete yields `None`, otherwise the incoming
    /// request cookie is returned.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        for change in self.pending.iter().rev() {
            match change {
                CookieChange::Set(cookie) if cookie.name == name => {
                    return Some(cookie.value.as_str())
                }
                CookieChange::Delete(deleted) if deleted == name => return None,
                _ => {}
            }
        }
        self.incoming
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Stage a cookie write.
    pub fn set(&mut self, cookie: SetCookie) {
        self.pending.push(CookieChange::Set(cookie));
    }

    /// Stage a plain name=value cookie write.
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.set(SetCookie::new(name, value));
    }

    /// Stage a cookie deletion.
    pub fn delete(&mut self, name: impl Into<String>) {
        self.pending.push(CookieChange::Delete(name.into()));
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// All staged mutations in recording order.
    #[must_use]
    pub fn pending(&self) -> &[CookieChange] {
        &self.pending
    }

    /// Last mutation per cookie name, preserving first-seen order.
    fn collapsed(&self) -> Vec<&CookieChange> {
        let mut out: Vec<&CookieChange> = Vec::new();
        for change in &self.pending {
            if let Some(slot) = out.iter_mut().find(|c| c.name() == change.name()) {
                *slot = change;
            } else {
                out.push(change);
            }
        }
        out
    }
}

/// Reconcile the jar's pending mutations into the response.
///
/// Emits at most one `Set-Cookie` header per mutated name — the most
/// recent intent wins, so a set followed by a delete produces exactly the
/// deletion. Untouched cookies and all other response content are left
/// alone.
pub fn apply_cookie_changes(response: &mut Response, jar: &CookieJar) {
    for change in jar.collapsed() {
        let value = match change {
            CookieChange::Set(cookie) => cookie.header_value(),
            CookieChange::Delete(name) => format!("{name}=; Max-Age=0; Path=/"),
        };
        response.append_header("set-cookie", value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_shadow_incoming() {
        let mut incoming = HeaderVec::new();
        incoming.push((std::sync::Arc::from("session"), "abc".to_string()));
        let mut jar = CookieJar::from_incoming(incoming);
        assert_eq!(jar.get("session"), Some("abc"));

        jar.set_value("session", "def");
        assert_eq!(jar.get("session"), Some("def"));

        jar.delete("session");
        assert_eq!(jar.get("session"), None);
    }

    #[test]
    fn test_collapse_keeps_last_intent() {
        let mut jar = CookieJar::default();
        jar.set_value("x", "1");
        jar.delete("x");
        jar.set_value("y", "2");

        let mut response = Response::json(200, serde_json::Value::Null);
        apply_cookie_changes(&mut response, &jar);

        let set_cookies: Vec<&str> = response
            .headers
            .iter()
            .filter(|(k, _)| k.as_ref() == "set-cookie")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(set_cookies.len(), 2);
        assert!(set_cookies[0].starts_with("x=; Max-Age=0"));
        assert!(set_cookies[1].starts_with("y=2"));
    }

    #[test]
    fn test_attribute_rendering() {
        let cookie = SetCookie::new("id", "42")
            .path("/app")
            .max_age(3600)
            .http_only();
        assert_eq!(cookie.header_value(), "id=42; Path=/app; Max-Age=3600; HttpOnly");
    }
}
