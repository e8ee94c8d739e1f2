use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::context::HeaderVec;

/// Response produced by a handler or interceptor.
///
/// Bodies are JSON values; a `Value::String` body is written as plain text
/// by the host adapter and `Value::Null` as an empty body.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    /// HTTP status code (200, 404, 500, ...).
    pub status: u16,
    /// Response headers (stack-allocated for ≤16 entries).
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    /// Response body.
    pub body: Value,
}

impl Response {
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a JSON response with a `content-type` header.
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a JSON error response. The message is all a client sees;
    /// internal detail stays in the logs.
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    /// An empty 204 response, used for synthesized `OPTIONS` answers.
    #[must_use]
    pub fn no_content() -> Self {
        Self {
            status: 204,
            headers: HeaderVec::new(),
            body: Value::Null,
        }
    }

    /// Get a header by name (case-insensitive).
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header.
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }

    /// Append a header without replacing existing entries of the same
    /// name. Needed for repeatable headers such as `Set-Cookie`.
    pub fn append_header(&mut self, name: &str, value: String) {
        self.headers.push((Arc::from(name), value));
    }
}
