use may_minihttp::Request;
use std::io::Read;
use std::sync::Arc;
use tracing::debug;

use crate::context::HeaderVec;
use crate::pattern::ParamVec;

/// Parsed HTTP request data used by `AppService`.
#[derive(Debug)]
pub struct ParsedRequest {
    /// HTTP method (GET, POST, ...).
    pub method: String,
    /// Request path without the query string.
    pub path: String,
    /// Request host, lower-cased and without any `:port` suffix.
    pub host: Option<String>,
    /// HTTP headers (lower-cased names).
    pub headers: HeaderVec,
    /// Parsed cookies from the Cookie header.
    pub cookies: HeaderVec,
    /// Parsed query string parameters.
    pub query_params: ParamVec,
    /// Request body parsed as JSON, if any.
    pub body: Option<serde_json::Value>,
}

/// Parse the Cookie header into name/value pairs.
pub fn parse_cookies(headers: &HeaderVec) -> HeaderVec {
    headers
        .iter()
        .find(|(k, _)| k.as_ref() == "cookie")
        .map(|(_, raw)| {
            raw.split(';')
                .filter_map(|pair| {
                    let mut parts = pair.trim().splitn(2, '=');
                    let name = parts.next()?.trim();
                    if name.is_empty() {
                        return None;
                    }
                    let value = parts.next().unwrap_or("").trim().to_string();
                    Some((Arc::from(name), value))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Parse and URL-decode query string parameters from a raw request path.
pub fn parse_query_params(raw_path: &str) -> ParamVec {
    match raw_path.find('?') {
        Some(pos) => url::form_urlencoded::parse(raw_path[pos + 1..].as_bytes())
            .map(|(k, v)| (Arc::from(k.as_ref()), v.to_string()))
            .collect(),
        None => ParamVec::new(),
    }
}

/// Extract the host from the parsed headers: lower-cased, port stripped.
pub fn extract_host(headers: &HeaderVec) -> Option<String> {
    headers
        .iter()
        .find(|(k, _)| k.as_ref() == "host")
        .and_then(|(_, v)| v.split(':').next().map(|h| h.to_ascii_lowercase()))
}

/// Extract everything the dispatcher needs from a raw HTTP request.
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let raw_path = req.path().to_string();
    let path = raw_path.split('?').next().unwrap_or("/").to_string();

    let headers: HeaderVec = req
        .headers()
        .iter()
        .map(|h| {
            (
                Arc::from(h.name.to_ascii_lowercase().as_str()),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let cookies = parse_cookies(&headers);
    let query_params = parse_query_params(&raw_path);
    let host = extract_host(&headers);

    let body = {
        let mut body_str = String::new();
        match req.body().read_to_string(&mut body_str) {
            Ok(size) if size > 0 => serde_json::from_str(&body_str).ok(),
            _ => None,
        }
    };

    debug!(
        method = %method,
        path = %path,
        host = ?host,
        header_count = headers.len(),
        cookie_count = cookies.len(),
        query_count = query_params.len(),
        has_body = body.is_some(),
        "HTTP request parsed"
    );

    ParsedRequest {
        method,
        path,
        host,
        headers,
        cookies,
        query_params,
        body,
    }
}
