use may_minihttp::Response as HttpResponse;
use serde_json::Value;

use crate::response::Response;

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "OK",
    }
}

/// Write an engine [`Response`] onto the wire.
///
/// may_minihttp only accepts `&'static str` header lines, so dynamic
/// headers are leaked; header churn is bounded by response header counts.
pub fn write_response(res: &mut HttpResponse, response: Response) {
    res.status_code(response.status as usize, status_reason(response.status));

    let mut has_content_type = false;
    for (name, value) in &response.headers {
        if name.eq_ignore_ascii_case("content-type") {
            has_content_type = true;
        }
        let line = format!("{name}: {value}").into_boxed_str();
        res.header(Box::leak(line));
    }

    match response.body {
        Value::Null => {
            res.body_vec(Vec::new());
        }
        Value::String(text) => {
            if !has_content_type {
                res.header("Content-Type: text/plain");
            }
            res.body_vec(text.into_bytes());
        }
        other => {
            if !has_content_type {
                res.header("Content-Type: application/json");
            }
            res.body_vec(serde_json::to_vec(&other).unwrap_or_default());
        }
    }
}

/// Write a JSON error body directly, bypassing the dispatcher.
pub fn write_json_error(res: &mut HttpResponse, status: u16, body: Value) {
    res.status_code(status as usize, status_reason(status));
    res.header("Content-Type: application/json");
    res.body_vec(body.to_string().into_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(204), "No Content");
        assert_eq!(status_reason(404), "Not Found");
    }
}
