use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Client-supplied request id, if it is a non-blank header value.
pub fn incoming_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn generate_request_id() -> String {
    let now = Utc::now();
    let nanos = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros() * 1000);
    format!("req-{nanos}")
}

/// Ensures every request and response carries an `X-Request-Id`.
///
/// Handlers read the id from the request headers for their logs.
pub async fn propagate_request_id(mut req: Request<Body>, next: Next) -> Response {
    let id = incoming_request_id(req.headers()).unwrap_or_else(generate_request_id);
    if let Ok(value) = HeaderValue::from_str(&id) {
        req.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
        let mut res = next.run(req).await;
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
        res
    } else {
        next.run(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_header_is_ignored() {
        let mut h = HeaderMap::new();
        h.insert(REQUEST_ID_HEADER, HeaderValue::from_static("   "));
        assert_eq!(incoming_request_id(&h), None);
        h.insert(REQUEST_ID_HEADER, HeaderValue::from_static("abc"));
        assert_eq!(incoming_request_id(&h).as_deref(), Some("abc"));
    }

    #[test]
    fn generated_ids_are_prefixed() {
        assert!(generate_request_id().starts_with("req-"));
    }
}
