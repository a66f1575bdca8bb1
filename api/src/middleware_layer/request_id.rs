use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::{Instrument, info, info_span};

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Reuses the caller's id when it is a non-blank, valid header value.
fn request_id(headers: &HeaderMap) -> HeaderValue {
    if let Some(v) = headers.get(&REQUEST_ID_HEADER) {
        if v.to_str().is_ok_and(|s| !s.trim().is_empty()) {
            return v.clone();
        }
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    // ASCII digits only, always a valid header value.
    HeaderValue::from_str(&format!("req-{nanos}"))
        .unwrap_or_else(|_| HeaderValue::from_static("req-unknown"))
}

/// Tags every request with `X-Request-Id`, echoes it on the response and
/// logs one line per request once the handler finished.
pub async fn track_request(req: Request<Body>, next: Next) -> Response {
    let id = request_id(req.headers());
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started = Instant::now();

    let span = info_span!(
        "http_request",
        request_id = %id.to_str().unwrap_or_default(),
        %method,
        %path
    );

    let mut res = next.run(req).instrument(span.clone()).await;

    span.in_scope(|| {
        info!(
            status = res.status().as_u16(),
            latency_ms = started.elapsed().as_millis(),
            "request completed"
        );
    });
    res.headers_mut().insert(REQUEST_ID_HEADER, id);
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_client_id_and_generates_otherwise() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("abc-1"));
        assert_eq!(request_id(&headers), "abc-1");

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("  "));
        assert!(request_id(&headers).to_str().unwrap().starts_with("req-"));

        assert!(request_id(&HeaderMap::new()).to_str().unwrap().starts_with("req-"));
    }
}
