//! Request identification and per-request instrumentation.
//!
//! Every request gets an `x-request-id` (kept if the client sent one,
//! otherwise a UUID v4), which is attached to the request span and echoed on
//! the response.

use std::time::Instant;

use axum::{
    body::Body,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use tracing::Span;

use crate::observability::metrics;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Span for `TraceLayer`, carrying method, path and request id.
pub fn make_request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}

/// Record request count and latency by matched route.
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;
    metrics::record_request(&route, response.status().as_u16(), start);
    response
}
