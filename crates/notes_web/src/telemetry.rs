//! Per-request logging middleware.

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use log::{info, warn};
use std::time::Instant;

/// Logs method, route template, status and latency of every request.
///
/// The route template (`/note/{slug}/`) is logged instead of the raw path so
/// slugs chosen by users stay out of the log files.
pub async fn log_request(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().as_str().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;
    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_millis();

    if status >= 500 {
        warn!(
            "event=http_request module=web status={} method={} path={} duration_ms={}",
            status, method, route, duration_ms
        );
    } else {
        info!(
            "event=http_request module=web status={} method={} path={} duration_ms={}",
            status, method, route, duration_ms
        );
    }

    response
}
