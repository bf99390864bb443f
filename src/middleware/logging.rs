use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tags each request with an `x-request-id` (kept when the caller supplied
/// one) and logs its start and completion. Everything logged while the
/// request is handled runs inside a `request` span carrying that id.
pub async fn logging_middleware(mut request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let version = request.version();

    let existing = request.headers().get(REQUEST_ID_HEADER).cloned();
    let request_id = match existing {
        Some(existing) => existing,
        None => {
            let generated = HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"));
            request.headers_mut().insert(REQUEST_ID_HEADER, generated.clone());
            generated
        }
    };
    let request_id_str = request_id.to_str().unwrap_or("invalid").to_string();

    let span = tracing::info_span!("request", request_id = %request_id_str);
    span.in_scope(|| {
        tracing::info!(
            method = %method,
            uri = %uri,
            version = ?version,
            "Request started"
        );
    });

    let mut response = next.run(request).instrument(span.clone()).await;

    let duration = start.elapsed();
    let status = response.status();

    span.in_scope(|| {
        tracing::info!(
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    });

    response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
    response
}
