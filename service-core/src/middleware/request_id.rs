use axum::http::{HeaderValue, Request};
use axum::{extract::Request as AxumRequest, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest client-supplied id we keep; anything longer is replaced.
pub const MAX_REQUEST_ID_LEN: usize = 128;

/// Reuse the caller's `x-request-id` or mint one, and echo it on the response.
pub async fn request_id_middleware(mut req: AxumRequest, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty() && s.len() <= MAX_REQUEST_ID_LEN)
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let header_value = HeaderValue::from_str(&request_id).ok();
    if let Some(value) = &header_value {
        req.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
    }

    let mut response = next.run(req).await;

    if let Some(value) = header_value {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Span factory for `TraceLayer::make_span_with`.
///
/// Must sit inside `request_id_middleware` so the header is already present.
pub fn make_request_span<B>(request: &Request<B>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
        version = ?request.version(),
    )
}
