//! Request middleware: request ids and the rate limit gate.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::Instrument;
use uuid::Uuid;

use super::error::{ApiError, LIMIT_HEADER, REMAINING_HEADER};
use super::AppState;

pub(crate) const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tag every request with an id and run it inside a span carrying that id.
pub(crate) async fn request_id_middleware(request: Request<Body>, next: Next) -> Response {
    let request_id = request_id(request.headers());
    let span = tracing::info_span!(
        "http.request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Count requests under the gated prefix and refuse those over quota.
pub(crate) async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let gated = state
        .rate_limit_prefix
        .as_deref()
        .is_some_and(|prefix| request.uri().path().starts_with(prefix));
    if !gated {
        return next.run(request).await;
    }

    let identity = state.identity.identify(request.headers());
    let decision = state.limiter.check_rate_limit(&identity).await;
    if !decision.allowed {
        return ApiError::RateLimited(decision).into_response();
    }

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(LIMIT_HEADER, HeaderValue::from(decision.limit));
    headers.insert(REMAINING_HEADER, HeaderValue::from(decision.remaining));
    response
}
