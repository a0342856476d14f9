use axum::{
    extract::{Request, State},
    http::{
        header::{ACCESS_CONTROL_REQUEST_METHOD, AUTHORIZATION, ORIGIN},
        HeaderMap, Method,
    },
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::error::ApiError;

/// Shared-secret gate in front of every route.
///
/// The raw `Authorization` header must equal the configured token byte for
/// byte: no `Bearer ` prefix, no trimming, no hashing. Anything else is a 401
/// before the request reaches a handler.
///
/// With CORS enabled, a browser preflight (`OPTIONS` carrying both `Origin`
/// and `Access-Control-Request-Method`) is let through to the CORS layer,
/// which answers it without reaching a handler.
pub async fn require_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.config.security.enable_cors && is_preflight(request.method(), &headers) {
        return Ok(next.run(request).await);
    }

    let presented = headers.get(AUTHORIZATION).map(|v| v.as_bytes());

    if presented != Some(state.config.auth_token().as_bytes()) {
        tracing::warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "Rejected request with {} Authorization header",
            if presented.is_some() { "invalid" } else { "missing" }
        );
        return Err(ApiError::unauthorized("Unauthorized"));
    }

    Ok(next.run(request).await)
}

fn is_preflight(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(ORIGIN)
        && headers.contains_key(ACCESS_CONTROL_REQUEST_METHOD)
}
