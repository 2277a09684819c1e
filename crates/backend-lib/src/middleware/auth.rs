//! Session cookie gate for protected endpoints.
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::{error::AppError, AppState};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "sid";

/// Pull the session token out of the `Cookie` header(s)
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let prefix = format!("{SESSION_COOKIE}=");

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(prefix.as_str()))
        .map(|value| value.trim_matches('"').to_string())
}

/// Deny with 403 unless the request carries a live session, which is then
/// refreshed. Expired and never-issued tokens are indistinguishable.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = session_cookie(request.headers()) else {
        debug!(path = %request.uri().path(), "no session cookie");
        return Err(AppError::Forbidden);
    };

    if !state.auth.authorize(&token).await {
        debug!(path = %request.uri().path(), "unknown or expired session");
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}
