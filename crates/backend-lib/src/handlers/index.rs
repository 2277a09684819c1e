//! `/`: cache-busting redirect in front of the static front end.
use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::AppState;

/// Redirect a bare `/` to `/?t=<unix seconds>` so browsers refetch the page;
/// any request already carrying `t` or `id` gets the page itself.
pub async fn index(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
    request: Request,
) -> Response {
    let params = query.map(|Query(params)| params).unwrap_or_default();
    let has = |key: &str| params.get(key).is_some_and(|v| !v.is_empty());

    if !has("t") && !has("id") {
        let location = format!("/?t={}", chrono::Utc::now().timestamp());
        return (StatusCode::FOUND, [(header::LOCATION, location)]).into_response();
    }

    match ServeDir::new(&state.settings.static_dir).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
