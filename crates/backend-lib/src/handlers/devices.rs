//! `/devs`: list connected devices.
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use metrics::counter;

use crate::{error::AppError, metrics::DEVS_SNAPSHOT, middleware::allow_origin, AppState};

/// Serialize a snapshot of the broker's registry. Runs behind the session gate.
pub async fn list_devices(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let devs = state.broker.snapshot();
    counter!(DEVS_SNAPSHOT).increment(1);

    let body = serde_json::to_vec(&devs)?;
    let mut response = (StatusCode::OK, body).into_response();
    allow_origin(response.headers_mut());
    Ok(response)
}
