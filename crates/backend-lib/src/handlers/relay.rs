//! `/ws` and `/cmd`: hand-off to the device broker.
//!
//! Neither path goes through the session gate; the broker's own protocol
//! decides who may connect.
use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{ws::WebSocketUpgrade, Query, State},
    response::Response,
};

use crate::{middleware::allow_origin, AppState};

pub async fn ws(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    state.broker.serve_ws(ws, params).await
}

pub async fn cmd(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let mut response = state.broker.serve_cmd(body).await;
    allow_origin(response.headers_mut());
    response
}
