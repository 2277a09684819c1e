// ============================
// console-backend/src/router.rs
// ============================
//! Endpoint composition.
use std::sync::Arc;

use axum::{
    middleware,
    routing::{any, get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::handlers::{devices, index, relay, signin};
use crate::middleware::require_session;
use crate::AppState;

/// Build the console router.
///
/// | path      | gate     |
/// |-----------|----------|
/// | `/signin` | none     |
/// | `/devs`   | session  |
/// | `/ws`     | broker   |
/// | `/cmd`    | broker   |
/// | `/`, rest | none     |
pub fn create_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/devs", get(devices::list_devices))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/signin", post(signin::signin))
        .route("/ws", get(relay::ws))
        .route("/cmd", any(relay::cmd))
        .route("/", get(index::index))
        .merge(protected)
        .fallback_service(ServeDir::new(&state.settings.static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
