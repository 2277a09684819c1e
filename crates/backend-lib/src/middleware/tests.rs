use super::*;
use crate::auth::{RejectAll, Ttl};
use crate::broker::DeviceBroker;
use crate::config::Settings;
use crate::AppState;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, HeaderValue, Request, StatusCode},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

async fn test_handler() -> &'static str {
    "Hello, World!"
}

fn test_state() -> Arc<AppState> {
    let settings = Settings::builder().session_ttl(60).build().unwrap();
    Arc::new(AppState::new(
        settings,
        Arc::new(RejectAll),
        Arc::new(DeviceBroker::new()),
    ))
}

fn gated(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(test_handler))
        .route_layer(from_fn_with_state(state.clone(), require_session))
        .with_state(state)
}

fn request(cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

#[test]
fn test_session_cookie_extraction() {
    let mut headers = HeaderMap::new();
    assert_eq!(session_cookie(&headers), None);

    headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; sid=http-abc; lang=en"));
    assert_eq!(session_cookie(&headers).as_deref(), Some("http-abc"));

    // a similarly named cookie is not the session
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_static("xsid=nope; sidx=nope"));
    assert_eq!(session_cookie(&headers), None);

    // split across several Cookie headers
    let mut headers = HeaderMap::new();
    headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
    headers.append(header::COOKIE, HeaderValue::from_static("sid=http-xyz"));
    assert_eq!(session_cookie(&headers).as_deref(), Some("http-xyz"));
}

#[tokio::test]
async fn test_missing_cookie_is_forbidden() {
    let app = gated(test_state());

    let response = app.oneshot(request(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"Forbidden");
}

#[tokio::test]
async fn test_unknown_session_is_forbidden() {
    let app = gated(test_state());

    let response = app.oneshot(request(Some("sid=http-forged"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test(start_paused = true)]
async fn test_live_session_passes_and_is_refreshed() {
    let state = test_state();
    state.sessions.create("http-live", Ttl::Custom(Duration::from_secs(1)));
    let app = gated(state.clone());

    let response = app.oneshot(request(Some("sid=http-live"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"Hello, World!");

    // the refresh replaced the 1s lifetime with the 60s default
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(state.sessions.get("http-live"));
}

#[test]
fn test_allow_origin_headers() {
    let mut headers = HeaderMap::new();
    allow_origin(&mut headers);
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
    assert_eq!(headers["content-type"], "application/json");
}
