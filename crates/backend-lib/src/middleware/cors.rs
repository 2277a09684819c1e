//! Cross-origin headers for the console's JSON endpoints.
use axum::http::{header, HeaderMap, HeaderValue};

/// Allow any origin, allow a `Content-Type` request header and declare a
/// JSON body.
pub fn allow_origin(headers: &mut HeaderMap) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.append(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
}
