//! `/signin`: exchange credentials for a session cookie.
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use console_common::Credentials;

use crate::{error::AppError, middleware::SESSION_COOKIE, AppState};

/// Decode the credentials, run the verifier and, on success, set the
/// session cookie and return the raw token as the body.
///
/// Only the first JSON value in the body is read; anything after it is
/// ignored.
pub async fn signin(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let creds = serde_json::Deserializer::from_slice(&body)
        .into_iter::<Credentials>()
        .next()
        .ok_or_else(|| AppError::MalformedBody("empty body".to_string()))?
        .map_err(|e| AppError::MalformedBody(e.to_string()))?;

    let sid = state.auth.sign_in(&creds).await.ok_or(AppError::Forbidden)?;
    let cookie = format!("{SESSION_COOKIE}={sid}; HttpOnly");

    Ok(([(header::SET_COOKIE, cookie)], sid).into_response())
}
