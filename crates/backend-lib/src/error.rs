// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Per-request failures. Every variant resolves to an HTTP response; none of
/// them takes the process down.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing, unknown or expired session, or rejected credentials
    #[error("Forbidden")]
    Forbidden,

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Forbidden => "AUTH_001",
            AppError::MalformedBody(_) => "VAL_001",
            AppError::Json(_) => "JSON_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Forbidden => "Forbidden".to_string(),
            AppError::MalformedBody(_) => "Invalid request format".to_string(),
            AppError::Json(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            // The console front end expects these two bodies verbatim.
            AppError::Forbidden => (status, "Forbidden").into_response(),
            AppError::MalformedBody(_) => status.into_response(),
            other => {
                let message = if cfg!(debug_assertions) {
                    other.to_string()
                } else {
                    other.sanitized_message()
                };

                let body = serde_json::json!({
                    "error": {
                        "code": other.error_code(),
                        "message": message,
                    }
                });

                (status, axum::Json(body)).into_response()
            },
        }
    }
}
