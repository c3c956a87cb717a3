//! Error types for the pdfsplice server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use pdfsplice_core::SpliceError;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid page range: {0}")]
    InvalidRange(SpliceError),

    #[error("Unreadable PDF: {0}")]
    UnreadablePdf(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ServerError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone())
            }
            ServerError::InvalidRange(err) => {
                (StatusCode::BAD_REQUEST, "INVALID_RANGE", err.to_string())
            }
            ServerError::UnreadablePdf(msg) => {
                (StatusCode::BAD_REQUEST, "UNREADABLE_PDF", msg.clone())
            }
            ServerError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<SpliceError> for ServerError {
    fn from(err: SpliceError) -> Self {
        match err {
            SpliceError::MalformedToken { .. } | SpliceError::OutOfBounds { .. } => {
                ServerError::InvalidRange(err)
            }
            SpliceError::SourceRead(msg) => ServerError::UnreadablePdf(msg),
            SpliceError::Save(msg) => ServerError::Internal(msg),
        }
    }
}
