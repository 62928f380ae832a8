//! HTTP error types for the Portcullis server.
//!
//! Maps core auth errors and upstream failures into HTTP responses.
//! Every variant produces a JSON body with a machine-readable `error`
//! field and a human-readable `message`. Session failures collapse into
//! one generic message — the cause stays in the server logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use portcullis_core::error::{AuthError, SessionError};

use crate::upstream::UpstreamError;

/// Application-level error returned from HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Authentication failed or session invalid.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Client sent invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The upstream provisioning API could not be reached.
    #[error("bad gateway: {0}")]
    BadGateway(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::BadGateway(msg) => {
                tracing::warn!(error = %msg, "upstream request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "bad_gateway",
                    "upstream API unavailable".to_owned(),
                )
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error".to_owned(),
                )
            }
        };

        let body = ErrorBody {
            error: error_type,
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        // "invalid email or password" — the same for unknown identity
        // and wrong secret.
        Self::Unauthorized(err.to_string())
    }
}

impl From<SessionError> for AppError {
    fn from(_: SessionError) -> Self {
        // The precise failure (malformed, bad signature, expired) is a
        // log-level detail, not a client-facing one.
        Self::Unauthorized("invalid or expired session".to_owned())
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        Self::BadGateway(err.to_string())
    }
}
