use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use idm_core::error::CoreError;
use idm_core::validation::FieldError;

use crate::response::Envelope;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the standard failure envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `idm_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Malformed request: unreadable body, bad path or query parameter.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No route matches the request path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The path exists but does not accept the request method.
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details): (StatusCode, String, Vec<FieldError>) = match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation { message, details } => {
                    (StatusCode::BAD_REQUEST, message, details)
                }
                CoreError::AlreadyExists(msg) => (StatusCode::CONFLICT, msg, Vec::new()),
                err @ CoreError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, err.to_string(), Vec::new())
                }
                CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, Vec::new()),
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, Vec::new()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        INTERNAL_MESSAGE.to_string(),
                        Vec::new(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, Vec::new()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, Vec::new()),
            AppError::MethodNotAllowed(msg) => {
                (StatusCode::METHOD_NOT_ALLOWED, msg, Vec::new())
            }
            err @ AppError::Timeout => (StatusCode::REQUEST_TIMEOUT, err.to_string(), Vec::new()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_MESSAGE.to_string(),
                    Vec::new(),
                )
            }
        };

        let data = (!details.is_empty()).then_some(details);
        (status, Json(Envelope::failure(message, data))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
