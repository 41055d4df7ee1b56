//! Request handlers.
//!
//! Handlers authorize through the RBAC extractors, parse input with the
//! enveloping extractors in [`crate::extract`], delegate to the service
//! traits held in [`AppState`](crate::state::AppState) and map errors via
//! [`AppError`](crate::error::AppError).

pub mod employee;
pub mod internal;
pub mod role;

use axum::extract::OriginalUri;
use axum::http::Method;

use crate::error::AppError;

/// Fallback for paths no route matches: a 404 envelope.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

/// Fallback for known paths hit with an unsupported method: a 405 envelope.
pub async fn method_not_allowed(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    AppError::MethodNotAllowed(format!("{method} is not supported on {}", uri.path()))
}
