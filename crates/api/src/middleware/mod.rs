//! Request middleware and authorization extractors.
//!
//! - [`access_log`] -- per-request tracing span with correlation fields.
//! - [`auth::authenticate`] -- verifies the Bearer token on `/api/v1`.
//! - [`rbac::RequireAdmin`] -- requires `IDM_ADMIN`.
//! - [`rbac::RequireReader`] -- requires `IDM_USER` or `IDM_ADMIN`.

pub mod access_log;
pub mod auth;
pub mod rbac;

/// Correlation header, honored when present and generated otherwise.
pub const REQUEST_ID_HEADER: &str = "x-request-id";
