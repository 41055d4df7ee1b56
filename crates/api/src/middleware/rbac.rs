//! Role-based access control (RBAC) extractors.
//!
//! Each extractor reads the verified [`IdmClaims`] and rejects requests whose
//! realm roles do not meet the requirement. Use these in route handlers to
//! enforce authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use idm_core::error::CoreError;
use idm_core::roles::{IDM_ADMIN, READER_ROLES};

use crate::auth::claims::IdmClaims;
use crate::error::AppError;
use crate::state::AppState;

/// Passes if `role` is among the caller's realm roles.
pub fn require_role(claims: &IdmClaims, role: &str) -> Result<(), AppError> {
    if claims.has_role(role) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(format!(
            "Role {role} required"
        ))))
    }
}

/// Passes if any of `roles` is among the caller's realm roles.
pub fn require_any_role(claims: &IdmClaims, roles: &[&str]) -> Result<(), AppError> {
    if claims.has_any_role(roles) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(format!(
            "One of roles {} required",
            roles.join(", ")
        ))))
    }
}

/// Requires the `IDM_ADMIN` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(claims): RequireAdmin) -> AppResult<Json<()>> {
///     // claims are guaranteed to carry IDM_ADMIN here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub IdmClaims);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = IdmClaims::from_request_parts(parts, state).await?;
        require_role(&claims, IDM_ADMIN)?;
        Ok(RequireAdmin(claims))
    }
}

/// Requires `IDM_USER` or `IDM_ADMIN`. Rejects with 403 Forbidden otherwise.
pub struct RequireReader(pub IdmClaims);

impl FromRequestParts<AppState> for RequireReader {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = IdmClaims::from_request_parts(parts, state).await?;
        require_any_role(&claims, READER_ROLES)?;
        Ok(RequireReader(claims))
    }
}
