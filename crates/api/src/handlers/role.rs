//! Handlers for the `/api/v1/roles` resource.

use axum::extract::State;
use axum::Json;
use idm_core::role::{CreateRoleRequest, RoleResponse};
use idm_core::types::{DbId, IdsRequest};

use crate::error::AppResult;
use crate::extract::{IdsParam, JsonBody, PathParam, QueryParams};
use crate::middleware::rbac::{RequireAdmin, RequireReader};
use crate::response::{ApiJson, Envelope};
use crate::state::AppState;

/// POST /api/v1/roles
///
/// Create a role, optionally under `parent_id`. Responds with the new id.
pub async fn create_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateRoleRequest>,
) -> AppResult<ApiJson<DbId>> {
    let id = state.roles.create_role(input).await?;
    tracing::debug!(role_id = id, subject = ?admin.registered.sub, "create_role");
    Ok(Json(Envelope::ok(id)))
}

/// GET /api/v1/roles/{id}
pub async fn get_role(
    _reader: RequireReader,
    State(state): State<AppState>,
    PathParam(id): PathParam<DbId>,
) -> AppResult<ApiJson<RoleResponse>> {
    let role = state.roles.find_by_id(id).await?;
    Ok(Json(Envelope::ok(role)))
}

/// GET /api/v1/roles
pub async fn find_all_roles(
    _reader: RequireReader,
    State(state): State<AppState>,
) -> AppResult<ApiJson<Vec<RoleResponse>>> {
    let roles = state.roles.find_all().await?;
    Ok(Json(Envelope::ok(roles)))
}

/// POST /api/v1/roles/ids
pub async fn find_roles_by_ids(
    _reader: RequireReader,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<IdsRequest>,
) -> AppResult<ApiJson<Vec<RoleResponse>>> {
    let roles = state.roles.find_by_ids(&input.ids).await?;
    Ok(Json(Envelope::ok(roles)))
}

/// DELETE /api/v1/roles/{id}
///
/// Absent roles are a no-op. A role still assigned to employees is a 400.
pub async fn delete_role(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    PathParam(id): PathParam<DbId>,
) -> AppResult<ApiJson<()>> {
    state.roles.delete_by_id(id).await?;
    Ok(Json(Envelope::empty()))
}

/// DELETE /api/v1/roles?ids=1,2,3
pub async fn delete_roles_by_ids(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    QueryParams(params): QueryParams<IdsParam>,
) -> AppResult<ApiJson<()>> {
    let ids = params.parse()?;
    state.roles.delete_by_ids(&ids).await?;
    Ok(Json(Envelope::empty()))
}
