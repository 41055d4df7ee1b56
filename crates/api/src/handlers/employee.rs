//! Handlers for the `/api/v1/employees` resource.

use axum::extract::State;
use axum::Json;
use idm_core::employee::{CreateEmployeeRequest, EmployeeResponse};
use idm_core::types::{DbId, IdsRequest};

use crate::error::AppResult;
use crate::extract::{IdsParam, JsonBody, PathParam, QueryParams};
use crate::middleware::rbac::{RequireAdmin, RequireReader};
use crate::response::{ApiJson, Envelope};
use crate::state::AppState;

/// POST /api/v1/employees
///
/// Create an employee. Responds with the new id.
pub async fn create_employee(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateEmployeeRequest>,
) -> AppResult<ApiJson<DbId>> {
    let id = state.employees.create_employee(input).await?;
    tracing::debug!(employee_id = id, subject = ?admin.registered.sub, "create_employee");
    Ok(Json(Envelope::ok(id)))
}

/// GET /api/v1/employees/{id}
pub async fn get_employee(
    _reader: RequireReader,
    State(state): State<AppState>,
    PathParam(id): PathParam<DbId>,
) -> AppResult<ApiJson<EmployeeResponse>> {
    let employee = state.employees.find_by_id(id).await?;
    Ok(Json(Envelope::ok(employee)))
}

/// GET /api/v1/employees
pub async fn find_all_employees(
    _reader: RequireReader,
    State(state): State<AppState>,
) -> AppResult<ApiJson<Vec<EmployeeResponse>>> {
    let employees = state.employees.find_all().await?;
    Ok(Json(Envelope::ok(employees)))
}

/// POST /api/v1/employees/ids
///
/// Body `{"ids":[1,2,3]}`; unknown ids are skipped.
pub async fn find_employees_by_ids(
    _reader: RequireReader,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<IdsRequest>,
) -> AppResult<ApiJson<Vec<EmployeeResponse>>> {
    let employees = state.employees.find_by_ids(&input.ids).await?;
    Ok(Json(Envelope::ok(employees)))
}

/// DELETE /api/v1/employees/{id}
///
/// Succeeds whether or not the employee existed.
pub async fn delete_employee(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    PathParam(id): PathParam<DbId>,
) -> AppResult<ApiJson<()>> {
    state.employees.delete_by_id(id).await?;
    Ok(Json(Envelope::empty()))
}

/// DELETE /api/v1/employees?ids=1,2,3
///
/// The whole list is parsed before anything is deleted.
pub async fn delete_employees_by_ids(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    QueryParams(params): QueryParams<IdsParam>,
) -> AppResult<ApiJson<()>> {
    let ids = params.parse()?;
    state.employees.delete_by_ids(&ids).await?;
    Ok(Json(Envelope::empty()))
}
