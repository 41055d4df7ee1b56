//! Service layer: validation, transactions and error classification.
//!
//! Handlers talk to the [`EmployeeService`] / [`RoleService`] traits; the
//! concrete managers are generic over the repository traits in `idm_db`.

pub mod employee;
pub mod role;

#[cfg(test)]
pub(crate) mod fakes;

use async_trait::async_trait;
use idm_core::employee::{CreateEmployeeRequest, EmployeeResponse};
use idm_core::error::CoreError;
use idm_core::role::{CreateRoleRequest, RoleResponse};
use idm_core::types::DbId;
use idm_db::classify::{constraint_violation, ConstraintViolation};
use idm_db::repositories::UnitOfWork;

#[async_trait]
pub trait EmployeeService: Send + Sync {
    async fn find_by_id(&self, id: DbId) -> Result<EmployeeResponse, CoreError>;

    /// Validate and insert in a transaction. Returns the new id.
    async fn create_employee(&self, input: CreateEmployeeRequest) -> Result<DbId, CoreError>;

    async fn find_all(&self) -> Result<Vec<EmployeeResponse>, CoreError>;

    async fn find_by_ids(&self, ids: &[DbId]) -> Result<Vec<EmployeeResponse>, CoreError>;

    /// Absence is not an error.
    async fn delete_by_id(&self, id: DbId) -> Result<(), CoreError>;

    async fn delete_by_ids(&self, ids: &[DbId]) -> Result<(), CoreError>;
}

#[async_trait]
pub trait RoleService: Send + Sync {
    async fn find_by_id(&self, id: DbId) -> Result<RoleResponse, CoreError>;

    async fn create_role(&self, input: CreateRoleRequest) -> Result<DbId, CoreError>;

    async fn find_all(&self) -> Result<Vec<RoleResponse>, CoreError>;

    async fn find_by_ids(&self, ids: &[DbId]) -> Result<Vec<RoleResponse>, CoreError>;

    async fn delete_by_id(&self, id: DbId) -> Result<(), CoreError>;

    async fn delete_by_ids(&self, ids: &[DbId]) -> Result<(), CoreError>;
}

/// Map a write error onto the domain taxonomy.
///
/// Unique and foreign-key violations go through the supplied constructors;
/// anything else is `Internal` with `context` prepended.
pub(crate) fn classify_write(
    err: sqlx::Error,
    context: &str,
    on_unique: impl FnOnce() -> CoreError,
    on_foreign_key: impl FnOnce() -> CoreError,
) -> CoreError {
    match constraint_violation(&err) {
        Some(ConstraintViolation::Unique { .. }) => on_unique(),
        Some(ConstraintViolation::ForeignKey { .. }) => on_foreign_key(),
        None => CoreError::internal(context, err),
    }
}

/// Commit `tx` when `result` is `Ok`, roll it back otherwise.
pub(crate) async fn finish<T, Tx>(tx: Tx, result: Result<T, CoreError>, context: &str) -> Result<T, CoreError>
where
    Tx: UnitOfWork,
{
    match result {
        Ok(value) => {
            tx.commit()
                .await
                .map_err(|e| CoreError::internal(context, e))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, context, "Rollback failed");
            }
            Err(err)
        }
    }
}
