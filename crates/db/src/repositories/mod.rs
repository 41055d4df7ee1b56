//! Repository layer.
//!
//! Each entity has a repository trait consumed by the service layer and a
//! Postgres implementation holding a cloned [`PgPool`](sqlx::PgPool).
//! Errors are returned unchanged; repositories never log.

use async_trait::async_trait;
use idm_core::types::DbId;
use sqlx::{Postgres, Transaction};

use crate::models::employee::Employee;
use crate::models::role::Role;

pub mod employee_repo;
pub mod role_repo;

pub use employee_repo::PgEmployeeRepo;
pub use role_repo::PgRoleRepo;

/// Transaction handle handed out by `begin_transaction`.
///
/// Dropping a handle without calling either method rolls it back.
#[async_trait]
pub trait UnitOfWork: Send {
    async fn commit(self) -> Result<(), sqlx::Error>;
    async fn rollback(self) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl UnitOfWork for Transaction<'static, Postgres> {
    async fn commit(self) -> Result<(), sqlx::Error> {
        Transaction::commit(self).await
    }

    async fn rollback(self) -> Result<(), sqlx::Error> {
        Transaction::rollback(self).await
    }
}

/// Storage operations on employees.
#[async_trait]
pub trait EmployeeRepository: Send + Sync + 'static {
    type Tx: UnitOfWork;

    /// `Ok(None)` when no row has this id.
    async fn find_by_id(&self, id: DbId) -> Result<Option<Employee>, sqlx::Error>;

    async fn find_all(&self) -> Result<Vec<Employee>, sqlx::Error>;

    /// An empty `ids` slice returns an empty list without querying.
    async fn find_by_ids(&self, ids: &[DbId]) -> Result<Vec<Employee>, sqlx::Error>;

    /// Insert outside of any caller transaction; assigns the generated key
    /// and timestamps into `employee`.
    async fn add(&self, employee: &mut Employee) -> Result<(), sqlx::Error>;

    /// Returns the number of rows removed.
    async fn delete_by_id(&self, id: DbId) -> Result<u64, sqlx::Error>;

    async fn delete_by_ids(&self, ids: &[DbId]) -> Result<u64, sqlx::Error>;

    async fn begin_transaction(&self) -> Result<Self::Tx, sqlx::Error>;

    /// Insert inside `tx`. Never commits or rolls back.
    async fn add_with_transaction(
        &self,
        tx: &mut Self::Tx,
        employee: &mut Employee,
    ) -> Result<(), sqlx::Error>;

    async fn find_by_email_with_transaction(
        &self,
        tx: &mut Self::Tx,
        email: &str,
    ) -> Result<Option<Employee>, sqlx::Error>;
}

/// Storage operations on roles.
#[async_trait]
pub trait RoleRepository: Send + Sync + 'static {
    type Tx: UnitOfWork;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Role>, sqlx::Error>;

    async fn find_all(&self) -> Result<Vec<Role>, sqlx::Error>;

    async fn find_by_ids(&self, ids: &[DbId]) -> Result<Vec<Role>, sqlx::Error>;

    async fn add(&self, role: &mut Role) -> Result<(), sqlx::Error>;

    async fn delete_by_id(&self, id: DbId) -> Result<u64, sqlx::Error>;

    async fn delete_by_ids(&self, ids: &[DbId]) -> Result<u64, sqlx::Error>;

    async fn begin_transaction(&self) -> Result<Self::Tx, sqlx::Error>;

    async fn add_with_transaction(&self, tx: &mut Self::Tx, role: &mut Role)
        -> Result<(), sqlx::Error>;

    async fn find_by_name_with_transaction(
        &self,
        tx: &mut Self::Tx,
        name: &str,
    ) -> Result<Option<Role>, sqlx::Error>;
}
