//! Postgres repository for the `employee` table.

use async_trait::async_trait;
use idm_core::types::{DbId, Timestamp};
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres, Transaction};

use super::EmployeeRepository;
use crate::models::employee::Employee;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, position, department, role_id, created_at, updated_at";

const INSERT: &str = "INSERT INTO employee (name, email, position, department, role_id)
     VALUES ($1, $2, $3, $4, $5)
     RETURNING id, created_at, updated_at";

type Generated = (DbId, Timestamp, Timestamp);

/// Provides CRUD operations for employees.
#[derive(Debug, Clone)]
pub struct PgEmployeeRepo {
    pool: PgPool,
}

impl PgEmployeeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn bind_insert(employee: &Employee) -> QueryAs<'_, Postgres, Generated, PgArguments> {
    sqlx::query_as::<_, Generated>(INSERT)
        .bind(&employee.name)
        .bind(&employee.email)
        .bind(&employee.position)
        .bind(&employee.department)
        .bind(employee.role_id)
}

fn assign_generated(employee: &mut Employee, (id, created_at, updated_at): Generated) {
    employee.id = id;
    employee.created_at = created_at;
    employee.updated_at = updated_at;
}

#[async_trait]
impl EmployeeRepository for PgEmployeeRepo {
    type Tx = Transaction<'static, Postgres>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employee WHERE id = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_all(&self) -> Result<Vec<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employee ORDER BY id ASC");
        sqlx::query_as::<_, Employee>(&query)
            .fetch_all(&self.pool)
            .await
    }

    async fn find_by_ids(&self, ids: &[DbId]) -> Result<Vec<Employee>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM employee WHERE id = ANY($1) ORDER BY id ASC");
        sqlx::query_as::<_, Employee>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
    }

    async fn add(&self, employee: &mut Employee) -> Result<(), sqlx::Error> {
        let generated = bind_insert(employee).fetch_one(&self.pool).await?;
        assign_generated(employee, generated);
        Ok(())
    }

    async fn delete_by_id(&self, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM employee WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_by_ids(&self, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM employee WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn begin_transaction(&self) -> Result<Self::Tx, sqlx::Error> {
        self.pool.begin().await
    }

    async fn add_with_transaction(
        &self,
        tx: &mut Self::Tx,
        employee: &mut Employee,
    ) -> Result<(), sqlx::Error> {
        let generated = bind_insert(employee).fetch_one(&mut **tx).await?;
        assign_generated(employee, generated);
        Ok(())
    }

    async fn find_by_email_with_transaction(
        &self,
        tx: &mut Self::Tx,
        email: &str,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employee WHERE email = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(email)
            .fetch_optional(&mut **tx)
            .await
    }
}
