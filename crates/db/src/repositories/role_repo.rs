//! Postgres repository for the `role` table.

use async_trait::async_trait;
use idm_core::types::{DbId, Timestamp};
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres, Transaction};

use super::RoleRepository;
use crate::models::role::Role;

const COLUMNS: &str = "id, name, description, status, parent_id, created_at, updated_at";

type Generated = (DbId, Timestamp, Timestamp);

/// Provides CRUD operations for roles.
#[derive(Debug, Clone)]
pub struct PgRoleRepo {
    pool: PgPool,
}

impl PgRoleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn insert_query(role: &Role) -> QueryAs<'_, Postgres, Generated, PgArguments> {
    sqlx::query_as::<_, Generated>(
        "INSERT INTO role (name, description, status, parent_id)
         VALUES ($1, $2, $3, $4)
         RETURNING id, created_at, updated_at",
    )
    .bind(&role.name)
    .bind(&role.description)
    .bind(role.status)
    .bind(role.parent_id)
}

#[async_trait]
impl RoleRepository for PgRoleRepo {
    type Tx = Transaction<'static, Postgres>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM role WHERE id = $1");
        sqlx::query_as::<_, Role>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_all(&self) -> Result<Vec<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM role ORDER BY id ASC");
        sqlx::query_as::<_, Role>(&query).fetch_all(&self.pool).await
    }

    async fn find_by_ids(&self, ids: &[DbId]) -> Result<Vec<Role>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM role WHERE id = ANY($1) ORDER BY id ASC");
        sqlx::query_as::<_, Role>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
    }

    async fn add(&self, role: &mut Role) -> Result<(), sqlx::Error> {
        let (id, created_at, updated_at) = insert_query(role).fetch_one(&self.pool).await?;
        role.id = id;
        role.created_at = created_at;
        role.updated_at = updated_at;
        Ok(())
    }

    async fn delete_by_id(&self, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM role WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_by_ids(&self, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM role WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn begin_transaction(&self) -> Result<Self::Tx, sqlx::Error> {
        self.pool.begin().await
    }

    async fn add_with_transaction(&self, tx: &mut Self::Tx, role: &mut Role) -> Result<(), sqlx::Error> {
        let (id, created_at, updated_at) = insert_query(role).fetch_one(&mut **tx).await?;
        role.id = id;
        role.created_at = created_at;
        role.updated_at = updated_at;
        Ok(())
    }

    async fn find_by_name_with_transaction(
        &self,
        tx: &mut Self::Tx,
        name: &str,
    ) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM role WHERE name = $1");
        sqlx::query_as::<_, Role>(&query)
            .bind(name)
            .fetch_optional(&mut **tx)
            .await
    }
}
