//! Persistence layer for the IDM service.
//!
//! - [`create_pool`] / [`health_check`] / [`run_migrations`] -- the database gateway.
//! - [`models`] -- `FromRow` entity structs.
//! - [`repositories`] -- repository traits and their Postgres implementations.
//! - [`classify`] -- constraint-violation detection on driver errors.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;

pub mod classify;
pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Connection-pool bounds.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// Connections kept open while idle.
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 20,
            min_connections: 5,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, settings: &PoolSettings) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections.min(settings.max_connections))
        .acquire_timeout(settings.acquire_timeout)
        .idle_timeout(settings.idle_timeout)
        .max_lifetime(settings.max_lifetime)
        .connect(database_url)
        .await
}

/// Ping the database with a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Liveness probe used by `GET /internal/health`.
#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    async fn ping(&self) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl DatabaseProbe for DbPool {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        health_check(self).await
    }
}
