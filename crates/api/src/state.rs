use std::sync::Arc;

use idm_db::repositories::{PgEmployeeRepo, PgRoleRepo};
use idm_db::{DatabaseProbe, DbPool};

use crate::auth::TokenVerifier;
use crate::config::AppConfig;
use crate::services::employee::EmployeeManager;
use crate::services::role::RoleManager;
use crate::services::{EmployeeService, RoleService};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Liveness probe for `/internal/health`; `None` when no database is wired.
    pub database: Option<Arc<dyn DatabaseProbe>>,
    pub employees: Arc<dyn EmployeeService>,
    pub roles: Arc<dyn RoleService>,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    /// Production wiring: Postgres-backed services sharing one pool.
    pub fn with_pool(config: AppConfig, pool: DbPool, verifier: TokenVerifier) -> Self {
        Self {
            config: Arc::new(config),
            database: Some(Arc::new(pool.clone())),
            employees: Arc::new(EmployeeManager::new(PgEmployeeRepo::new(pool.clone()))),
            roles: Arc::new(RoleManager::new(PgRoleRepo::new(pool))),
            verifier: Arc::new(verifier),
        }
    }
}
