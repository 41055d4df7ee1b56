//! Role entity.

use serde::Serialize;
use sqlx::FromRow;
use idm_core::types::{DbId, Timestamp};

/// A role row from the `role` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub status: bool,
    pub parent_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Role {
    /// An unsaved role.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        status: bool,
        parent_id: Option<DbId>,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: 0,
            name: name.into(),
            description,
            status,
            parent_id,
            created_at: now,
            updated_at: now,
        }
    }
}
