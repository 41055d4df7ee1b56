//! Role request and response DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{DbId, Timestamp};
use crate::validation::FieldOrder;

/// Body of `POST /api/v1/roles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateRoleRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(length(min = 5, max = 500))]
    pub description: String,
    /// Enabled unless explicitly disabled.
    pub status: bool,
    #[validate(range(min = 1))]
    pub parent_id: Option<DbId>,
}

impl Default for CreateRoleRequest {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            status: true,
            parent_id: None,
        }
    }
}

impl FieldOrder for CreateRoleRequest {
    const FIELDS: &'static [&'static str] = &["name", "description", "parent_id"];
}

/// Role as returned to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleResponse {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub status: bool,
    pub parent_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
