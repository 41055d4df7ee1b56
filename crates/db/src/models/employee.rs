//! Employee entity.

use serde::Serialize;
use sqlx::FromRow;
use idm_core::types::{DbId, Timestamp};

/// An employee row from the `employee` table.
///
/// `id`, `created_at` and `updated_at` are assigned by the store; values set
/// before insertion are placeholders overwritten by `add*`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Employee {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub position: Option<String>,
    pub department: Option<String>,
    pub role_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Employee {
    /// An unsaved employee.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        position: Option<String>,
        department: Option<String>,
        role_id: DbId,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: 0,
            name: name.into(),
            email: email.into(),
            position,
            department,
            role_id,
            created_at: now,
            updated_at: now,
        }
    }
}
