//! Employee request and response DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{DbId, Timestamp};
use crate::validation::FieldOrder;

/// Body of `POST /api/v1/employees`.
///
/// Missing JSON fields deserialize to their zero value so that they surface
/// as `required` validation errors rather than as a body rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 2, max = 155))]
    pub name: String,
    #[validate(length(min = 1), email)]
    pub email: String,
    #[validate(length(min = 2, max = 100))]
    pub position: String,
    #[validate(length(min = 2, max = 100))]
    pub department: String,
    #[validate(range(min = 1))]
    pub role_id: DbId,
}

impl FieldOrder for CreateEmployeeRequest {
    const FIELDS: &'static [&'static str] = &["name", "email", "position", "department", "role_id"];
}

/// Employee as returned to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    pub role_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
