use crate::types::DbId;
use crate::validation::{FieldError, ValidationFailure};

/// Domain error taxonomy shared by services and the HTTP layer.
///
/// Each variant maps to exactly one HTTP status in `idm_api::error`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The request failed syntactic or semantic checks. `details` carries
    /// one entry per failing field and may be empty for whole-request errors.
    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<FieldError>,
    },

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Validation error without field-level details.
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation {
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Internal error carrying the failing operation and its cause.
    pub fn internal(context: &str, cause: impl std::fmt::Display) -> Self {
        CoreError::Internal(format!("{context}: {cause}"))
    }
}

impl From<ValidationFailure> for CoreError {
    fn from(failure: ValidationFailure) -> Self {
        CoreError::Validation {
            message: failure.to_string(),
            details: failure.into_fields(),
        }
    }
}
