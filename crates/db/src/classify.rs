//! Constraint-violation detection on driver errors.
//!
//! Repositories hand `sqlx::Error` back unchanged; services use
//! [`constraint_violation`] to decide between `AlreadyExists`, `Validation`
//! and `Internal`.

use sqlx::error::ErrorKind;

/// Integrity constraint reported by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintViolation {
    /// Duplicate value on a unique index (SQLSTATE 23505).
    Unique { constraint: Option<String> },
    /// Missing or still-referenced row (SQLSTATE 23503).
    ForeignKey { constraint: Option<String> },
}

/// Classify `err` as a constraint violation, if it is one.
pub fn constraint_violation(err: &sqlx::Error) -> Option<ConstraintViolation> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    let constraint = db_err.constraint().map(str::to_string);
    match db_err.kind() {
        ErrorKind::UniqueViolation => Some(ConstraintViolation::Unique { constraint }),
        ErrorKind::ForeignKeyViolation => Some(ConstraintViolation::ForeignKey { constraint }),
        _ => None,
    }
}
