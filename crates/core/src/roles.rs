//! Well-known realm role names.
//!
//! These must match the realm roles configured at the OpenID Connect issuer.

pub const IDM_ADMIN: &str = "IDM_ADMIN";
pub const IDM_USER: &str = "IDM_USER";

/// Roles allowed to read employees and roles.
pub const READER_ROLES: &[&str] = &[IDM_USER, IDM_ADMIN];

/// Returns `true` if `granted` contains `required`.
pub fn has_role(granted: &[String], required: &str) -> bool {
    granted.iter().any(|r| r == required)
}

/// Returns `true` if `granted` and `required` intersect.
pub fn has_any_role(granted: &[String], required: &[&str]) -> bool {
    required.iter().any(|r| has_role(granted, r))
}
