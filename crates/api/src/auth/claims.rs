//! Claims carried by access tokens from the identity provider.

use idm_core::roles;
use serde::{Deserialize, Serialize};

/// `realm_access` claim: roles granted at realm level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealmAccess {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// `aud` may be a single string or an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

/// Registered JWT claims (RFC 7519 §4.1).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

/// Verified token claims, stored in request extensions by the
/// authentication middleware.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdmClaims {
    #[serde(default)]
    pub realm_access: RealmAccess,
    #[serde(flatten)]
    pub registered: RegisteredClaims,
}

impl IdmClaims {
    pub fn roles(&self) -> &[String] {
        &self.realm_access.roles
    }

    pub fn has_role(&self, role: &str) -> bool {
        roles::has_role(self.roles(), role)
    }

    pub fn has_any_role(&self, required: &[&str]) -> bool {
        roles::has_any_role(self.roles(), required)
    }
}
