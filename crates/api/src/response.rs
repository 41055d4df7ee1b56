//! Response envelope shared by every domain endpoint.
//!
//! ```json
//! { "success": true, "error": "", "data": 42 }
//! { "success": false, "error": "Employee with id 7 not found" }
//! ```
//!
//! `data` is omitted when there is nothing to return.

use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Handler return type for enveloped JSON.
pub type ApiJson<T> = Json<Envelope<T>>;

impl<T> Envelope<T> {
    /// Successful response carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            error: String::new(),
            data: Some(data),
        }
    }

    /// Failed response; `data` may carry structured details.
    pub fn failure(error: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: false,
            error: error.into(),
            data,
        }
    }
}

impl Envelope<()> {
    /// Successful response with no payload.
    pub fn empty() -> Self {
        Self {
            success: true,
            error: String::new(),
            data: None,
        }
    }
}
