//! Extractor wrappers whose rejections use the failure envelope.

use axum::extract::{FromRequest, FromRequestParts};
use idm_core::types::DbId;
use serde::Deserialize;

use crate::error::AppError;

/// JSON body; malformed input is a 400 envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Path parameters; unparsable segments are a 400 envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct PathParam<T>(pub T);

/// Query string; unparsable parameters are a 400 envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);

/// `?ids=1,2,3` on bulk deletes.
#[derive(Debug, Deserialize)]
pub struct IdsParam {
    pub ids: Option<String>,
}

impl IdsParam {
    /// Parse the comma-separated list.
    ///
    /// A missing parameter or any element that is not a 64-bit integer is
    /// rejected; an empty value yields an empty list.
    pub fn parse(&self) -> Result<Vec<DbId>, AppError> {
        let raw = self
            .ids
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("Missing query parameter: ids".into()))?;
        parse_ids(raw)
    }
}

pub fn parse_ids(raw: &str) -> Result<Vec<DbId>, AppError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<DbId>()
                .map_err(|_| AppError::BadRequest(format!("Invalid id {part:?} in ids")))
        })
        .collect()
}
