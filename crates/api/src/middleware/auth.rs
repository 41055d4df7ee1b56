//! Bearer-token authentication for the `/api/v1` route group.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderName;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use idm_core::error::CoreError;

use super::access_log::client_ip;
use super::REQUEST_ID_HEADER;
use crate::auth::bearer_token;
use crate::auth::claims::IdmClaims;
use crate::error::AppError;
use crate::state::AppState;

/// Verify the request's Bearer token and store its [`IdmClaims`] in the
/// request extensions.
///
/// Mounted with `axum::middleware::from_fn_with_state` on the whole
/// `/api/v1` group, so unknown routes are authenticated too. On failure the
/// response is a 401 envelope that echoes `X-Request-ID`.
pub async fn authenticate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let verified = match bearer_token(header) {
        Ok(token) => state.verifier.verify(token).await,
        Err(err) => Err(err),
    };

    match verified {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(cause) => {
            let request_id = request.headers().get(REQUEST_ID_HEADER).cloned();
            tracing::error!(
                request_id = request_id
                    .as_ref()
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or(""),
                method = %request.method(),
                path = %request.uri().path(),
                client_ip = %client_ip(request.headers(), request.extensions()),
                error = %cause,
                "Authentication failed"
            );

            let mut response =
                AppError::Core(CoreError::Unauthorized(cause.client_message().into()))
                    .into_response();
            if let Some(id) = request_id {
                response
                    .headers_mut()
                    .insert(HeaderName::from_static(REQUEST_ID_HEADER), id);
            }
            response
        }
    }
}

/// Claims of the authenticated caller.
///
/// Only available behind [`authenticate`]; elsewhere the request is
/// rejected with 401.
impl FromRequestParts<AppState> for IdmClaims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<IdmClaims>().cloned().ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Authentication required".into()))
        })
    }
}
