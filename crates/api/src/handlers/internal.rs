//! Unauthenticated service endpoints under `/internal`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

/// GET /internal/info
pub async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        name: state.config.name.clone(),
        version: state.config.version.clone(),
    })
}

/// GET /internal/health
///
/// 200 when the database answers a ping, 503 when it fails or when no
/// database is wired.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match &state.database {
        None => "NOT_CONNECTED",
        Some(probe) => match probe.ping().await {
            Ok(()) => "OK",
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                "ERROR"
            }
        },
    };

    let (status, overall) = if database == "OK" {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "ERROR")
    };

    (
        status,
        Json(HealthResponse {
            status: overall.to_string(),
            database: database.to_string(),
        }),
    )
}
