//! Shared application router builder.
//!
//! Provides [`build_app_router`] so both the production binary (`main.rs`)
//! and integration tests (`tests/common/mod.rs`) use the exact same middleware
//! stack.

use std::any::Any;
use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::handlers;
use crate::middleware::access_log::make_request_span;
use crate::middleware::auth::authenticate;
use crate::middleware::REQUEST_ID_HEADER;
use crate::routes;
use crate::state::AppState;
use crate::telemetry;

/// Build the full application [`Router`] with all middleware layers.
///
/// Route groups:
///
/// - `/internal` -- info and health, no authentication, `X-Internal-API: true`.
/// - `/api/v1` -- Bearer authentication on every path (unknown ones
///   included), `X-API-Version: v1`.
///
/// The middleware stack, outermost first:
///
/// 1. Panic recovery (500 envelope)
/// 2. Set request ID on incoming requests
/// 3. Propagate request ID to response
/// 4. Access log span and completion event
/// 5. Timeout envelope (the bare 408 becomes a failure envelope)
/// 6. Request timeout
/// 7. CORS
pub fn build_app_router(state: AppState) -> Router {
    let config = state.config.clone();
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let api = routes::api_routes()
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            authenticate,
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-api-version"),
            HeaderValue::from_static("v1"),
        ));

    let internal = routes::internal::router()
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-internal-api"),
            HeaderValue::from_static("true"),
        ));

    Router::new()
        .nest("/internal", internal)
        .nest("/api/v1", api)
        .fallback(handlers::not_found)
        // -- Middleware stack (applied bottom-up) --
        .layer(build_cors_layer(&config))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(axum::middleware::map_response(envelope_timeout))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(make_request_span)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = telemetry::panic_message(payload.as_ref());
    AppError::InternalError(format!("handler panicked: {message}")).into_response()
}

/// Only the timeout layer answers 408, with an empty body.
async fn envelope_timeout(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return AppError::Timeout.into_response();
    }
    response
}

/// Build the CORS middleware layer from the configured origins.
///
/// Origins were checked when the configuration was loaded; an empty list
/// allows no cross-origin callers.
pub fn build_cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .max_age(Duration::from_secs(3600))
}
