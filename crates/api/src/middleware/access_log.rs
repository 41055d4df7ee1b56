//! Access-log span for `tower_http::trace::TraceLayer`.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request};
use axum::http::header::USER_AGENT;
use axum::http::{Extensions, HeaderMap};
use tracing::Span;

use super::REQUEST_ID_HEADER;

/// Span wrapping every request; all events logged while handling the
/// request carry these fields.
pub fn make_request_span(request: &Request) -> Span {
    let headers = request.headers();
    tracing::info_span!(
        "request",
        request_id = header_str(headers, REQUEST_ID_HEADER),
        method = %request.method(),
        path = %request.uri().path(),
        client_ip = %client_ip(headers, request.extensions()),
        user_agent = header_str(headers, USER_AGENT.as_str()),
    )
}

/// Originating client address: first `X-Forwarded-For` hop, else the peer
/// address, else `unknown`.
pub fn client_ip(headers: &HeaderMap, extensions: &Extensions) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return forwarded.to_string();
    }
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}
