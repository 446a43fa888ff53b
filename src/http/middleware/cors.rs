//! CORS middleware.
//!
//! The allowed origin is the first allow-listed prefix of the request's
//! `Origin`; anything else gets the first allow-listed origin, so browsers
//! on unknown sites are refused without the server rejecting the request.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::config::CorsConfig;

/// Origin to echo for a request carrying `origin`.
pub fn resolve_origin<'a>(allowed: &'a [String], origin: &str) -> Option<&'a str> {
    allowed
        .iter()
        .find(|prefix| !prefix.is_empty() && origin.starts_with(prefix.as_str()))
        .or_else(|| allowed.first())
        .map(String::as_str)
}

pub async fn cors_middleware(
    State(cors): State<Arc<CorsConfig>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET"));
    if let Some(value) = resolve_origin(&cors.allowed_origins, &origin)
        .and_then(|o| HeaderValue::from_str(o).ok())
    {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    response
}
