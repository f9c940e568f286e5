//! Origin guard and CORS header handling.
//!
//! The allow-list gates every mutating call: a disallowed origin gets a bare
//! 403 with no CORS headers, and its preflight gets the literal "null"
//! allow-origin, so the browser blocks the client-side read either way.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use hlrgw_types::ChatResponse;

pub const ALLOWED_METHODS: &str = "POST, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization";
pub const PREFLIGHT_MAX_AGE: &str = "86400";

/// Configured origin allow-list
#[derive(Debug, Clone)]
pub struct OriginGuard {
    origins: Vec<String>,
}

impl OriginGuard {
    /// Parse a comma-separated allow-list; blank entries are ignored
    pub fn from_list(allowed: &str) -> Self {
        Self {
            origins: allowed
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Empty origins always reject
    pub fn is_allowed(&self, origin: &str) -> bool {
        !origin.is_empty() && self.origins.iter().any(|o| o == origin)
    }
}

/// JSON envelope response with CORS and caching headers applied.
///
/// `Access-Control-Allow-Origin` is only attached when the origin passed the
/// guard; `Vary: Origin` and `Cache-Control: no-store` always are.
pub fn envelope_response(
    guard: &OriginGuard,
    origin: &str,
    status: StatusCode,
    envelope: &ChatResponse,
) -> Response {
    let mut response = (status, axum::Json(envelope.clone())).into_response();
    let headers = response.headers_mut();
    headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    if guard.is_allowed(origin) {
        if let Ok(value) = HeaderValue::from_str(origin) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
    }
    response
}

/// CORS preflight response for `OPTIONS /api/chat`
pub fn preflight_response(guard: &OriginGuard, origin: &str) -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(PREFLIGHT_MAX_AGE),
    );

    if guard.is_allowed(origin) {
        if let Ok(value) = HeaderValue::from_str(origin) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
    } else {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("null"),
        );
    }

    response
}
