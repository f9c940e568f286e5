use crate::routes::usage_snapshot;
use crate::state::AppState;
use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use hlrgw_types::UsageSnapshot;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub usage: UsageSnapshot,
    pub model: String,
}

/// Health check endpoint
///
/// Reports the current usage window and the configured model identifier.
pub async fn health_check(State(state): State<AppState>) -> Response {
    let body = HealthResponse {
        ok: true,
        usage: usage_snapshot(&state).await,
        model: state.config.llm.model.clone(),
    };

    let mut response = (StatusCode::OK, axum::Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
