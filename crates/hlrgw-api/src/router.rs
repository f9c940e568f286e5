use crate::middleware::logging;
use crate::routes::{chat, health};
use crate::state::AppState;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        .route(
            "/api/chat",
            post(chat::chat)
                .options(chat::preflight)
                .fallback(chat::method_not_allowed),
        )
        .fallback(not_found)
        .layer(axum::middleware::from_fn(logging::log_request))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
