//! The chat endpoint: admission control, dispatch, and response
//! normalization onto the envelope contract.

use crate::cors::{envelope_response, preflight_response, ALLOWED_METHODS};
use crate::gate::{classify, Verdict};
use crate::routes::usage_snapshot;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use hlrgw_llm::classify_fault;
use hlrgw_types::{
    latest_user_text, normalize_messages, truncate_for_budget, ChatMessage, ChatResponse, Reason,
    UsageSnapshot,
};
use serde_json::Value;

/// Synthesized scope message prepended to every dispatched conversation
const SYSTEM_PROMPT: &str = "You are \"HLR Lookup Assistant\". Be concise.\n\
- Provide runnable curl when asked.\n\
- Ask for missing required params.\n\
- Stay on HLR Lookup docs/API topics.\n";

fn request_origin(headers: &HeaderMap) -> &str {
    headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// `POST /api/chat`
pub async fn chat(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let origin = request_origin(&headers);
    if !state.origin_guard.is_allowed(origin) {
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    }

    // Malformed bodies degrade to an empty message list, never a 400
    let raw: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let messages = normalize_messages(&raw);
    let latest = latest_user_text(&messages);

    // Fast on-topic guard, before anything costs money
    if !state.config.gate.allow_offtopic && classify(latest) != Verdict::Allow {
        let usage = usage_snapshot(&state).await;
        return envelope_response(
            &state.origin_guard,
            origin,
            StatusCode::OK,
            &ChatResponse::rejected(Reason::OffTopic, usage),
        );
    }

    // Daily cap check before the model call; the increment sticks either way
    let admission = match state.ledger.increment_and_check().await {
        Ok(admission) => admission,
        Err(err) => {
            tracing::error!(%err, "quota ledger unavailable");
            let usage = UsageSnapshot::new(0, state.ledger.cap());
            return envelope_response(
                &state.origin_guard,
                origin,
                StatusCode::INTERNAL_SERVER_ERROR,
                &ChatResponse::error(Reason::InternalError, usage),
            );
        }
    };
    if admission.over_cap {
        let usage = UsageSnapshot::new(admission.count, state.ledger.cap());
        return envelope_response(
            &state.origin_guard,
            origin,
            StatusCode::TOO_MANY_REQUESTS,
            &ChatResponse::closed(Reason::DailyCap, usage),
        );
    }

    // Compose the prompt: one scope message plus the trimmed transcript
    let mut composed = vec![ChatMessage::system(SYSTEM_PROMPT)];
    composed.extend(truncate_for_budget(&messages));

    match state
        .completion
        .complete(&composed, state.config.llm.max_tokens)
        .await
    {
        Ok(content) => {
            let usage = usage_snapshot(&state).await;
            envelope_response(
                &state.origin_guard,
                origin,
                StatusCode::OK,
                &ChatResponse::ok(content, usage),
            )
        }
        Err(err) => {
            let reason = classify_fault(&err);
            tracing::warn!(%err, ?reason, "completion dispatch failed");
            let usage = usage_snapshot(&state).await;
            let (status, envelope) = match reason {
                Reason::ProviderQuota => (
                    StatusCode::TOO_MANY_REQUESTS,
                    ChatResponse::closed(Reason::ProviderQuota, usage),
                ),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ChatResponse::error(Reason::InternalError, usage),
                ),
            };
            envelope_response(&state.origin_guard, origin, status, &envelope)
        }
    }
}

/// `OPTIONS /api/chat` preflight
pub async fn preflight(State(state): State<AppState>, headers: HeaderMap) -> Response {
    preflight_response(&state.origin_guard, request_origin(&headers))
}

/// Any other method on `/api/chat`
pub async fn method_not_allowed(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let usage = usage_snapshot(&state).await;
    let mut response = envelope_response(
        &state.origin_guard,
        request_origin(&headers),
        StatusCode::METHOD_NOT_ALLOWED,
        &ChatResponse::error(Reason::InternalError, usage),
    );
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
    response
}
