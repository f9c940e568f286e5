//! Conversation shaping applied before dispatch: message normalization,
//! the per-request message cap, and the trailing character budget.

use crate::message::{ChatMessage, Role};
use serde_json::Value;

/// Maximum number of messages accepted per request (most recent kept)
pub const MAX_MESSAGES: usize = 24;

/// Trailing character budget for the composed prompt
pub const MAX_PROMPT_CHARS: usize = 4000;

/// Normalize a raw request body into a message list.
///
/// Accepts `{ "messages": [...] }` with malformed entries silently dropped,
/// or the legacy `{ "text": "..." }` form converted to one user message.
/// Only the last [`MAX_MESSAGES`] entries are retained.
pub fn normalize_messages(body: &Value) -> Vec<ChatMessage> {
    let mut msgs: Vec<ChatMessage> = body
        .get("messages")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let role = item.get("role").and_then(Value::as_str)?;
                    let content = item.get("content").and_then(Value::as_str)?;
                    Some(ChatMessage::new(Role::parse(role)?, content))
                })
                .collect()
        })
        .unwrap_or_default();

    if msgs.is_empty() {
        if let Some(text) = body.get("text").and_then(Value::as_str) {
            msgs.push(ChatMessage::user(text));
        }
    }

    if msgs.len() > MAX_MESSAGES {
        msgs.split_off(msgs.len() - MAX_MESSAGES)
    } else {
        msgs
    }
}

/// Content of the most recent user-authored message, scanning from the end.
/// The full transcript is never classified, only this message.
pub fn latest_user_text(messages: &[ChatMessage]) -> &str {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .unwrap_or("")
}

/// Trim a message list to the trailing [`MAX_PROMPT_CHARS`] character budget.
///
/// Walks from the newest message backwards; the oldest messages are dropped
/// first, and the single message that straddles the budget boundary is
/// truncated from its start so the most recent text survives.
pub fn truncate_for_budget(messages: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut out: Vec<ChatMessage> = Vec::new();
    let mut budget = MAX_PROMPT_CHARS;

    for msg in messages.iter().rev() {
        let len = msg.content.chars().count();
        if len <= budget {
            out.push(msg.clone());
            budget -= len;
        } else {
            let tail: String = msg
                .content
                .chars()
                .skip(len - budget)
                .collect();
            out.push(ChatMessage::new(msg.role, tail));
            budget = 0;
        }
        if budget == 0 {
            break;
        }
    }

    out.reverse();
    out
}
