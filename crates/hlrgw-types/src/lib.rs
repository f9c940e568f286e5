pub mod envelope;
pub mod message;
pub mod shaping;

pub use envelope::{ChatResponse, Reason, UsageSnapshot, RESET_AT_UTC};
pub use message::{ChatMessage, ChatPayload, Role};
pub use shaping::{
    latest_user_text, normalize_messages, truncate_for_budget, MAX_MESSAGES, MAX_PROMPT_CHARS,
};
