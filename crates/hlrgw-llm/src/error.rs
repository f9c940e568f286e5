use thiserror::Error;

/// Faults raised by the completion strategies.
///
/// `ProviderQuota` is the only structurally classified variant; everything
/// else flows through the message-text heuristic in [`crate::fault`].
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Upstream answered 429 or 403: its own rate/credit limit, distinct
    /// from the local daily cap
    #[error("provider quota exhausted (status {0})")]
    ProviderQuota(u16),

    /// Extracted content was empty; never treated as a valid answer
    #[error("empty_response")]
    EmptyResponse,

    /// Gateway mode selected without a URL and API token
    #[error("AI gateway not configured")]
    NotConfigured,

    /// Any other non-success upstream status. The body text is carried
    /// because the fault classifier keys off it.
    #[error("upstream error (status {status}): {body}")]
    Upstream { status: u16, body: String },

    /// Covers connect failures and undecodable bodies alike
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
