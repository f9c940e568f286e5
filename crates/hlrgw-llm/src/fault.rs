//! Fault classification for dispatch errors.
//!
//! The direct-binding strategy has no structured error channel, so quota
//! exhaustion can only be recognized from the wording of upstream error
//! messages. The vocabulary lives here, behind one named function, so it can
//! be updated without touching call sites.

use crate::error::DispatchError;
use hlrgw_types::Reason;

/// Substrings that mark a fault as quota-like. Case-insensitive.
const QUOTA_VOCABULARY: &[&str] = &[
    "quota",
    "limit",
    "exhaust",
    "rate limit",
    "rate-limit",
    "ratelimit",
    "insufficient",
    "credits",
];

/// Map a dispatch fault onto an envelope reason.
///
/// A structural [`DispatchError::ProviderQuota`] maps directly; for every
/// other fault the display text is matched against the quota vocabulary.
/// Matches become `provider_quota`, the rest `internal_error`.
pub fn classify_fault(err: &DispatchError) -> Reason {
    if matches!(err, DispatchError::ProviderQuota(_)) {
        return Reason::ProviderQuota;
    }

    let text = err.to_string().to_lowercase();
    if QUOTA_VOCABULARY.iter().any(|word| text.contains(word)) {
        Reason::ProviderQuota
    } else {
        Reason::InternalError
    }
}
