use serde::{Deserialize, Serialize};

/// Reset boundary surfaced to clients. Fixed by contract at 00:00 UTC and
/// independent of the timezone used for the quota day key; a display hint only.
pub const RESET_AT_UTC: &str = "00:00";

/// Reason codes attached to every non-`ok` envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    DailyCap,
    ProviderQuota,
    OffTopic,
    InternalError,
}

/// Usage snapshot attached to every envelope variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub count: u64,
    pub cap: u64,
    #[serde(rename = "resetAtUTC")]
    pub reset_at_utc: String,
}

impl UsageSnapshot {
    pub fn new(count: u64, cap: u64) -> Self {
        Self {
            count,
            cap,
            reset_at_utc: RESET_AT_UTC.to_string(),
        }
    }

    /// Snapshot used by the client wrapper when no round trip succeeded
    pub fn zero() -> Self {
        Self::new(0, 0)
    }
}

/// The discriminated response envelope returned to every caller
///
/// Exactly one variant is populated per response. `content` carries generated
/// text on `Ok` and optional user-facing messaging on the failure variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ChatResponse {
    Ok {
        content: String,
        usage: UsageSnapshot,
    },
    Closed {
        reason: Reason,
        usage: UsageSnapshot,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
    Rejected {
        reason: Reason,
        usage: UsageSnapshot,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
    Error {
        reason: Reason,
        usage: UsageSnapshot,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
}

impl ChatResponse {
    pub fn ok(content: impl Into<String>, usage: UsageSnapshot) -> Self {
        Self::Ok {
            content: content.into(),
            usage,
        }
    }

    pub fn closed(reason: Reason, usage: UsageSnapshot) -> Self {
        Self::Closed {
            reason,
            usage,
            content: None,
        }
    }

    pub fn rejected(reason: Reason, usage: UsageSnapshot) -> Self {
        Self::Rejected {
            reason,
            usage,
            content: None,
        }
    }

    pub fn error(reason: Reason, usage: UsageSnapshot) -> Self {
        Self::Error {
            reason,
            usage,
            content: None,
        }
    }

    pub fn error_with_message(
        reason: Reason,
        usage: UsageSnapshot,
        content: impl Into<String>,
    ) -> Self {
        Self::Error {
            reason,
            usage,
            content: Some(content.into()),
        }
    }

    /// Usage carried by this envelope, whichever variant
    pub fn usage(&self) -> &UsageSnapshot {
        match self {
            Self::Ok { usage, .. }
            | Self::Closed { usage, .. }
            | Self::Rejected { usage, .. }
            | Self::Error { usage, .. } => usage,
        }
    }

    pub fn is_internal_error(&self) -> bool {
        matches!(
            self,
            Self::Error {
                reason: Reason::InternalError,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_serializes_with_status_tag() {
        let envelope = ChatResponse::ok("hello", UsageSnapshot::new(3, 1000));
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["status"], "ok");
        assert_eq!(json["content"], "hello");
        assert_eq!(json["usage"]["count"], 3);
        assert_eq!(json["usage"]["cap"], 1000);
        assert_eq!(json["usage"]["resetAtUTC"], "00:00");
    }

    #[test]
    fn failure_envelope_uses_snake_case_reasons() {
        let envelope = ChatResponse::closed(Reason::DailyCap, UsageSnapshot::new(1001, 1000));
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["status"], "closed");
        assert_eq!(json["reason"], "daily_cap");
        assert!(json.get("content").is_none());
    }

    #[test]
    fn envelope_roundtrips_through_json() {
        let envelope = ChatResponse::error_with_message(
            Reason::InternalError,
            UsageSnapshot::zero(),
            "Network error.",
        );
        let json = serde_json::to_string(&envelope).unwrap();
        let back: ChatResponse = serde_json::from_str(&json).unwrap();

        assert_eq!(back, envelope);
        assert!(back.is_internal_error());
    }

    #[test]
    fn reason_strings_match_the_wire_contract() {
        for (reason, expected) in [
            (Reason::DailyCap, "\"daily_cap\""),
            (Reason::ProviderQuota, "\"provider_quota\""),
            (Reason::OffTopic, "\"off_topic\""),
            (Reason::InternalError, "\"internal_error\""),
        ] {
            assert_eq!(serde_json::to_string(&reason).unwrap(), expected);
        }
    }
}
