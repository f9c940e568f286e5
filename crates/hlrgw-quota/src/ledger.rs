//! The day-scoped usage ledger enforcing the daily request cap.
//!
//! The ledger never resets explicitly: the storage key carries the calendar
//! date, so a new day means a new key, and stale entries age out through the
//! store's TTL.

use crate::error::{QuotaError, Result};
use crate::store::UsageStore;
use chrono::{FixedOffset, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Scope suffix appended to the day key. One global counter for now.
const KEY_SCOPE: &str = "global";

/// Entries outlive their day by enough to survive clock skew, then vanish.
const ENTRY_TTL: Duration = Duration::from_secs(60 * 60 * 48);

/// Non-mutating view of today's usage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub count: u64,
    pub cap: u64,
}

/// Outcome of one admission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub over_cap: bool,
    pub count: u64,
}

/// Day-scoped shared counter with a configurable cap.
///
/// `increment_and_check` is read-then-write, not atomic: concurrent requests
/// racing on the same day key can undercount. Accepted approximation for a
/// soft abuse-prevention cap.
pub struct QuotaLedger {
    store: Arc<dyn UsageStore>,
    cap: u64,
    offset: FixedOffset,
}

impl QuotaLedger {
    pub fn new(store: Arc<dyn UsageStore>, cap: u64, offset: FixedOffset) -> Self {
        Self { store, cap, offset }
    }

    pub fn cap(&self) -> u64 {
        self.cap
    }

    /// Storage key for the current calendar day in the configured offset
    fn day_key(&self) -> String {
        let today = Utc::now().with_timezone(&self.offset).date_naive();
        format!("{}:{}", today.format("%Y-%m-%d"), KEY_SCOPE)
    }

    /// Read today's count without mutating. Absent or non-numeric values
    /// read as zero.
    pub async fn peek(&self) -> Result<Usage> {
        let count = self.read_count(&self.day_key()).await?;
        Ok(Usage {
            count,
            cap: self.cap,
        })
    }

    /// Count one request and report whether it pushed past the cap.
    ///
    /// The new value is persisted before the cap compare, so the tripping
    /// request and every rejected request after it still increment the
    /// stored counter; the exposed count may exceed the cap within a day.
    pub async fn increment_and_check(&self) -> Result<Admission> {
        let key = self.day_key();
        let next = self.read_count(&key).await? + 1;
        self.store
            .put(&key, &next.to_string(), ENTRY_TTL)
            .await?;
        Ok(Admission {
            over_cap: next > self.cap,
            count: next,
        })
    }

    async fn read_count(&self, key: &str) -> Result<u64> {
        let raw = self.store.get(key).await?;
        Ok(raw
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0))
    }
}

/// Parse a timezone offset string into a [`FixedOffset`].
///
/// Accepts `"UTC"`, `"Z"`, and numeric offsets in the `+HH:MM`, `+HHMM`
/// and `+HH` forms.
pub fn parse_utc_offset(s: &str) -> Result<FixedOffset> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
        return Ok(FixedOffset::east_opt(0).unwrap());
    }

    let invalid = || QuotaError::InvalidTimezone(s.to_string());

    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'+') => (1i32, &trimmed[1..]),
        Some(b'-') => (-1i32, &trimmed[1..]),
        _ => return Err(invalid()),
    };
    // str::parse would tolerate a second sign here
    if !rest.bytes().all(|b| b.is_ascii_digit() || b == b':') {
        return Err(invalid());
    }

    let (hours, minutes): (i32, i32) = if let Some((h, m)) = rest.split_once(':') {
        (
            h.parse().map_err(|_| invalid())?,
            m.parse().map_err(|_| invalid())?,
        )
    } else if rest.len() == 4 {
        (
            rest[..2].parse().map_err(|_| invalid())?,
            rest[2..].parse().map_err(|_| invalid())?,
        )
    } else {
        (rest.parse().map_err(|_| invalid())?, 0)
    };

    if hours > 14 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn ledger_with_cap(cap: u64) -> QuotaLedger {
        QuotaLedger::new(
            Arc::new(MemoryStore::new()),
            cap,
            parse_utc_offset("UTC").unwrap(),
        )
    }

    #[tokio::test]
    async fn fresh_day_reads_as_zero() {
        let ledger = ledger_with_cap(1000);
        let usage = ledger.peek().await.unwrap();

        assert_eq!(usage.count, 0);
        assert_eq!(usage.cap, 1000);
    }

    #[tokio::test]
    async fn requests_under_the_cap_are_admitted() {
        let ledger = ledger_with_cap(3);

        for expected in 1..=3 {
            let adm = ledger.increment_and_check().await.unwrap();
            assert!(!adm.over_cap);
            assert_eq!(adm.count, expected);
        }
    }

    #[tokio::test]
    async fn the_tripping_request_still_counts() {
        let ledger = ledger_with_cap(3);
        for _ in 0..3 {
            ledger.increment_and_check().await.unwrap();
        }

        let adm = ledger.increment_and_check().await.unwrap();
        assert!(adm.over_cap);
        assert_eq!(adm.count, 4);

        // and the stored counter reflects it
        assert_eq!(ledger.peek().await.unwrap().count, 4);
    }

    #[tokio::test]
    async fn rejected_requests_keep_incrementing() {
        let ledger = ledger_with_cap(1);
        for _ in 0..5 {
            ledger.increment_and_check().await.unwrap();
        }

        assert_eq!(ledger.peek().await.unwrap().count, 5);
    }

    #[tokio::test]
    async fn garbage_stored_values_read_as_zero() {
        let store = Arc::new(MemoryStore::new());
        let ledger = QuotaLedger::new(store.clone(), 10, parse_utc_offset("UTC").unwrap());

        // poison today's key, then watch the ledger recover
        let key = ledger.day_key();
        store
            .put(&key, "not-a-number", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(ledger.peek().await.unwrap().count, 0);
        let adm = ledger.increment_and_check().await.unwrap();
        assert_eq!(adm.count, 1);
    }

    #[tokio::test]
    async fn day_key_is_date_plus_scope() {
        let ledger = ledger_with_cap(10);
        let key = ledger.day_key();

        let (date, scope) = key.split_once(':').unwrap();
        assert_eq!(scope, "global");
        assert_eq!(date.len(), 10);
        assert!(date.chars().filter(|c| *c == '-').count() == 2);
    }

    #[test]
    fn offset_parsing_accepts_common_forms() {
        assert_eq!(parse_utc_offset("UTC").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("+01:00").unwrap().local_minus_utc(), 3600);
        assert_eq!(parse_utc_offset("-0530").unwrap().local_minus_utc(), -19800);
        assert_eq!(parse_utc_offset("+02").unwrap().local_minus_utc(), 7200);
    }

    #[test]
    fn offset_parsing_rejects_nonsense() {
        assert!(parse_utc_offset("Europe/Nowhere").is_err());
        assert!(parse_utc_offset("+25:00").is_err());
        assert!(parse_utc_offset("++01").is_err());
    }
}
