use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Key-value store backing the usage ledger
///
/// Keys are single day-scoped strings; values are stringified counters.
/// Implementations only need best-effort single-key read/write semantics;
/// the ledger tolerates the check-then-act race. A backend with a true
/// atomic increment may use it without changing the observable contract.
#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Read the stored value for a key, if present and not expired
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value with a time-to-live after which it disappears
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
}

/// In-memory store for tests and single-instance deployments
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

struct Entry {
    value: String,
    expires_at: Instant,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsageStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|e| e.expires_at > Instant::now())
            .map(|e| e.value.clone()))
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut entries = self.entries.write().await;
        // day-keyed entries would otherwise pile up for the process lifetime
        let now = Instant::now();
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }
}
