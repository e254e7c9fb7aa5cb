//! In-process substrate
//!
//! Holds entries in memory. Reads and writes can be made to fail on demand,
//! and writes are counted, so tests can observe exactly what a store did.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{KeyValueStore, Record, SubstrateError, SubstrateResult};

/// Substrate backed by an in-memory record
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<Record>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries
    pub fn with_entries(entries: Record) -> Self {
        Self {
            entries: Mutex::new(entries),
            ..Self::default()
        }
    }

    /// Make every subsequent read fail (or succeed again)
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of `set` calls applied
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Copy of everything currently stored
    pub fn snapshot(&self) -> SubstrateResult<Record> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> SubstrateResult<std::sync::MutexGuard<'_, Record>> {
        self.entries
            .lock()
            .map_err(|_| SubstrateError::Unavailable("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> SubstrateResult<Record> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(SubstrateError::Unavailable("reads are disabled".to_string()));
        }

        let entries = self.lock()?;
        let record = keys
            .iter()
            .filter_map(|key| {
                entries
                    .get(*key)
                    .map(|value| (key.to_string(), value.clone()))
            })
            .collect();

        Ok(record)
    }

    async fn set(&self, items: Record) -> SubstrateResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SubstrateError::Unavailable("writes are disabled".to_string()));
        }

        let mut entries = self.lock()?;
        entries.extend(items);

        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(key: &str, value: serde_json::Value) -> Record {
        let mut record = Record::new();
        record.insert(key.to_string(), value);
        record
    }

    #[tokio::test]
    async fn test_get_missing_keys_is_empty() {
        let store = MemoryStore::new();
        let result = store.get(&["bookmarks", "tags"]).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let store = MemoryStore::new();
        store.set(record("tags", json!([]))).await.unwrap();

        let result = store.get(&["tags", "settings"]).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result["tags"], json!([]));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_set_leaves_other_keys_alone() {
        let store = MemoryStore::with_entries(record("settings", json!({"theme": "dark"})));
        store.set(record("tags", json!([]))).await.unwrap();

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot["settings"], json!({"theme": "dark"}));
        assert_eq!(snapshot["tags"], json!([]));
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = MemoryStore::new();

        store.set_fail_reads(true);
        assert!(matches!(
            store.get(&["tags"]).await,
            Err(SubstrateError::Unavailable(_))
        ));

        store.set_fail_writes(true);
        assert!(store.set(record("tags", json!([]))).await.is_err());
        assert_eq!(store.write_count(), 0);

        store.set_fail_reads(false);
        store.set_fail_writes(false);
        store.set(record("tags", json!([]))).await.unwrap();
        assert!(store.get(&["tags"]).await.is_ok());
    }
}
