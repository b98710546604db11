//! Instrumented key-value stores for persistence tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use gomarket_store::{KeyValueStore, MemoryStore, Result, StoreError};

/// A memory store whose reads and writes can be made to fail.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_gets: AtomicBool,
    fail_sets: AtomicBool,
    failed_sets: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing store.
    pub fn wrap(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// Make every `get` fail until reset.
    pub fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    /// Make every `set` fail until reset.
    pub fn fail_sets(&self, fail: bool) {
        self.fail_sets.store(fail, Ordering::SeqCst);
    }

    /// Number of writes rejected so far.
    pub fn failed_sets(&self) -> usize {
        self.failed_sets.load(Ordering::SeqCst)
    }

    /// The underlying store, bypassing failure injection.
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("injected read failure for {}", key)));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_sets.load(Ordering::SeqCst) {
            self.failed_sets.fetch_add(1, Ordering::SeqCst);
            return Err(StoreError::Unavailable(format!("injected write failure for {}", key)));
        }
        self.inner.set(key, value).await
    }
}

/// A memory store that records every value written.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    writes: Mutex<Vec<(String, String)>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing store.
    pub fn wrap(inner: MemoryStore) -> Self {
        Self {
            inner,
            writes: Mutex::default(),
        }
    }

    /// All `(key, value)` pairs written, oldest first.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// The most recent value written under `key`.
    pub fn last_write(&self, key: &str) -> Option<String> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

#[async_trait]
impl KeyValueStore for RecordingStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.inner.set(key, value).await?;
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((key.to_owned(), value.to_owned()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_flaky_store_injects_failures() {
        let store = FlakyStore::new();
        store.set("k", "v").await.unwrap();

        store.fail_sets(true);
        assert!(store.set("k", "w").await.is_err());
        assert_eq!(store.failed_sets(), 1);

        store.fail_gets(true);
        assert!(store.get("k").await.is_err());

        store.fail_gets(false);
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_recording_store_records_writes() {
        let store = RecordingStore::new();
        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();
        store.set("a", "3").await.unwrap();

        assert_eq!(store.write_count(), 3);
        assert_eq!(store.last_write("a").as_deref(), Some("3"));
        assert_eq!(store.get("b").await.unwrap().as_deref(), Some("2"));
    }
}
