//! KeyValueStore trait: the abstract interface for durable cart storage.
//!
//! This trait keeps the cart storage-agnostic. Implementations include SQLite
//! (primary) and in-memory (for tests).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// Async string-keyed string storage, durable across restarts.
///
/// All methods are async to support both blocking (SQLite) and natively async
/// backends. Blocking backends should move work off the runtime with
/// `spawn_blocking`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }
}
