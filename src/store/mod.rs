//! Persisted key-value store seam.
//!
//! The application's real store (device storage, a database, ...) lives
//! outside this crate and is injected as an `Arc<dyn KeyValueStore>`. Every
//! operation is async and fallible; callers in this crate handle failures per
//! call and never let one key's failure abort a pass.
//!
//! [`MemoryStore`] is an in-process implementation for tests and demos.

mod memory;

use async_trait::async_trait;

use crate::error::StoreError;

pub use memory::MemoryStore;

/// Async string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Returns the value under `key`, or `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Lists every key currently stored.
    async fn list_keys(&self) -> Result<Vec<String>, StoreError>;
}
