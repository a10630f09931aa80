use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with snapshot store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Key-value store holding the last good upstream batches.
///
/// Injected into the fetch layer so nothing depends on ambient storage.
pub trait SnapshotStore: Send + Sync {
    fn read(&self, key: &str) -> impl Future<Output = Option<String>> + Send;

    fn write(&self, key: &str, value: String) -> impl Future<Output = ()> + Send;

    fn remove(&self, key: &str) -> impl Future<Output = ()> + Send;
}

/// Read and deserialize a JSON snapshot
pub async fn read_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StoreError>
where
    T: DeserializeOwned,
    S: SnapshotStore,
{
    match store.read(key).await {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Serialize and write a JSON snapshot
pub async fn write_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize,
    S: SnapshotStore,
{
    let json = serde_json::to_string(value)?;
    store.write(key, json).await;
    Ok(())
}

/// In-process snapshot store with size bound and TTL
#[derive(Clone)]
pub struct MemoryStore {
    cache: moka::future::Cache<String, String>,
}

impl MemoryStore {
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();
        Self { cache }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(1000, 300)
    }
}

impl SnapshotStore for MemoryStore {
    async fn read(&self, key: &str) -> Option<String> {
        let value = self.cache.get(key).await;
        if value.is_some() {
            tracing::trace!("Snapshot hit: {}", key);
        }
        value
    }

    async fn write(&self, key: &str, value: String) {
        self.cache.insert(key.to_string(), value).await;
        tracing::trace!("Snapshot set: {}", key);
    }

    async fn remove(&self, key: &str) {
        self.cache.invalidate(key).await;
    }
}

/// Snapshot key builder
pub struct CacheKey;

impl CacheKey {
    /// Key for an upstream candidate batch
    pub fn batch(senior_id: i64, page: u32, size: u32) -> String {
        format!("candidates:{}:{}:{}", senior_id, page, size)
    }
}
